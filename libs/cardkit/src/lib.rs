#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Shared plumbing for the cardshare server.
//!
//! - [`problem`]: RFC 9457 error bodies for the JSON API
//! - [`config`]: typed access to per-module config sections
//! - [`bootstrap`]: layered `AppConfig`, logging and shutdown signals
//! - [`http`]: the common middleware stack (request ids, tracing, limits, CORS)

pub mod bootstrap;
pub mod config;
pub mod http;
pub mod problem;

pub use config::{ConfigError, ConfigProvider, module_config_or_default, module_config_required};
pub use problem::{ApiResult, Problem, ValidationViolation};
