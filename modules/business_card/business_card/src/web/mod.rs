//! Server-rendered pages and the browser sign-in flows.

pub mod assets;
pub mod auth;
pub mod context;
pub mod form;
pub mod pages;
pub mod routes;

pub use context::{WebContext, WebSettings};
