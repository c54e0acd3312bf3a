//! Process bootstrap: configuration, logging and signal handling.

pub mod app_config;
pub mod logging;
pub mod signals;

pub use app_config::{
    AppConfig, AppConfigProvider, CliArgs, CorsConfig, DatabaseConfig, EnvAlias, LoggingConfig,
    ServerConfig,
};
pub use logging::init_logging;
pub use signals::wait_for_shutdown;
