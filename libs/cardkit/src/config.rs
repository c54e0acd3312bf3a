//! Typed access to per-module configuration sections.
//!
//! Module settings live under `modules.<name>.config` in the application
//! config. Two loaders are provided:
//!
//! 1. [`module_config_or_default`] falls back to `T::default()` when the
//!    section is missing.
//! 2. [`module_config_required`] refuses to continue without it.

use serde::de::DeserializeOwned;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("module '{module}' not found")]
    ModuleNotFound { module: String },
    #[error("module '{module}' config must be an object")]
    InvalidModuleStructure { module: String },
    #[error("missing 'config' section in module '{module}'")]
    MissingConfigSection { module: String },
    #[error("invalid config for module '{module}': {source}")]
    InvalidConfig {
        module: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("missing required setting '{key}'")]
    MissingSetting { key: String },
    #[error("invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },
}

/// Provider of module-specific configuration (raw JSON sections only).
pub trait ConfigProvider: Send + Sync {
    /// Returns raw JSON section for the module, if any.
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value>;
}

/// Lenient loader: missing module, non-object module or missing `config`
/// all yield `T::default()`; a present but malformed section is an error.
///
/// # Errors
/// Returns `ConfigError::InvalidConfig` if the config section exists but cannot be deserialized.
pub fn module_config_or_default<T: DeserializeOwned + Default>(
    provider: &dyn ConfigProvider,
    module_name: &str,
) -> Result<T, ConfigError> {
    let Some(module_raw) = provider.get_module_config(module_name) else {
        return Ok(T::default());
    };

    let Some(obj) = module_raw.as_object() else {
        return Ok(T::default());
    };

    let Some(config_section) = obj.get("config") else {
        return Ok(T::default());
    };

    serde_json::from_value(config_section.clone()).map_err(|e| ConfigError::InvalidConfig {
        module: module_name.to_owned(),
        source: e,
    })
}

/// Strict loader: the module, its object shape and its `config` section
/// must all be present and valid.
///
/// # Errors
/// Returns `ConfigError` if the module is not found, has invalid structure, or config is invalid.
pub fn module_config_required<T: DeserializeOwned>(
    provider: &dyn ConfigProvider,
    module_name: &str,
) -> Result<T, ConfigError> {
    let module_raw =
        provider
            .get_module_config(module_name)
            .ok_or_else(|| ConfigError::ModuleNotFound {
                module: module_name.to_owned(),
            })?;

    let obj = module_raw
        .as_object()
        .ok_or_else(|| ConfigError::InvalidModuleStructure {
            module: module_name.to_owned(),
        })?;

    let config_section = obj
        .get("config")
        .ok_or_else(|| ConfigError::MissingConfigSection {
            module: module_name.to_owned(),
        })?;

    serde_json::from_value(config_section.clone()).map_err(|e| ConfigError::InvalidConfig {
        module: module_name.to_owned(),
        source: e,
    })
}
