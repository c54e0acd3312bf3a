//! Layered application configuration.
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults
//! 2. YAML file (`--config`)
//! 3. environment variables `CARDSHARE__*` (`__` separates nesting levels)
//! 4. well-known alias variables (see [`EnvAlias`])
//! 5. CLI overrides ([`CliArgs`])

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result, bail};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::ConfigProvider;

/// Prefix of the structured environment overrides.
pub const ENV_PREFIX: &str = "CARDSHARE__";

const REDACTED: &str = "***REDACTED***";

/// Plain environment variable mapped onto a dotted config key,
/// e.g. `DATABASE_URL` onto `database.dsn`.
#[derive(Debug, Clone, Copy)]
pub struct EnvAlias {
    pub var: &'static str,
    pub key: &'static str,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    /// Raw per-module sections, parsed by each module with
    /// [`crate::config::module_config_required`].
    pub modules: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Origin used to build absolute card URLs, without trailing slash.
    pub public_origin: String,
    pub request_timeout_secs: u64,
    pub body_limit_bytes: usize,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub enabled: bool,
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub dsn: Option<String>,
    pub max_conns: u32,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `info,sea_orm=warn`.
    pub level: String,
    /// `text` or `json`.
    pub format: String,
    /// Optional log file; rotated daily.
    pub file: Option<String>,
}

/// CLI flags that take part in the config merge.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config: Option<String>,
    pub port: Option<u16>,
    pub print_config: bool,
    pub verbose: u8,
    pub mock: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_owned(),
            public_origin: "http://127.0.0.1:8080".to_owned(),
            request_timeout_secs: 30,
            body_limit_bytes: 12 * 1024 * 1024,
            cors: CorsConfig::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dsn: None,
            max_conns: 10,
            connect_timeout_secs: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "text".to_owned(),
            file: None,
        }
    }
}

impl AppConfig {
    /// Load the layered configuration. A missing `path` means defaults + env only.
    ///
    /// # Errors
    /// Returns an error if the YAML is malformed or a value has the wrong type.
    /// Semantic checks are left to [`AppConfig::validate`].
    pub fn load_layered(path: Option<&Path>, aliases: &[EnvAlias]) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        for alias in aliases {
            if let Ok(value) = std::env::var(alias.var) {
                if value.trim().is_empty() {
                    continue;
                }
                tracing::debug!(var = alias.var, key = alias.key, "applying env alias");
                figment = figment.merge(Serialized::default(alias.key, value));
            }
        }

        let config: Self = figment
            .extract()
            .context("failed to load configuration")?;
        Ok(config.normalized())
    }

    /// Apply `--port`, `-v` and `--mock` on top of the loaded layers.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(port) = args.port {
            let host = self
                .server
                .bind_addr
                .rsplit_once(':')
                .map_or(self.server.bind_addr.as_str(), |(host, _)| host);
            self.server.bind_addr = format!("{host}:{port}");
        }

        match args.verbose {
            0 => {}
            1 => "info".clone_into(&mut self.logging.level),
            2 => "debug".clone_into(&mut self.logging.level),
            _ => "trace".clone_into(&mut self.logging.level),
        }

        if args.mock {
            self.database.dsn = Some("sqlite::memory:".to_owned());
            self.database.max_conns = 1;
        }
    }

    /// Check the invariants the server relies on at startup.
    ///
    /// # Errors
    /// Returns an error naming the first offending setting.
    pub fn validate(&self) -> Result<()> {
        self.server
            .bind_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("invalid server.bind_addr '{}'", self.server.bind_addr))?;

        let origin = Url::parse(&self.server.public_origin).with_context(|| {
            format!(
                "invalid server.public_origin '{}'",
                self.server.public_origin
            )
        })?;
        if !matches!(origin.scheme(), "http" | "https") {
            bail!("server.public_origin must use http or https");
        }

        match self.database.dsn.as_deref() {
            Some(dsn) if !dsn.trim().is_empty() => {}
            _ => bail!("database.dsn is required (set DATABASE_URL or use --mock)"),
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            bail!(
                "logging.format must be 'text' or 'json', got '{}'",
                self.logging.format
            );
        }

        Ok(())
    }

    /// Effective configuration as YAML with secrets redacted.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        let mut value = serde_json::to_value(self)?;
        if let Some(dsn) = value.pointer_mut("/database/dsn")
            && let Some(raw) = dsn.as_str()
        {
            *dsn = serde_json::Value::String(redact_dsn_password(raw));
        }
        if let Some(modules) = value.get_mut("modules") {
            redact_secrets(modules);
        }
        serde_saphyr::to_string(&value).context("failed to render configuration as YAML")
    }

    fn normalized(mut self) -> Self {
        while self.server.public_origin.ends_with('/') {
            self.server.public_origin.pop();
        }
        self
    }
}

/// Replaces the password of a URL-shaped DSN with a marker.
#[must_use]
pub fn redact_dsn_password(dsn: &str) -> String {
    if !dsn.contains('@') {
        return dsn.to_owned();
    }
    match Url::parse(dsn) {
        Ok(mut url) => {
            if url.password().is_some() {
                url.set_password(Some(REDACTED)).ok();
            }
            url.to_string()
        }
        Err(_) => REDACTED.to_owned(),
    }
}

fn is_secret_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    key.ends_with("key") || key.contains("secret") || key.contains("password")
}

fn redact_secrets(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, entry) in map.iter_mut() {
                if is_secret_key(key) && entry.is_string() {
                    *entry = serde_json::Value::String(REDACTED.to_owned());
                } else {
                    redact_secrets(entry);
                }
            }
        }
        serde_json::Value::Array(items) => {
            for item in items {
                redact_secrets(item);
            }
        }
        _ => {}
    }
}

/// [`ConfigProvider`] over the `modules` map of an [`AppConfig`].
#[derive(Debug, Clone)]
pub struct AppConfigProvider(AppConfig);

impl AppConfigProvider {
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self(config)
    }

    #[must_use]
    pub fn app_config(&self) -> &AppConfig {
        &self.0
    }
}

impl ConfigProvider for AppConfigProvider {
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
        self.0.modules.get(module_name)
    }
}
