//! Module configuration, read from `modules.business_card.config`.

use std::path::PathBuf;

use cardkit::ConfigError;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// OAuth providers the sign-in page can offer.
pub const SUPPORTED_OAUTH_PROVIDERS: [&str; 2] = ["google", "facebook"];

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BusinessCardConfig {
    pub identity: IdentityConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub images: ImagesConfig,
    #[serde(default)]
    pub qr: QrConfig,
    #[serde(default)]
    pub intake: IntakeConfig,
}

/// GoTrue-compatible identity provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`.
    pub url: String,
    pub anon_key: SecretString,
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_oauth_providers")]
    pub oauth_providers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// HS256 secret the identity provider signs access tokens with.
    pub jwt_secret: SecretString,
    #[serde(default = "default_audience")]
    pub audience: String,
    #[serde(default = "default_leeway_secs")]
    pub leeway_secs: u64,
    /// Set the `Secure` attribute on session cookies.
    #[serde(default)]
    pub cookie_secure: bool,
    #[serde(default = "default_session_max_age_secs")]
    pub session_max_age_secs: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmailConfig {
    /// Resend API key. Without it the server starts but every delivery fails.
    pub api_key: Option<SecretString>,
    pub from: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            from: "Digital Card <noreply@resend.dev>".to_owned(),
            base_url: "https://api.resend.com".to_owned(),
            timeout_secs: default_http_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageBackend {
    /// Data URI stored in the profile row.
    Inline,
    /// Bytes written under `images.dir`, referenced by URL.
    Object,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    pub backend: ImageBackend,
    pub max_bytes: usize,
    pub dir: Option<PathBuf>,
    /// URL prefix of stored objects. A path (`/media`) is served by this server.
    pub public_base_url: String,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            backend: ImageBackend::Inline,
            max_bytes: 5 * 1024 * 1024,
            dir: None,
            public_base_url: "/media".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QrConfig {
    /// Rendered width and height in pixels.
    pub size: u32,
    /// Quiet zone, in modules.
    pub margin: u32,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            size: 200,
            margin: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntakeConfig {
    pub bio_max_chars: usize,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self { bio_max_chars: 150 }
    }
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_oauth_providers() -> Vec<String> {
    SUPPORTED_OAUTH_PROVIDERS
        .iter()
        .map(|p| (*p).to_owned())
        .collect()
}

fn default_audience() -> String {
    cardkit_auth::validator::DEFAULT_AUDIENCE.to_owned()
}

fn default_leeway_secs() -> u64 {
    30
}

fn default_session_max_age_secs() -> i64 {
    60 * 60 * 24 * 7
}

impl BusinessCardConfig {
    /// Checks that serde cannot express.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingSetting` for blank required values and
    /// `ConfigError::InvalidSetting` for malformed ones.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_blank("identity.url", &self.identity.url)?;
        let url = url::Url::parse(&self.identity.url).map_err(|e| ConfigError::InvalidSetting {
            key: "identity.url".to_owned(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidSetting {
                key: "identity.url".to_owned(),
                reason: "must be an http or https URL".to_owned(),
            });
        }
        require_non_blank("identity.anon_key", self.identity.anon_key.expose_secret())?;
        require_non_blank("auth.jwt_secret", self.auth.jwt_secret.expose_secret())?;

        if let Some(unknown) = self
            .identity
            .oauth_providers
            .iter()
            .find(|p| !SUPPORTED_OAUTH_PROVIDERS.contains(&p.as_str()))
        {
            return Err(ConfigError::InvalidSetting {
                key: "identity.oauth_providers".to_owned(),
                reason: format!("unsupported provider '{unknown}'"),
            });
        }

        if self.images.backend == ImageBackend::Object && self.images.dir.is_none() {
            return Err(ConfigError::MissingSetting {
                key: "images.dir".to_owned(),
            });
        }
        if self.images.max_bytes == 0 {
            return Err(ConfigError::InvalidSetting {
                key: "images.max_bytes".to_owned(),
                reason: "must be greater than zero".to_owned(),
            });
        }
        Ok(())
    }

    /// The email key, if it is set and not blank.
    #[must_use]
    pub fn email_api_key(&self) -> Option<&SecretString> {
        self.email
            .api_key
            .as_ref()
            .filter(|k| !k.expose_secret().trim().is_empty())
    }
}

fn require_non_blank(key: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingSetting {
            key: key.to_owned(),
        });
    }
    Ok(())
}
