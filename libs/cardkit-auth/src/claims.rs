use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access token claims as issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id; also the primary key of the user's profile.
    pub sub: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub aud: String,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}
