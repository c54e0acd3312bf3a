use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use secrecy::{ExposeSecret, SecretString};

use crate::claims::Claims;
use crate::errors::AuthError;

/// Audience of end-user tokens issued by the identity provider.
pub const DEFAULT_AUDIENCE: &str = "authenticated";

/// Validates an access token and returns its claims.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    async fn validate_and_parse(&self, token: &str) -> Result<Claims, AuthError>;
}

/// HS256 validator using the identity provider's shared JWT secret.
pub struct JwtValidator {
    key: DecodingKey,
    validation: Validation,
}

impl JwtValidator {
    #[must_use]
    pub fn hs256(secret: &SecretString, audience: &str, leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "sub", "aud"]);
        validation.leeway = leeway_seconds;

        Self {
            key: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl TokenValidator for JwtValidator {
    async fn validate_and_parse(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            })
    }
}
