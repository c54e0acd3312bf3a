use secrecy::SecretString;
use uuid::Uuid;

use crate::claims::Claims;

/// Authenticated caller of the current request.
#[derive(Debug, Clone)]
pub struct SecurityContext {
    subject_id: Uuid,
    email: Option<String>,
    access_token: SecretString,
}

impl SecurityContext {
    #[must_use]
    pub fn new(subject_id: Uuid, email: Option<String>, access_token: SecretString) -> Self {
        Self {
            subject_id,
            email,
            access_token,
        }
    }

    /// Build from validated claims and the token they came from.
    #[must_use]
    pub fn from_claims(claims: Claims, access_token: SecretString) -> Self {
        Self::new(claims.sub, claims.email, access_token)
    }

    #[must_use]
    pub fn subject_id(&self) -> Uuid {
        self.subject_id
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Raw token, needed for identity calls made on the user's behalf.
    #[must_use]
    pub fn access_token(&self) -> &SecretString {
        &self.access_token
    }
}
