//! Outbound capabilities the domain depends on.
//!
//! Implementations live in `infra`; tests substitute in-memory doubles.

use async_trait::async_trait;
use business_card_sdk::{EmailReceipt, ImageSlot, ImageUpload};
use secrecy::SecretString;
use thiserror::Error;
use uuid::Uuid;

// ---- images ----

#[derive(Debug, Error)]
pub enum ImageStoreError {
    #[error("image store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported image type '{0}'")]
    UnsupportedType(String),
}

/// Turns an upload into a reference string stored in the profile row.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn store(
        &self,
        owner: Uuid,
        slot: ImageSlot,
        upload: &ImageUpload,
    ) -> Result<String, ImageStoreError>;

    /// Drop stored objects of `slot` other than `current`.
    async fn prune(
        &self,
        _owner: Uuid,
        _slot: ImageSlot,
        _current: Option<&str>,
    ) -> Result<(), ImageStoreError> {
        Ok(())
    }
}

// ---- email ----

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("email delivery is not configured")]
    NotConfigured,

    #[error("email provider rejected the message ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("email transport error: {0}")]
    Transport(String),
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<EmailReceipt, EmailError>;
}

// ---- qr ----

#[derive(Debug, Error)]
pub enum QrError {
    #[error("QR encoding failed: {0}")]
    Encode(String),
}

pub trait QrRenderer: Send + Sync {
    /// SVG document encoding `data`.
    ///
    /// # Errors
    /// Returns `QrError::Encode` if `data` does not fit in a QR code.
    fn render_svg(&self, data: &str) -> Result<String, QrError>;
}

// ---- identity ----

/// Tokens issued by the identity provider after a successful sign-in.
#[derive(Debug, Clone)]
pub struct IdentitySession {
    pub access_token: SecretString,
    pub expires_in: Option<i64>,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    /// The provider refused the request; the message is shown to the user.
    #[error("{0}")]
    Rejected(String),

    #[error("unsupported OAuth provider '{0}'")]
    UnsupportedProvider(String),

    #[error("identity provider unreachable: {0}")]
    Transport(String),
}

/// Client of the external identity provider. Credential checks and token
/// issuance happen there; this server only relays.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IdentitySession, IdentityError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<(), IdentityError>;

    /// Send a recovery mail whose link returns to `redirect_to` with a PKCE code.
    async fn send_password_reset(
        &self,
        email: &str,
        redirect_to: &str,
        code_challenge: &str,
    ) -> Result<(), IdentityError>;

    /// URL the browser is sent to for an OAuth sign-in.
    ///
    /// # Errors
    /// Returns `IdentityError::UnsupportedProvider` for providers not enabled.
    fn authorize_url(
        &self,
        provider: &str,
        redirect_to: &str,
        code_challenge: &str,
    ) -> Result<String, IdentityError>;

    async fn exchange_code(
        &self,
        auth_code: &str,
        code_verifier: &str,
    ) -> Result<IdentitySession, IdentityError>;

    async fn update_password(
        &self,
        access_token: &SecretString,
        new_password: &str,
    ) -> Result<(), IdentityError>;

    async fn sign_out(&self, access_token: &SecretString) -> Result<(), IdentityError>;
}
