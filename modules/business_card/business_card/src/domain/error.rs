use business_card_sdk::BusinessCardError;

use super::ports::{EmailError, ImageStoreError, QrError};

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Card not found")]
    NotFound,

    #[error("Validation error on field '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Image store error: {0}")]
    ImageStore(#[from] ImageStoreError),

    #[error("Email delivery error: {0}")]
    Delivery(#[from] EmailError),

    #[error("QR rendering error: {0}")]
    Qr(#[from] QrError),

    #[error("Template rendering error: {0}")]
    Render(#[from] tera::Error),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl DomainError {
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<DomainError> for BusinessCardError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound => Self::not_found(),
            DomainError::Validation { field, message } => Self::validation(field, message),
            DomainError::Delivery(_) => Self::Delivery,
            DomainError::ImageStore(_)
            | DomainError::Qr(_)
            | DomainError::Render(_)
            | DomainError::Database(_) => Self::internal(),
        }
    }
}
