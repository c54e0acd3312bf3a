//! Error types for the business card SDK.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BusinessCardError {
    #[error("Card not found")]
    NotFound,

    #[error("Validation error on field '{field}': {message}")]
    Validation { field: String, message: String },

    /// The email provider did not accept the message.
    #[error("Failed to send email")]
    Delivery,

    #[error("Internal error")]
    Internal,
}

impl BusinessCardError {
    #[must_use]
    pub fn not_found() -> Self {
        Self::NotFound
    }

    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal() -> Self {
        Self::Internal
    }
}
