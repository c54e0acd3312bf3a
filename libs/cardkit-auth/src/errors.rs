use axum::response::{IntoResponse, Response};
use cardkit::problem;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authentication required: missing or invalid session")]
    Unauthenticated,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated | Self::InvalidToken(_) | Self::TokenExpired => {
                problem::unauthorized(self.to_string())
                    .with_code("UNAUTHENTICATED")
                    .into_response()
            }
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "auth internal error");
                problem::internal_error("Internal authentication error").into_response()
            }
        }
    }
}
