//! Axum extractors and middleware for sessions

use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use secrecy::SecretString;

use crate::context::SecurityContext;
use crate::errors::AuthError;
use crate::session::extract_session_token;
use crate::validator::TokenValidator;

/// Requires an authenticated session; rejects with 401 otherwise.
#[derive(Debug, Clone)]
pub struct Authz(pub SecurityContext);

impl<S> FromRequestParts<S> for Authz
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SecurityContext>()
            .cloned()
            .map(Authz)
            .ok_or(AuthError::Unauthenticated)
    }
}

/// The session if there is one. Pages use this to decide on redirects.
#[derive(Debug, Clone)]
pub struct MaybeAuthz(pub Option<SecurityContext>);

impl<S> FromRequestParts<S> for MaybeAuthz
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<SecurityContext>().cloned()))
    }
}

/// Resolves the caller's session.
///
/// A valid bearer token or session cookie yields a [`SecurityContext`] (and
/// the [`crate::Claims`]) in the request extensions. A missing or invalid
/// token leaves the request anonymous; the extractors decide what that means.
pub async fn session_middleware(
    State(validator): State<Arc<dyn TokenValidator>>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_session_token(request.headers()) {
        match validator.validate_and_parse(&token).await {
            Ok(claims) => {
                let ctx = SecurityContext::from_claims(claims.clone(), SecretString::from(token));
                request.extensions_mut().insert(claims);
                request.extensions_mut().insert(ctx);
            }
            Err(err) => {
                tracing::debug!("session: invalid token: {err}");
            }
        }
    }
    next.run(request).await
}
