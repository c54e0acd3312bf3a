use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tera::Context;

use crate::domain::ports::IdentityProvider;
use crate::domain::service::Service;
use crate::templates::Templates;

/// Settings the pages need beyond the domain service.
#[derive(Debug, Clone)]
pub struct WebSettings {
    /// Origin of absolute links handed to the identity provider.
    pub public_origin: String,
    pub cookie_secure: bool,
    pub session_max_age_secs: i64,
    pub oauth_providers: Vec<String>,
    pub bio_max_chars: usize,
    /// Request body cap for the multipart intake form.
    pub upload_limit_bytes: usize,
}

/// Shared handles for every page handler.
pub struct WebContext {
    pub service: Arc<Service>,
    pub identity: Arc<dyn IdentityProvider>,
    pub templates: Arc<Templates>,
    pub settings: WebSettings,
}

impl WebContext {
    /// Render a page with the given status. A template failure is logged and
    /// answered with a bare 500.
    #[must_use]
    pub fn page(&self, status: StatusCode, name: &str, ctx: &Context) -> Response {
        match self.templates.render(name, ctx) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(err) => {
                tracing::error!(template = name, error = ?err, "page rendering failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }

    /// Absolute URL under the public origin.
    #[must_use]
    pub fn absolute(&self, path: &str) -> String {
        format!("{}{path}", self.settings.public_origin)
    }
}
