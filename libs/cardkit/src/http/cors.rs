use anyhow::{Result, bail};
use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::bootstrap::CorsConfig;

/// Build a CORS layer for the JSON API.
///
/// # Errors
/// Returns an error when a wildcard origin is combined with credentials, or
/// when no configured origin is a valid header value.
pub fn build_cors_layer(cfg: &CorsConfig) -> Result<CorsLayer> {
    let has_wildcard_origin = cfg.allowed_origins.iter().any(|o| o == "*");

    if has_wildcard_origin && cfg.allow_credentials {
        bail!(
            "CORS misconfiguration: allowed_origins=['*'] cannot be combined with allow_credentials=true"
        );
    }

    let origin = if has_wildcard_origin {
        warn!("CORS is configured with allowed_origins=['*']");
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = cfg
            .allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();
        if origins.is_empty() {
            bail!("CORS is enabled but no valid allowed_origins are configured");
        }
        AllowOrigin::list(origins)
    };

    let mut layer = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(std::time::Duration::from_secs(60 * 60));

    if cfg.allow_credentials {
        layer = layer.allow_credentials(true);
    }

    Ok(layer)
}
