//! Common HTTP middleware for the server router.

pub mod cors;
pub mod request_id;

use std::time::Duration;

use anyhow::Result;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::field::Empty;

use crate::bootstrap::ServerConfig;

pub use request_id::XRequestId;

/// Wrap `router` with the full middleware stack.
///
/// Runtime order, outermost first:
/// `SetRequestId` -> `PropagateRequestId` -> Trace -> `push_req_id_to_extensions`
/// -> Timeout -> `BodyLimit` -> CORS -> Router.
///
/// # Errors
/// Returns an error if CORS is enabled with an invalid configuration.
pub fn apply_middleware_stack(mut router: Router, cfg: &ServerConfig) -> Result<Router> {
    // 6) CORS
    if cfg.cors.enabled {
        router = router.layer(cors::build_cors_layer(&cfg.cors)?);
    }

    // 5) Body limit
    router = router.layer(RequestBodyLimitLayer::new(cfg.body_limit_bytes));
    router = router.layer(DefaultBodyLimit::max(cfg.body_limit_bytes));

    // 4) Timeout
    router = router.layer(TimeoutLayer::with_status_code(
        axum::http::StatusCode::GATEWAY_TIMEOUT,
        Duration::from_secs(cfg.request_timeout_secs),
    ));

    // 3) Record request_id into span + extensions
    router = router.layer(from_fn(request_id::push_req_id_to_extensions));

    // 2) Trace
    router = apply_trace_layer(router);

    // 1) Request id: set (outermost), then propagate to the response
    let x_request_id = request_id::header();
    router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));
    router = router.layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId));

    Ok(router)
}

fn apply_trace_layer(router: Router) -> Router {
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(|req: &axum::http::Request<axum::body::Body>| {
                let rid = req
                    .headers()
                    .get(request_id::header())
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("n/a");

                tracing::info_span!(
                    "http_request",
                    method = %req.method(),
                    uri = %req.uri().path(),
                    version = ?req.version(),
                    request_id = %rid,
                    status = Empty,
                    latency_ms = Empty,
                )
            })
            .on_response(
                |res: &axum::http::Response<axum::body::Body>,
                 latency: Duration,
                 span: &tracing::Span| {
                    span.record("status", res.status().as_u16());
                    span.record("latency_ms", latency.as_millis());
                    tracing::debug!(parent: span, "response sent");
                },
            ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::CorsConfig;
    use axum::body::Body;
    use axum::extract::Extension;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use tower::ServiceExt;

    async fn echo_request_id(Extension(rid): Extension<XRequestId>) -> String {
        rid.0
    }

    fn app(cfg: &ServerConfig) -> Router {
        let router = Router::new().route("/rid", get(echo_request_id));
        apply_middleware_stack(router, cfg).unwrap()
    }

    #[tokio::test]
    async fn generates_and_propagates_request_id() {
        let response = app(&ServerConfig::default())
            .oneshot(Request::builder().uri("/rid").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let header = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_owned();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body, header.as_bytes());
        assert!(uuid::Uuid::parse_str(&header).is_ok());
    }

    #[tokio::test]
    async fn keeps_caller_request_id() {
        let response = app(&ServerConfig::default())
            .oneshot(
                Request::builder()
                    .uri("/rid")
                    .header("x-request-id", "fixed-req-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok()),
            Some("fixed-req-1")
        );
    }

    #[tokio::test]
    async fn cors_headers_when_enabled() {
        let cfg = ServerConfig {
            cors: CorsConfig {
                enabled: true,
                allowed_origins: vec!["https://example.com".to_owned()],
                allow_credentials: false,
            },
            ..ServerConfig::default()
        };

        let response = app(&cfg)
            .oneshot(
                Request::builder()
                    .uri("/rid")
                    .header("origin", "https://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some("https://example.com")
        );
    }

    #[tokio::test]
    async fn rejects_oversized_body() {
        let cfg = ServerConfig {
            body_limit_bytes: 8,
            ..ServerConfig::default()
        };
        let router = Router::new().route("/echo", axum::routing::post(|body: String| async { body }));
        let app = apply_middleware_stack(router, &cfg).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/echo")
                    .header("content-length", "32")
                    .body(Body::from("x".repeat(32)))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
