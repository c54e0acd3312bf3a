use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Mount the JSON API. The session middleware must run outside this router
/// for the authenticated routes to see a caller.
pub fn register_routes(mut router: Router, service: Arc<Service>) -> Router {
    router = router
        .route(
            "/api/profile",
            get(handlers::get_profile).put(handlers::put_profile),
        )
        .route("/api/profile/qr.svg", get(handlers::get_qr_svg))
        .route("/api/cards/{user_id}", get(handlers::get_card))
        .route("/api/send-card", post(handlers::send_card))
        .route("/api/openapi.json", get(handlers::openapi_json));

    router = router.layer(Extension(service));
    router
}
