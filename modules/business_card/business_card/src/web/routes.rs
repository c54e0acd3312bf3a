use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Extension, Router};

use super::context::WebContext;
use super::{assets, auth, pages};

/// Mount the pages, the sign-in flows and the static assets.
pub fn register_routes(mut router: Router, web: Arc<WebContext>) -> Router {
    let upload_limit = web.settings.upload_limit_bytes;

    router = router
        .route("/", get(pages::index))
        .route(
            "/profile-setup",
            get(pages::profile_setup_form)
                .post(pages::profile_setup_submit)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/digital-card", get(pages::digital_card))
        .route("/digital-card/share", post(pages::share_card))
        .route("/card/{user_id}", get(pages::card))
        .route("/auth/sign-in", post(auth::sign_in))
        .route("/auth/sign-up", post(auth::sign_up))
        .route("/auth/forgot-password", post(auth::forgot_password))
        .route("/auth/oauth/{provider}", get(auth::oauth_start))
        .route("/auth/callback", get(auth::callback))
        .route("/auth/sign-out", post(auth::sign_out))
        .route(
            "/auth/reset-password",
            get(auth::reset_password_form).post(auth::reset_password),
        )
        .route("/static/{*path}", get(assets::static_asset));

    router = router.layer(Extension(web));
    router
}
