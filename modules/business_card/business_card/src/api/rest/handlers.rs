use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Extension, Path};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::Json;
use cardkit::problem;
use cardkit::ApiResult;
use cardkit_auth::axum_ext::Authz;
use tracing::{error, warn};
use uuid::Uuid;

use crate::domain::card::CardView;
use crate::domain::error::DomainError;
use crate::domain::service::Service;

use super::dto::{CardDto, ProfileDto, SendCardRequest, SendCardResponse, UpdateProfileRequest};
use super::error::domain_error_to_problem;
use super::openapi;

const SEND_FAILED: &str = "Failed to send email";
const SEND_UNEXPECTED: &str = "Failed to send, please try again later";

pub async fn get_profile(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<Service>>,
) -> ApiResult<Json<ProfileDto>> {
    let profile = svc.get_own_profile(&ctx).await?.ok_or_else(|| {
        problem::not_found("No profile has been saved yet")
            .with_code("BUSINESS_CARD_PROFILE_NOT_FOUND")
            .with_instance("/api/profile")
    })?;
    let card_url = svc.card_url(profile.user_id);
    Ok(Json(ProfileDto::new(profile, card_url)))
}

pub async fn put_profile(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<Service>>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileDto>> {
    let draft = req
        .into_draft()
        .map_err(|e| domain_error_to_problem(&e, "/api/profile"))?;
    let profile = svc
        .save_profile(&ctx, draft)
        .await
        .map_err(|e| domain_error_to_problem(&e, "/api/profile"))?;
    let card_url = svc.card_url(profile.user_id);
    Ok(Json(ProfileDto::new(profile, card_url)))
}

pub async fn get_qr_svg(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<Service>>,
) -> ApiResult<impl IntoResponse> {
    let svg = svc.card_qr_svg(ctx.subject_id())?;
    Ok(([(header::CONTENT_TYPE, mime::IMAGE_SVG.as_ref())], svg))
}

pub async fn get_card(
    Extension(svc): Extension<Arc<Service>>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<CardDto>> {
    let instance = format!("/api/cards/{user_id}");
    // Malformed ids cannot match a stored card
    let Ok(id) = Uuid::parse_str(&user_id) else {
        return Err(domain_error_to_problem(&DomainError::NotFound, &instance));
    };
    let profile = svc
        .get_card(id)
        .await
        .map_err(|e| domain_error_to_problem(&e, &instance))?;
    Ok(Json(CardView::from_profile(&profile).into()))
}

/// `POST /api/send-card`. Answers `{success, message}` on every path.
pub async fn send_card(
    Extension(svc): Extension<Arc<Service>>,
    body: Bytes,
) -> (StatusCode, Json<SendCardResponse>) {
    let req = match serde_json::from_slice::<SendCardRequest>(&body) {
        Ok(req) => req,
        Err(err) => {
            warn!(error = %err, "send-card: unparseable body");
            return (
                StatusCode::BAD_REQUEST,
                Json(SendCardResponse::failed("Invalid request body")),
            );
        }
    };

    match svc.send_card(&req.into()).await {
        Ok(receipt) => (StatusCode::OK, Json(SendCardResponse::sent(receipt.id))),
        Err(DomainError::Validation { message, .. }) => {
            (StatusCode::BAD_REQUEST, Json(SendCardResponse::failed(message)))
        }
        Err(DomainError::Delivery(_)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(SendCardResponse::failed(SEND_FAILED)),
        ),
        Err(err) => {
            error!(error = %err, "send-card: unexpected failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SendCardResponse::failed(SEND_UNEXPECTED)),
            )
        }
    }
}

pub async fn openapi_json() -> impl IntoResponse {
    Json(openapi::document())
}
