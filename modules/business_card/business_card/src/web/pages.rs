//! Session-gated pages and the public card.

use std::sync::Arc;

use axum::Form;
use axum::extract::{Extension, Multipart, Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use business_card_sdk::ProfileDraft;
use cardkit_auth::SecurityContext;
use cardkit_auth::axum_ext::MaybeAuthz;
use serde::{Deserialize, Serialize};
use tera::Context;
use tracing::{error, warn};
use uuid::Uuid;

use crate::domain::card::CardView;
use crate::domain::error::DomainError;
use crate::domain::intake::is_valid_email;

use super::context::WebContext;
use super::form::{self, FormValues};

pub const SHARE_SENT: &str = "Card sent successfully!";
pub const SHARE_MISSING_EMAIL: &str = "Please enter an email address";
pub const SHARE_INVALID_EMAIL: &str = "Please enter a valid email address";
const SHARE_RETRY: &str = "Send failed, please try again later";
const SAVE_FAILED: &str = "Failed to save your profile, please try again";
const FORM_UNREADABLE: &str = "The submitted form could not be read";
const CARD_LOAD_FAILED: &str = "Error loading card";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IndexQuery {
    pub mode: Option<String>,
}

/// `GET /`. Signed-in users go straight to the intake form.
pub async fn index(
    MaybeAuthz(session): MaybeAuthz,
    Extension(web): Extension<Arc<WebContext>>,
    Query(query): Query<IndexQuery>,
) -> Response {
    if session.is_some() {
        return Redirect::to("/profile-setup").into_response();
    }
    let mode = query.mode.as_deref().unwrap_or("signin");
    super::auth::sign_in_page(&web, mode, "", None)
}

#[derive(Debug, Serialize)]
struct FieldError<'a> {
    field: &'a str,
    message: &'a str,
}

fn render_intake(
    web: &WebContext,
    status: StatusCode,
    draft: &ProfileDraft,
    images: (Option<&str>, Option<&str>),
    error: Option<FieldError<'_>>,
) -> Response {
    let mut ctx = Context::new();
    ctx.insert("form", &FormValues::from_draft(draft));
    ctx.insert("platforms", &form::platform_fields(&draft.social_links));
    ctx.insert("profile_photo_url", &images.0);
    ctx.insert("company_logo_url", &images.1);
    ctx.insert("bio_max", &web.settings.bio_max_chars);
    if let Some(error) = error {
        ctx.insert("error", &error);
    }
    web.page(status, "profile_setup.html", &ctx)
}

/// `GET /profile-setup`, pre-filled from the stored profile.
pub async fn profile_setup_form(
    MaybeAuthz(session): MaybeAuthz,
    Extension(web): Extension<Arc<WebContext>>,
) -> Response {
    let Some(session) = session else {
        return Redirect::to("/").into_response();
    };

    let stored = match web.service.get_own_profile(&session).await {
        Ok(stored) => stored,
        Err(err) => {
            error!(error = %err, "profile lookup failed");
            None
        }
    };

    match stored {
        Some(profile) => {
            let values = FormValues::from_profile(&profile);
            let draft = ProfileDraft {
                name: values.name,
                surname: values.surname,
                title: values.title,
                company: values.company,
                email: values.email,
                mobile: values.mobile,
                website: Some(values.website),
                bio: Some(values.bio),
                social_links: form::selected_platforms(&profile),
                ..ProfileDraft::default()
            };
            render_intake(
                &web,
                StatusCode::OK,
                &draft,
                (
                    profile.profile_photo_url.as_deref(),
                    profile.company_logo_url.as_deref(),
                ),
                None,
            )
        }
        None => {
            let draft = ProfileDraft {
                email: session.email().unwrap_or_default().to_owned(),
                ..ProfileDraft::default()
            };
            render_intake(&web, StatusCode::OK, &draft, (None, None), None)
        }
    }
}

/// `POST /profile-setup`. Re-renders the form with the submitted values on
/// failure, redirects to the owner's card on success.
pub async fn profile_setup_submit(
    MaybeAuthz(session): MaybeAuthz,
    Extension(web): Extension<Arc<WebContext>>,
    multipart: Multipart,
) -> Response {
    let Some(session) = session else {
        return Redirect::to("/").into_response();
    };

    let draft = match form::read_intake(multipart).await {
        Ok(draft) => draft,
        Err(err) => {
            warn!(error = %err, "unreadable intake form");
            let error = FieldError {
                field: "form",
                message: FORM_UNREADABLE,
            };
            return render_intake(
                &web,
                err.status(),
                &ProfileDraft::default(),
                (None, None),
                Some(error),
            );
        }
    };

    // The form keeps showing the stored images when saving fails
    let stored = web.service.get_own_profile(&session).await.ok().flatten();
    let images = stored.as_ref().map_or((None, None), |p| {
        (p.profile_photo_url.as_deref(), p.company_logo_url.as_deref())
    });

    match web.service.save_profile(&session, draft.clone()).await {
        Ok(_) => Redirect::to("/digital-card").into_response(),
        Err(DomainError::Validation { field, message }) => {
            let error = FieldError {
                field: &field,
                message: &message,
            };
            render_intake(
                &web,
                StatusCode::UNPROCESSABLE_ENTITY,
                &draft,
                images,
                Some(error),
            )
        }
        Err(err) => {
            error!(error = %err, "profile save failed");
            let error = FieldError {
                field: "form",
                message: SAVE_FAILED,
            };
            render_intake(
                &web,
                StatusCode::INTERNAL_SERVER_ERROR,
                &draft,
                images,
                Some(error),
            )
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DigitalCardQuery {
    pub share: Option<String>,
}

/// State of the share dialog on the owner's card page.
#[derive(Debug, Default)]
struct ShareState {
    open: bool,
    recipient_email: String,
    message: Option<(String, &'static str)>,
}

async fn render_digital_card(
    web: &WebContext,
    session: &SecurityContext,
    share: ShareState,
) -> Response {
    let profile = match web.service.get_own_profile(session).await {
        Ok(Some(profile)) => profile,
        Ok(None) => return Redirect::to("/profile-setup").into_response(),
        Err(err) => {
            error!(error = %err, "own card lookup failed");
            return not_found_page(
                web,
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(CARD_LOAD_FAILED),
            );
        }
    };

    let user_id = session.subject_id();
    let qr_svg = match web.service.card_qr_svg(user_id) {
        Ok(svg) => svg,
        Err(err) => {
            error!(error = %err, "QR rendering failed");
            String::new()
        }
    };

    let mut ctx = Context::new();
    ctx.insert("card", &CardView::from_profile(&profile));
    ctx.insert("card_url", &web.service.card_url(user_id));
    ctx.insert(
        "qr_data_uri",
        &format!("data:image/svg+xml;base64,{}", STANDARD.encode(qr_svg)),
    );
    ctx.insert("show_share", &share.open);
    ctx.insert("recipient_email", &share.recipient_email);
    if let Some((message, kind)) = share.message {
        ctx.insert("share_message", &message);
        ctx.insert("share_kind", kind);
    }
    web.page(StatusCode::OK, "digital_card.html", &ctx)
}

/// `GET /digital-card`: the owner's card with QR code and share dialog.
pub async fn digital_card(
    MaybeAuthz(session): MaybeAuthz,
    Extension(web): Extension<Arc<WebContext>>,
    Query(query): Query<DigitalCardQuery>,
) -> Response {
    let Some(session) = session else {
        return Redirect::to("/").into_response();
    };
    let share = ShareState {
        open: query.share.is_some(),
        ..ShareState::default()
    };
    render_digital_card(&web, &session, share).await
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShareForm {
    pub recipient_email: String,
}

/// `POST /digital-card/share`: email the caller's card, then show the
/// outcome in the dialog.
pub async fn share_card(
    MaybeAuthz(session): MaybeAuthz,
    Extension(web): Extension<Arc<WebContext>>,
    Form(form): Form<ShareForm>,
) -> Response {
    let Some(session) = session else {
        return Redirect::to("/").into_response();
    };
    let recipient = form.recipient_email.trim().to_owned();

    let outcome = if recipient.is_empty() {
        Err(SHARE_MISSING_EMAIL.to_owned())
    } else if !is_valid_email(&recipient) {
        Err(SHARE_INVALID_EMAIL.to_owned())
    } else {
        match web.service.share_card(&session, &recipient).await {
            Ok(_) => Ok(()),
            Err(DomainError::Validation { message, .. }) => Err(format!("Send failed: {message}")),
            Err(DomainError::Delivery(err)) => {
                warn!(error = %err, "card share delivery failed");
                Err("Send failed: Failed to send email".to_owned())
            }
            Err(err) => {
                error!(error = %err, "card share failed");
                Err(SHARE_RETRY.to_owned())
            }
        }
    };

    let share = match outcome {
        Ok(()) => ShareState {
            open: true,
            recipient_email: String::new(),
            message: Some((SHARE_SENT.to_owned(), "success")),
        },
        Err(message) => ShareState {
            open: true,
            recipient_email: recipient,
            message: Some((message, "error")),
        },
    };
    render_digital_card(&web, &session, share).await
}

fn not_found_page(web: &WebContext, status: StatusCode, message: Option<&str>) -> Response {
    let mut ctx = Context::new();
    if let Some(message) = message {
        ctx.insert("message", message);
    }
    web.page(status, "not_found.html", &ctx)
}

/// `GET /card/{userId}`: the public card.
pub async fn card(
    Extension(web): Extension<Arc<WebContext>>,
    Path(user_id): Path<String>,
) -> Response {
    let Ok(user_id) = Uuid::parse_str(&user_id) else {
        return not_found_page(&web, StatusCode::NOT_FOUND, None);
    };

    match web.service.get_card(user_id).await {
        Ok(profile) => {
            let mut ctx = Context::new();
            ctx.insert("card", &CardView::from_profile(&profile));
            web.page(StatusCode::OK, "card.html", &ctx)
        }
        Err(DomainError::NotFound) => not_found_page(&web, StatusCode::NOT_FOUND, None),
        Err(err) => {
            error!(%user_id, error = %err, "card lookup failed");
            not_found_page(
                &web,
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(CARD_LOAD_FAILED),
            )
        }
    }
}
