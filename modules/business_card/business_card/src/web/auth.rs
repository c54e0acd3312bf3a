//! Browser sign-in flows relayed to the identity provider.
//!
//! Password sign-in and sign-up post straight to the provider. OAuth and
//! password recovery use PKCE: the verifier waits in a short-lived cookie
//! until the provider sends the browser back to `/auth/callback`.

use std::sync::Arc;

use axum::Form;
use axum::extract::{Extension, Path, Query};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use business_card_sdk::SocialPlatform;
use cardkit_auth::axum_ext::MaybeAuthz;
use cardkit_auth::session::{
    SESSION_COOKIE, build_cookie, read_cookie, removal_cookie, set_cookie_header,
};
use secrecy::ExposeSecret as _;
use serde::{Deserialize, Serialize};
use tera::Context;
use tracing::{info, warn};

use crate::domain::ports::{IdentityError, IdentitySession};
use crate::infra::identity::pkce::PkcePair;

use super::context::WebContext;

/// Cookie holding the PKCE verifier between redirect and callback.
pub const PKCE_COOKIE: &str = "cardshare_pkce";
const PKCE_MAX_AGE_SECS: i64 = 600;

pub const MIN_PASSWORD_CHARS: usize = 6;
pub const SIGN_UP_DONE: &str = "Sign up successful! Please sign in.";
pub const RESET_MAIL_SENT: &str = "Password reset email sent! Please check your inbox.";
pub const RESET_LINK_INVALID: &str = "Invalid or expired reset link";
pub const PASSWORDS_DIFFER: &str = "Passwords do not match";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";
pub const PASSWORD_RESET_DONE: &str = "Password reset successful! Redirecting...";
const EMAIL_REQUIRED: &str = "Please enter your email address first";

#[derive(Debug, Serialize)]
struct ProviderButton {
    key: String,
    label: String,
    icon: String,
}

fn provider_label(key: &str) -> String {
    match SocialPlatform::from_key(key) {
        Some(platform) => platform.label().to_owned(),
        None if key == "google" => "Google".to_owned(),
        None => key.to_owned(),
    }
}

/// The sign-in / sign-up page. `mode` is `"signup"` or anything else for
/// sign-in.
pub(crate) fn sign_in_page(
    web: &WebContext,
    mode: &str,
    email: &str,
    message: Option<(&str, &'static str)>,
) -> Response {
    let providers: Vec<ProviderButton> = web
        .settings
        .oauth_providers
        .iter()
        .map(|key| ProviderButton {
            key: key.clone(),
            label: provider_label(key),
            icon: format!("/static/icons/{key}.svg"),
        })
        .collect();

    let mut ctx = Context::new();
    ctx.insert("mode", mode);
    ctx.insert("email", email);
    ctx.insert("oauth_providers", &providers);
    if let Some((text, kind)) = message {
        ctx.insert("message", text);
        ctx.insert("message_kind", kind);
    }
    web.page(StatusCode::OK, "index.html", &ctx)
}

type SetCookie = Option<(HeaderName, HeaderValue)>;

fn session_cookie(web: &WebContext, session: &IdentitySession) -> SetCookie {
    let max_age = session
        .expires_in
        .unwrap_or(web.settings.session_max_age_secs);
    let cookie = build_cookie(
        SESSION_COOKIE,
        session.access_token.expose_secret().to_owned(),
        max_age,
        web.settings.cookie_secure,
    );
    set_cookie_header(&cookie)
}

fn pkce_cookie(web: &WebContext, pair: &PkcePair) -> SetCookie {
    set_cookie_header(&build_cookie(
        PKCE_COOKIE,
        pair.verifier.clone(),
        PKCE_MAX_AGE_SECS,
        web.settings.cookie_secure,
    ))
}

fn identity_message(err: &IdentityError) -> String {
    match err {
        IdentityError::Rejected(message) => message.clone(),
        IdentityError::UnsupportedProvider(_) | IdentityError::Transport(_) => err.to_string(),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CredentialsForm {
    pub email: String,
    pub password: String,
}

/// `POST /auth/sign-in`
pub async fn sign_in(
    Extension(web): Extension<Arc<WebContext>>,
    Form(form): Form<CredentialsForm>,
) -> Response {
    let email = form.email.trim();
    match web.identity.sign_in_with_password(email, &form.password).await {
        Ok(session) => {
            info!("password sign-in succeeded");
            let cookie = session_cookie(&web, &session);
            (AppendHeaders(cookie), Redirect::to("/profile-setup")).into_response()
        }
        Err(err) => {
            warn!(error = %err, "password sign-in failed");
            let message = format!("Sign in failed: {}", identity_message(&err));
            sign_in_page(&web, "signin", email, Some((message.as_str(), "error")))
        }
    }
}

/// `POST /auth/sign-up`. The user signs in afterwards.
pub async fn sign_up(
    Extension(web): Extension<Arc<WebContext>>,
    Form(form): Form<CredentialsForm>,
) -> Response {
    let email = form.email.trim();
    match web.identity.sign_up(email, &form.password).await {
        Ok(()) => sign_in_page(&web, "signin", email, Some((SIGN_UP_DONE, "success"))),
        Err(err) => {
            warn!(error = %err, "sign-up failed");
            let message = format!("Sign up failed: {}", identity_message(&err));
            sign_in_page(&web, "signup", email, Some((message.as_str(), "error")))
        }
    }
}

/// `POST /auth/forgot-password`. The recovery link returns through the
/// callback to the reset page.
pub async fn forgot_password(
    Extension(web): Extension<Arc<WebContext>>,
    Form(form): Form<CredentialsForm>,
) -> Response {
    let email = form.email.trim();
    if email.is_empty() {
        return sign_in_page(&web, "signin", email, Some((EMAIL_REQUIRED, "error")));
    }

    let pair = PkcePair::generate();
    let redirect_to = web.absolute("/auth/callback?next=/auth/reset-password");
    match web
        .identity
        .send_password_reset(email, &redirect_to, &pair.challenge)
        .await
    {
        Ok(()) => {
            let cookie = pkce_cookie(&web, &pair);
            let page = sign_in_page(&web, "signin", email, Some((RESET_MAIL_SENT, "success")));
            (AppendHeaders(cookie), page).into_response()
        }
        Err(err) => {
            warn!(error = %err, "password reset mail failed");
            let message = format!("Failed to send reset email: {}", identity_message(&err));
            sign_in_page(&web, "signin", email, Some((message.as_str(), "error")))
        }
    }
}

/// `GET /auth/oauth/{provider}`: hand the browser to the provider.
pub async fn oauth_start(
    Extension(web): Extension<Arc<WebContext>>,
    Path(provider): Path<String>,
) -> Response {
    let pair = PkcePair::generate();
    let redirect_to = web.absolute("/auth/callback");
    let enabled = web.settings.oauth_providers.iter().any(|p| *p == provider);
    let url = if enabled {
        web.identity
            .authorize_url(&provider, &redirect_to, &pair.challenge)
    } else {
        Err(IdentityError::UnsupportedProvider(provider.clone()))
    };

    match url {
        Ok(url) => (AppendHeaders(pkce_cookie(&web, &pair)), Redirect::to(&url)).into_response(),
        Err(err) => {
            warn!(%provider, error = %err, "oauth start failed");
            let message = format!(
                "Sign in with {} failed: {}",
                provider_label(&provider),
                identity_message(&err)
            );
            sign_in_page(&web, "signin", "", Some((message.as_str(), "error")))
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub next: Option<String>,
    pub error_description: Option<String>,
}

/// Only same-site absolute paths are followed after sign-in.
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/profile-setup",
    }
}

/// `GET /auth/callback`: exchange the PKCE code for a session.
pub async fn callback(
    Extension(web): Extension<Arc<WebContext>>,
    headers: HeaderMap,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let clear_pkce = set_cookie_header(&removal_cookie(PKCE_COOKIE));
    let verifier = read_cookie(&headers, PKCE_COOKIE);

    let (Some(code), Some(verifier)) = (query.code.as_deref(), verifier) else {
        let reason = query
            .error_description
            .as_deref()
            .unwrap_or("the sign-in link is invalid or has expired");
        let message = format!("Sign in failed: {reason}");
        let page = sign_in_page(&web, "signin", "", Some((message.as_str(), "error")));
        return (AppendHeaders(clear_pkce), page).into_response();
    };

    match web.identity.exchange_code(code, &verifier).await {
        Ok(session) => {
            info!("code exchange succeeded");
            let cookie = session_cookie(&web, &session);
            let next = safe_next(query.next.as_deref()).to_owned();
            (
                AppendHeaders(clear_pkce.into_iter().chain(cookie)),
                Redirect::to(&next),
            )
                .into_response()
        }
        Err(err) => {
            warn!(error = %err, "code exchange failed");
            let message = format!("Sign in failed: {}", identity_message(&err));
            let page = sign_in_page(&web, "signin", "", Some((message.as_str(), "error")));
            (AppendHeaders(clear_pkce), page).into_response()
        }
    }
}

/// `POST /auth/sign-out`. The local cookie is dropped even if the provider
/// call fails.
pub async fn sign_out(
    MaybeAuthz(session): MaybeAuthz,
    Extension(web): Extension<Arc<WebContext>>,
) -> Response {
    if let Some(session) = session {
        if let Err(err) = web.identity.sign_out(session.access_token()).await {
            warn!(error = %err, "provider sign-out failed");
        }
    }
    let clear = set_cookie_header(&removal_cookie(SESSION_COOKIE));
    (AppendHeaders(clear), Redirect::to("/")).into_response()
}

fn reset_page(
    web: &WebContext,
    valid_session: bool,
    message: Option<(&str, &'static str)>,
    redirect_home: bool,
) -> Response {
    let mut ctx = Context::new();
    ctx.insert("valid_session", &valid_session);
    ctx.insert("redirect_home", &redirect_home);
    if let Some((text, kind)) = message {
        ctx.insert("message", text);
        ctx.insert("message_kind", kind);
    }
    web.page(StatusCode::OK, "reset_password.html", &ctx)
}

/// `GET /auth/reset-password`: needs the recovery session set by the callback.
pub async fn reset_password_form(
    MaybeAuthz(session): MaybeAuthz,
    Extension(web): Extension<Arc<WebContext>>,
) -> Response {
    match session {
        Some(_) => reset_page(&web, true, None, false),
        None => reset_page(&web, false, Some((RESET_LINK_INVALID, "error")), false),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResetPasswordForm {
    pub password: String,
    pub confirm_password: String,
}

/// `POST /auth/reset-password`
pub async fn reset_password(
    MaybeAuthz(session): MaybeAuthz,
    Extension(web): Extension<Arc<WebContext>>,
    Form(form): Form<ResetPasswordForm>,
) -> Response {
    let Some(session) = session else {
        return reset_page(&web, false, Some((RESET_LINK_INVALID, "error")), false);
    };
    if form.password != form.confirm_password {
        return reset_page(&web, true, Some((PASSWORDS_DIFFER, "error")), false);
    }
    if form.password.chars().count() < MIN_PASSWORD_CHARS {
        return reset_page(&web, true, Some((PASSWORD_TOO_SHORT, "error")), false);
    }

    match web
        .identity
        .update_password(session.access_token(), &form.password)
        .await
    {
        Ok(()) => {
            info!(user_id = %session.subject_id(), "password reset");
            reset_page(&web, false, Some((PASSWORD_RESET_DONE, "success")), true)
        }
        Err(err) => {
            warn!(error = %err, "password update failed");
            let message = format!("Password reset failed: {}", identity_message(&err));
            reset_page(&web, true, Some((message.as_str(), "error")), false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_must_stay_on_site() {
        assert_eq!(safe_next(Some("/auth/reset-password")), "/auth/reset-password");
        assert_eq!(safe_next(Some("//evil.example")), "/profile-setup");
        assert_eq!(safe_next(Some("https://evil.example")), "/profile-setup");
        assert_eq!(safe_next(Some("/\\evil.example")), "/profile-setup");
        assert_eq!(safe_next(None), "/profile-setup");
    }

    #[test]
    fn provider_labels() {
        assert_eq!(provider_label("google"), "Google");
        assert_eq!(provider_label("facebook"), "Facebook");
    }
}
