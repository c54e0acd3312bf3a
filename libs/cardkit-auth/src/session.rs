//! Session cookie helpers.

use axum::http::{HeaderMap, HeaderValue, header};
use cookie::{Cookie, SameSite};

/// Cookie holding the identity provider's access token.
pub const SESSION_COOKIE: &str = "cardshare_session";

/// Build an HttpOnly, SameSite=Lax cookie scoped to the whole site.
#[must_use]
pub fn build_cookie(
    name: &'static str,
    value: String,
    max_age_secs: i64,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(cookie::time::Duration::seconds(max_age_secs))
        .build()
}

/// A cookie that tells the browser to drop `name`.
#[must_use]
pub fn removal_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::build((name, "")).path("/").build();
    cookie.make_removal();
    cookie
}

/// Render a cookie as a `Set-Cookie` header value.
#[must_use]
pub fn set_cookie_header(cookie: &Cookie<'_>) -> Option<(header::HeaderName, HeaderValue)> {
    HeaderValue::from_str(&cookie.to_string())
        .ok()
        .map(|v| (header::SET_COOKIE, v))
}

/// Value of cookie `name` from the request's `Cookie` headers.
#[must_use]
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == name)
        .map(|c| c.value().to_owned())
        .filter(|v| !v.is_empty())
}

/// Extract Bearer token from Authorization header
#[must_use]
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Bearer header first, then the session cookie.
#[must_use]
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    extract_bearer_token(headers)
        .map(ToOwned::to_owned)
        .or_else(|| read_cookie(headers, SESSION_COOKIE))
}
