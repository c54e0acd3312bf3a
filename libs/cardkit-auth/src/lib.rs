//! Session handling for cardshare.
//!
//! The identity provider issues HS256 access tokens. They reach the server
//! either as the `cardshare_session` cookie (browser pages) or as an
//! `Authorization: Bearer` header (JSON API). [`axum_ext::session_middleware`]
//! validates whichever is present and stores a [`SecurityContext`] in the
//! request extensions; handlers pick it up with [`axum_ext::Authz`] or
//! [`axum_ext::MaybeAuthz`].

pub mod axum_ext;
pub mod claims;
pub mod context;
pub mod errors;
pub mod session;
pub mod validator;

pub use claims::Claims;
pub use context::SecurityContext;
pub use errors::AuthError;
pub use validator::{JwtValidator, TokenValidator};
