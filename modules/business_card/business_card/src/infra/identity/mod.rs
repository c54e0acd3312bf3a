//! Identity provider client and PKCE helpers.

mod gotrue;
pub mod pkce;

pub use gotrue::GoTrueIdentityProvider;
