//! Business card SDK
//!
//! This crate provides the public API for the business card module:
//! - `BusinessCardClientV1` trait, consumed by the web pages
//! - Model types (`Profile`, `ProfileDraft`, `SocialPlatform`, ...)
//! - Error type (`BusinessCardError`)

#![forbid(unsafe_code)]

pub mod api;
pub mod errors;
pub mod models;
pub mod social;

pub use api::BusinessCardClientV1;
pub use errors::BusinessCardError;
pub use models::{
    CardInvite, EmailReceipt, ImageChange, ImageSlot, ImageUpload, Profile, ProfileDraft,
};
pub use social::{SocialLinks, SocialPlatform};
