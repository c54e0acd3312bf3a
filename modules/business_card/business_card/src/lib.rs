//! Business card module implementation.
//!
//! The public API is defined in `business-card-sdk` and re-exported here.

pub use business_card_sdk::{
    BusinessCardClientV1, BusinessCardError, CardInvite, EmailReceipt, ImageChange, ImageSlot,
    ImageUpload, Profile, ProfileDraft, SocialLinks, SocialPlatform,
};

pub mod module;
pub use module::BusinessCardModule;

pub mod config;
pub use config::BusinessCardConfig;

#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
#[doc(hidden)]
pub mod templates;
#[doc(hidden)]
pub mod web;

#[cfg(test)]
mod test_support;
