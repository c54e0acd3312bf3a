//! `BusinessCardClientV1` trait definition.

use async_trait::async_trait;
use cardkit_auth::SecurityContext;
use uuid::Uuid;

use crate::errors::BusinessCardError;
use crate::models::{EmailReceipt, Profile, ProfileDraft};

/// Public API of the business card module (Version 1).
///
/// Methods taking a `SecurityContext` act on the caller's own card.
#[async_trait]
pub trait BusinessCardClientV1: Send + Sync {
    /// The caller's profile, `None` before the first intake submission.
    async fn get_own_profile(
        &self,
        ctx: &SecurityContext,
    ) -> Result<Option<Profile>, BusinessCardError>;

    /// Normalize, validate and upsert the caller's profile.
    async fn save_profile(
        &self,
        ctx: &SecurityContext,
        draft: ProfileDraft,
    ) -> Result<Profile, BusinessCardError>;

    /// Public card lookup; no authentication.
    async fn get_card(&self, user_id: Uuid) -> Result<Profile, BusinessCardError>;

    /// Canonical share URL of the caller's card.
    fn card_url(&self, user_id: Uuid) -> String;

    /// QR code of [`Self::card_url`] as an SVG document.
    fn card_qr_svg(&self, user_id: Uuid) -> Result<String, BusinessCardError>;

    /// Email the caller's card link to `recipient_email`.
    async fn share_card(
        &self,
        ctx: &SecurityContext,
        recipient_email: &str,
    ) -> Result<EmailReceipt, BusinessCardError>;
}
