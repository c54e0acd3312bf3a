use std::sync::Arc;

use business_card_sdk::{
    CardInvite, EmailReceipt, ImageChange, ImageSlot, Profile, ProfileDraft,
};
use cardkit_auth::SecurityContext;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::error::DomainError;
use super::intake::{self, IntakeRules};
use super::notifier::Notifier;
use super::ports::{ImageStore, QrRenderer};
use super::repo::{ImageUpdate, ProfileRepository, ProfileWrite};

/// Sender name used when the sharing user has no stored profile.
pub const ANONYMOUS_SENDER: &str = "Someone";

pub struct ServiceConfig {
    /// Origin the share URLs are built from, without trailing slash.
    pub public_origin: String,
    pub intake: IntakeRules,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            public_origin: "http://127.0.0.1:8080".to_owned(),
            intake: IntakeRules::default(),
        }
    }
}

/// Collaborators the service calls out to.
pub struct ServicePorts {
    pub images: Arc<dyn ImageStore>,
    pub qr: Arc<dyn QrRenderer>,
    pub notifier: Notifier,
}

pub struct Service {
    repo: Arc<dyn ProfileRepository>,
    ports: ServicePorts,
    config: ServiceConfig,
}

impl Service {
    #[must_use]
    pub fn new(repo: Arc<dyn ProfileRepository>, ports: ServicePorts, config: ServiceConfig) -> Self {
        Self {
            repo,
            ports,
            config,
        }
    }

    /// The caller's profile, `None` before the first submission.
    ///
    /// # Errors
    /// Returns `DomainError::Database` if the store fails.
    pub async fn get_own_profile(
        &self,
        ctx: &SecurityContext,
    ) -> Result<Option<Profile>, DomainError> {
        Ok(self.repo.find_by_user(ctx.subject_id()).await?)
    }

    /// Normalize, store images, then upsert the caller's profile.
    ///
    /// # Errors
    /// `DomainError::Validation` before any side effect; image store and
    /// database failures otherwise.
    #[instrument(skip_all, fields(user_id = %ctx.subject_id()))]
    pub async fn save_profile(
        &self,
        ctx: &SecurityContext,
        draft: ProfileDraft,
    ) -> Result<Profile, DomainError> {
        let user_id = ctx.subject_id();
        let fields = intake::normalize(&draft, &self.config.intake)?;

        let profile_photo = self
            .apply_image(user_id, ImageSlot::ProfilePhoto, draft.profile_photo)
            .await?;
        let company_logo = self
            .apply_image(user_id, ImageSlot::CompanyLogo, draft.company_logo)
            .await?;

        let replaced: Vec<(ImageSlot, Option<String>)> = [
            (ImageSlot::ProfilePhoto, &profile_photo),
            (ImageSlot::CompanyLogo, &company_logo),
        ]
        .into_iter()
        .filter_map(|(slot, update)| match update {
            ImageUpdate::Keep => None,
            ImageUpdate::Set(reference) => Some((slot, reference.clone())),
        })
        .collect();

        let profile = self
            .repo
            .upsert(ProfileWrite {
                user_id,
                fields,
                profile_photo,
                company_logo,
            })
            .await?;

        // The row no longer points at older objects; losing them is not fatal.
        for (slot, current) in replaced {
            if let Err(err) = self
                .ports
                .images
                .prune(user_id, slot, current.as_deref())
                .await
            {
                warn!(slot = slot.as_str(), error = %err, "failed to prune old images");
            }
        }

        info!("profile saved");
        Ok(profile)
    }

    /// Public lookup of one card.
    ///
    /// # Errors
    /// `DomainError::NotFound` when the user has no profile.
    pub async fn get_card(&self, user_id: Uuid) -> Result<Profile, DomainError> {
        self.repo
            .find_by_user(user_id)
            .await?
            .ok_or(DomainError::NotFound)
    }

    /// Canonical share URL: `<public_origin>/card/<user_id>`.
    #[must_use]
    pub fn card_url(&self, user_id: Uuid) -> String {
        format!("{}/card/{user_id}", self.config.public_origin)
    }

    /// QR code of the share URL as an SVG document.
    ///
    /// # Errors
    /// Returns `DomainError::Qr` if encoding fails.
    pub fn card_qr_svg(&self, user_id: Uuid) -> Result<String, DomainError> {
        Ok(self.ports.qr.render_svg(&self.card_url(user_id))?)
    }

    /// Email the caller's card. The sender name comes from the store, not
    /// from the request.
    ///
    /// # Errors
    /// Validation errors for the recipient, `DomainError::Delivery` when the
    /// provider fails.
    #[instrument(skip_all, fields(user_id = %ctx.subject_id()))]
    pub async fn share_card(
        &self,
        ctx: &SecurityContext,
        recipient_email: &str,
    ) -> Result<EmailReceipt, DomainError> {
        let user_id = ctx.subject_id();
        let sender_name = self
            .repo
            .find_by_user(user_id)
            .await?
            .as_ref()
            .map_or_else(|| ANONYMOUS_SENDER.to_owned(), Profile::display_name);

        self.send_card(&CardInvite {
            recipient_email: recipient_email.to_owned(),
            sender_name,
            card_url: self.card_url(user_id),
        })
        .await
    }

    /// Email an arbitrary card link.
    ///
    /// # Errors
    /// See [`Notifier::send`].
    pub async fn send_card(&self, invite: &CardInvite) -> Result<EmailReceipt, DomainError> {
        self.ports.notifier.send(invite).await
    }

    async fn apply_image(
        &self,
        user_id: Uuid,
        slot: ImageSlot,
        change: ImageChange,
    ) -> Result<ImageUpdate, DomainError> {
        match change {
            ImageChange::Keep => Ok(ImageUpdate::Keep),
            ImageChange::Clear => Ok(ImageUpdate::Set(None)),
            ImageChange::Replace(upload) => {
                let reference = self.ports.images.store(user_id, slot, &upload).await?;
                debug!(slot = slot.as_str(), bytes = upload.bytes.len(), "image stored");
                Ok(ImageUpdate::Set(Some(reference)))
            }
        }
    }
}
