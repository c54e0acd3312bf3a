use std::sync::Arc;

use async_trait::async_trait;
use business_card_sdk::{
    BusinessCardClientV1, BusinessCardError, EmailReceipt, Profile, ProfileDraft,
};
use cardkit_auth::SecurityContext;
use uuid::Uuid;

use super::service::Service;

/// In-process implementation of [`BusinessCardClientV1`].
pub struct LocalClient {
    service: Arc<Service>,
}

impl LocalClient {
    #[must_use]
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl BusinessCardClientV1 for LocalClient {
    async fn get_own_profile(
        &self,
        ctx: &SecurityContext,
    ) -> Result<Option<Profile>, BusinessCardError> {
        self.service.get_own_profile(ctx).await.map_err(Into::into)
    }

    async fn save_profile(
        &self,
        ctx: &SecurityContext,
        draft: ProfileDraft,
    ) -> Result<Profile, BusinessCardError> {
        self.service
            .save_profile(ctx, draft)
            .await
            .map_err(Into::into)
    }

    async fn get_card(&self, user_id: Uuid) -> Result<Profile, BusinessCardError> {
        self.service.get_card(user_id).await.map_err(Into::into)
    }

    fn card_url(&self, user_id: Uuid) -> String {
        self.service.card_url(user_id)
    }

    fn card_qr_svg(&self, user_id: Uuid) -> Result<String, BusinessCardError> {
        self.service.card_qr_svg(user_id).map_err(Into::into)
    }

    async fn share_card(
        &self,
        ctx: &SecurityContext,
        recipient_email: &str,
    ) -> Result<EmailReceipt, BusinessCardError> {
        self.service
            .share_card(ctx, recipient_email)
            .await
            .map_err(Into::into)
    }
}
