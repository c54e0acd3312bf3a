use async_trait::async_trait;
use business_card_sdk::Profile;
use uuid::Uuid;

use super::intake::NormalizedProfile;

/// Change to one image column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageUpdate {
    /// Leave the stored reference as is (`NULL` on first insert).
    Keep,
    Set(Option<String>),
}

/// One atomic profile write.
#[derive(Debug, Clone)]
pub struct ProfileWrite {
    pub user_id: Uuid,
    pub fields: NormalizedProfile,
    pub profile_photo: ImageUpdate,
    pub company_logo: ImageUpdate,
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_by_user(&self, user_id: Uuid) -> anyhow::Result<Option<Profile>>;

    /// Insert or fully overwrite the user's row in a single statement.
    async fn upsert(&self, write: ProfileWrite) -> anyhow::Result<Profile>;
}
