use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use business_card_sdk::{ImageSlot, ImageUpload};
use uuid::Uuid;

use crate::domain::ports::{ImageStore, ImageStoreError};

use crate::domain::intake::image_extension;

/// Stores images as `data:` URIs directly in the profile row.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineImageStore;

#[async_trait]
impl ImageStore for InlineImageStore {
    async fn store(
        &self,
        _owner: Uuid,
        _slot: ImageSlot,
        upload: &ImageUpload,
    ) -> Result<String, ImageStoreError> {
        if image_extension(&upload.content_type).is_none() {
            return Err(ImageStoreError::UnsupportedType(upload.content_type.clone()));
        }
        Ok(format!(
            "data:{};base64,{}",
            upload.content_type,
            STANDARD.encode(&upload.bytes)
        ))
    }
}
