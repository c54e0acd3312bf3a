use std::path::PathBuf;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use business_card_sdk::{ImageSlot, ImageUpload};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::ports::{ImageStore, ImageStoreError};

use crate::domain::intake::image_extension;

/// Writes images to a directory and returns their public URL.
///
/// Keys are content addressed (`<owner>/<slot>-<sha256>.<ext>`), so storing
/// the same bytes twice is idempotent.
#[derive(Debug, Clone)]
pub struct ObjectImageStore {
    root: PathBuf,
    public_base_url: String,
}

impl ObjectImageStore {
    #[must_use]
    pub fn new(root: PathBuf, public_base_url: &str) -> Self {
        Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_owned(),
        }
    }

    fn object_key(owner: Uuid, slot: ImageSlot, upload: &ImageUpload, ext: &str) -> String {
        let digest = Sha256::digest(&upload.bytes);
        format!(
            "{owner}/{}-{}.{ext}",
            slot.as_str(),
            URL_SAFE_NO_PAD.encode(digest)
        )
    }
}

#[async_trait]
impl ImageStore for ObjectImageStore {
    async fn store(
        &self,
        owner: Uuid,
        slot: ImageSlot,
        upload: &ImageUpload,
    ) -> Result<String, ImageStoreError> {
        let ext = image_extension(&upload.content_type)
            .ok_or_else(|| ImageStoreError::UnsupportedType(upload.content_type.clone()))?;
        let key = Self::object_key(owner, slot, upload, ext);

        let path = self.root.join(&key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &upload.bytes).await?;
        tracing::debug!(key = %key, "image object written");

        Ok(format!("{}/{key}", self.public_base_url))
    }

    async fn prune(
        &self,
        owner: Uuid,
        slot: ImageSlot,
        current: Option<&str>,
    ) -> Result<(), ImageStoreError> {
        let dir = self.root.join(owner.to_string());
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(err.into()),
        };

        let prefix = format!("{}-", slot.as_str());
        let keep = current.and_then(|url| url.rsplit('/').next());
        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if name.starts_with(&prefix) && Some(name) != keep {
                tokio::fs::remove_file(entry.path()).await?;
                tracing::debug!(%owner, file = name, "stale image object removed");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(bytes: &[u8]) -> ImageUpload {
        ImageUpload {
            content_type: "image/png".to_owned(),
            file_name: Some("me.png".to_owned()),
            bytes: bytes.to_vec(),
        }
    }

    #[tokio::test]
    async fn writes_file_and_returns_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectImageStore::new(dir.path().to_path_buf(), "/media/");
        let owner = Uuid::new_v4();

        let url = store
            .store(owner, ImageSlot::ProfilePhoto, &png(b"first"))
            .await
            .unwrap();

        let prefix = format!("/media/{owner}/profile_photo-");
        assert!(url.starts_with(&prefix), "{url}");
        assert!(url.ends_with(".png"));

        let key = url.trim_start_matches("/media/");
        let written = std::fs::read(dir.path().join(key)).unwrap();
        assert_eq!(written, b"first");
    }

    #[tokio::test]
    async fn same_bytes_same_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectImageStore::new(dir.path().to_path_buf(), "/media");
        let owner = Uuid::new_v4();

        let a = store
            .store(owner, ImageSlot::CompanyLogo, &png(b"logo"))
            .await
            .unwrap();
        let b = store
            .store(owner, ImageSlot::CompanyLogo, &png(b"logo"))
            .await
            .unwrap();
        let c = store
            .store(owner, ImageSlot::CompanyLogo, &png(b"other"))
            .await
            .unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    fn files_of(dir: &std::path::Path, owner: Uuid) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir.join(owner.to_string()))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn prune_keeps_current_and_other_slot() {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectImageStore::new(dir.path().to_path_buf(), "/media");
        let owner = Uuid::new_v4();

        store
            .store(owner, ImageSlot::ProfilePhoto, &png(b"old"))
            .await
            .unwrap();
        let logo = store
            .store(owner, ImageSlot::CompanyLogo, &png(b"logo"))
            .await
            .unwrap();
        let current = store
            .store(owner, ImageSlot::ProfilePhoto, &png(b"new"))
            .await
            .unwrap();

        store
            .prune(owner, ImageSlot::ProfilePhoto, Some(&current))
            .await
            .unwrap();

        let mut expected: Vec<String> = [logo, current]
            .iter()
            .map(|url| url.rsplit('/').next().unwrap().to_owned())
            .collect();
        expected.sort();
        assert_eq!(files_of(dir.path(), owner), expected);
    }

    #[tokio::test]
    async fn prune_after_clear_removes_slot_and_tolerates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectImageStore::new(dir.path().to_path_buf(), "/media");
        let owner = Uuid::new_v4();

        store
            .prune(owner, ImageSlot::CompanyLogo, None)
            .await
            .unwrap();

        store
            .store(owner, ImageSlot::CompanyLogo, &png(b"logo"))
            .await
            .unwrap();
        store
            .prune(owner, ImageSlot::CompanyLogo, None)
            .await
            .unwrap();
        assert!(files_of(dir.path(), owner).is_empty());
    }
}
