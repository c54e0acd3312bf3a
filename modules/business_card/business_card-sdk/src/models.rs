//! Public models for the business card module.
//!
//! These are transport-agnostic data structures that define the contract
//! between the business card module and its consumers.

use std::collections::BTreeMap;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::social::{SocialLinks, SocialPlatform};

/// Stored profile. One per user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub user_id: Uuid,
    pub name: String,
    pub surname: String,
    pub title: String,
    pub company: String,
    pub email: String,
    pub mobile: String,
    pub website: Option<String>,
    pub bio: Option<String>,
    /// Image reference: inline data URI or object-store URL.
    pub profile_photo_url: Option<String>,
    pub company_logo_url: Option<String>,
    pub social_links: SocialLinks,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Profile {
    /// `"<name> <surname>"`, used as the sender name when sharing.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

/// Raw intake submission, before normalization.
///
/// `social_links` holds only the platforms the user selected; the URL may
/// still be blank. Platforms absent from the map end up with no URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    pub name: String,
    pub surname: String,
    pub title: String,
    pub company: String,
    pub email: String,
    pub mobile: String,
    pub website: Option<String>,
    pub bio: Option<String>,
    pub social_links: BTreeMap<SocialPlatform, String>,
    pub profile_photo: ImageChange,
    pub company_logo: ImageChange,
}

/// What to do with one image column on save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageChange {
    /// Leave the stored reference untouched.
    #[default]
    Keep,
    Replace(ImageUpload),
    Clear,
}

/// An uploaded image file.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub content_type: String,
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("content_type", &self.content_type)
            .field("file_name", &self.file_name)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSlot {
    ProfilePhoto,
    CompanyLogo,
}

impl ImageSlot {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProfilePhoto => "profile_photo",
            Self::CompanyLogo => "company_logo",
        }
    }
}

/// Request to email a card link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardInvite {
    pub recipient_email: String,
    pub sender_name: String,
    pub card_url: String,
}

/// Identifier the email provider assigned to a sent message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailReceipt {
    pub id: String,
}
