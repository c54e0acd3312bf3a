//! REST DTOs for the business card module.

use std::collections::BTreeMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use business_card_sdk::{
    CardInvite, ImageChange, ImageUpload, Profile, ProfileDraft, SocialPlatform,
};
use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::card::CardView;
use crate::domain::error::DomainError;
use crate::domain::fields::ProfileFields;

/// The caller's stored profile.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDto {
    pub user_id: Uuid,
    pub name: String,
    pub surname: String,
    pub title: String,
    pub company: String,
    pub email: String,
    pub mobile: String,
    pub website: Option<String>,
    pub bio: Option<String>,
    pub profile_photo_url: Option<String>,
    pub company_logo_url: Option<String>,
    /// Platform key to URL, only for platforms with a link.
    pub social_links: BTreeMap<String, String>,
    /// Public share URL of this card.
    pub card_url: String,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: OffsetDateTime,
}

impl ProfileDto {
    #[must_use]
    pub fn new(profile: Profile, card_url: String) -> Self {
        let social_links = social_map(&profile);
        Self {
            user_id: profile.user_id,
            name: profile.name,
            surname: profile.surname,
            title: profile.title,
            company: profile.company,
            email: profile.email,
            mobile: profile.mobile,
            website: profile.website,
            bio: profile.bio,
            profile_photo_url: profile.profile_photo_url,
            company_logo_url: profile.company_logo_url,
            social_links,
            card_url,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

fn social_map(profile: &Profile) -> BTreeMap<String, String> {
    profile
        .social_links
        .entries()
        .map(|(platform, url)| (platform.key().to_owned(), url.to_owned()))
        .collect()
}

/// Full replacement of the caller's profile.
///
/// `profilePhoto` and `companyLogo` take a `data:<mime>;base64,` URI to
/// replace the image, `null` to clear it, or can be omitted to keep it.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub surname: String,
    pub title: String,
    pub company: String,
    pub email: String,
    pub mobile: String,
    pub website: Option<String>,
    pub bio: Option<String>,
    /// Selected platforms and their URLs. Platforms not listed are cleared.
    pub social_links: BTreeMap<String, String>,
    #[serde(deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub profile_photo: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub company_logo: Option<Option<String>>,
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field (`None`).
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl UpdateProfileRequest {
    /// Convert into a draft, decoding inline images.
    ///
    /// # Errors
    /// `DomainError::Validation` for unknown platforms or malformed data URIs.
    pub fn into_draft(self) -> Result<ProfileDraft, DomainError> {
        let mut social_links = BTreeMap::new();
        for (key, url) in self.social_links {
            let platform = SocialPlatform::from_key(&key).ok_or_else(|| {
                DomainError::validation("socialLinks", format!("Unknown social platform '{key}'"))
            })?;
            social_links.insert(platform, url);
        }

        Ok(ProfileDraft {
            name: self.name,
            surname: self.surname,
            title: self.title,
            company: self.company,
            email: self.email,
            mobile: self.mobile,
            website: self.website,
            bio: self.bio,
            social_links,
            profile_photo: image_change(ProfileFields::PROFILE_PHOTO, self.profile_photo)?,
            company_logo: image_change(ProfileFields::COMPANY_LOGO, self.company_logo)?,
        })
    }
}

fn image_change(field: &str, value: Option<Option<String>>) -> Result<ImageChange, DomainError> {
    match value {
        None => Ok(ImageChange::Keep),
        Some(None) => Ok(ImageChange::Clear),
        Some(Some(uri)) => parse_data_uri(&uri)
            .map(ImageChange::Replace)
            .ok_or_else(|| DomainError::validation(field, "Image must be a base64 data URI")),
    }
}

/// Decode `data:<mime>;base64,<payload>`.
#[must_use]
pub fn parse_data_uri(uri: &str) -> Option<ImageUpload> {
    let rest = uri.trim().strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let content_type = meta.strip_suffix(";base64")?;
    let bytes = STANDARD.decode(payload).ok()?;
    Some(ImageUpload {
        content_type: content_type.to_owned(),
        file_name: None,
        bytes,
    })
}

/// Public card as JSON. Fields the card page hides are absent.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardDto {
    pub user_id: Uuid,
    pub full_name: String,
    pub title: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_logo_url: Option<String>,
    pub social_links: Vec<SocialLinkDto>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SocialLinkDto {
    pub platform: String,
    pub label: String,
    pub url: String,
}

impl From<CardView> for CardDto {
    fn from(view: CardView) -> Self {
        Self {
            user_id: view.user_id,
            full_name: view.full_name,
            title: view.title,
            company: view.company,
            email: view.email,
            mobile: view.mobile,
            website: view.website,
            bio: view.bio,
            profile_photo_url: view.profile_photo_url,
            company_logo_url: view.company_logo_url,
            social_links: view
                .socials
                .into_iter()
                .map(|s| SocialLinkDto {
                    platform: s.key.to_owned(),
                    label: s.label.to_owned(),
                    url: s.url,
                })
                .collect(),
        }
    }
}

/// Body of `POST /api/send-card`. Missing fields deserialize as empty so the
/// handler can answer with its own message.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SendCardRequest {
    pub recipient_email: String,
    pub sender_name: String,
    pub card_url: String,
}

impl From<SendCardRequest> for CardInvite {
    fn from(req: SendCardRequest) -> Self {
        Self {
            recipient_email: req.recipient_email,
            sender_name: req.sender_name,
            card_url: req.card_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendCardResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_id: Option<String>,
}

impl SendCardResponse {
    #[must_use]
    pub fn sent(email_id: String) -> Self {
        Self {
            success: true,
            message: "Card sent successfully".to_owned(),
            email_id: Some(email_id),
        }
    }

    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            email_id: None,
        }
    }
}
