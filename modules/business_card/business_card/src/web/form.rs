//! The multipart intake form and the values echoed back into it.

use std::collections::{BTreeMap, HashMap};

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use business_card_sdk::{ImageChange, ImageUpload, Profile, ProfileDraft, SocialPlatform};
use serde::Serialize;

const PROFILE_PHOTO: &str = "profile_photo";
const COMPANY_LOGO: &str = "company_logo";

/// Text inputs of the intake form, as shown to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormValues {
    pub name: String,
    pub surname: String,
    pub title: String,
    pub company: String,
    pub email: String,
    pub mobile: String,
    pub website: String,
    pub bio: String,
}

impl FormValues {
    #[must_use]
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            surname: profile.surname.clone(),
            title: profile.title.clone(),
            company: profile.company.clone(),
            email: profile.email.clone(),
            mobile: profile.mobile.clone(),
            website: profile.website.clone().unwrap_or_default(),
            bio: profile.bio.clone().unwrap_or_default(),
        }
    }

    #[must_use]
    pub fn from_draft(draft: &ProfileDraft) -> Self {
        Self {
            name: draft.name.clone(),
            surname: draft.surname.clone(),
            title: draft.title.clone(),
            company: draft.company.clone(),
            email: draft.email.clone(),
            mobile: draft.mobile.clone(),
            website: draft.website.clone().unwrap_or_default(),
            bio: draft.bio.clone().unwrap_or_default(),
        }
    }
}

/// One social platform row of the form.
#[derive(Debug, Clone, Serialize)]
pub struct PlatformField {
    pub key: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub selected: bool,
    pub url: String,
}

/// Every platform in table order, marked with the caller's selection.
#[must_use]
pub fn platform_fields(selected: &BTreeMap<SocialPlatform, String>) -> Vec<PlatformField> {
    SocialPlatform::ALL
        .into_iter()
        .map(|platform| PlatformField {
            key: platform.key(),
            label: platform.label(),
            icon: platform.icon(),
            selected: selected.contains_key(&platform),
            url: selected.get(&platform).cloned().unwrap_or_default(),
        })
        .collect()
}

/// Selected platforms of a stored profile.
#[must_use]
pub fn selected_platforms(profile: &Profile) -> BTreeMap<SocialPlatform, String> {
    profile
        .social_links
        .entries()
        .map(|(platform, url)| (platform, url.to_owned()))
        .collect()
}

/// Read the submitted form into a draft.
///
/// A platform counts as selected when its `social_<key>` checkbox is
/// present; its URL comes from `<key>_url`. A new file wins over the
/// matching remove checkbox.
///
/// # Errors
/// Returns the multipart error if the body cannot be read.
pub async fn read_intake(mut multipart: Multipart) -> Result<ProfileDraft, MultipartError> {
    let mut text: HashMap<String, String> = HashMap::new();
    let mut photo = None;
    let mut logo = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(ToOwned::to_owned) else {
            continue;
        };
        if name == PROFILE_PHOTO || name == COMPANY_LOGO {
            let file_name = field.file_name().map(ToOwned::to_owned);
            let content_type = field
                .content_type()
                .unwrap_or(mime::APPLICATION_OCTET_STREAM.as_ref())
                .to_owned();
            let bytes = field.bytes().await?;
            // Browsers send an empty part when no file was picked
            if bytes.is_empty() {
                continue;
            }
            let upload = ImageUpload {
                content_type,
                file_name,
                bytes: bytes.to_vec(),
            };
            if name == PROFILE_PHOTO {
                photo = Some(upload);
            } else {
                logo = Some(upload);
            }
        } else {
            let value = field.text().await?;
            text.insert(name, value);
        }
    }

    let mut take = |key: &str| text.remove(key).unwrap_or_default();
    let mut draft = ProfileDraft {
        name: take("name"),
        surname: take("surname"),
        title: take("title"),
        company: take("company"),
        email: take("email"),
        mobile: take("mobile"),
        website: Some(take("website")),
        bio: Some(take("bio")),
        ..ProfileDraft::default()
    };
    draft.profile_photo = image_change(photo, text.contains_key("remove_profile_photo"));
    draft.company_logo = image_change(logo, text.contains_key("remove_company_logo"));
    for platform in SocialPlatform::ALL {
        if text.contains_key(&format!("social_{}", platform.key())) {
            let url = text
                .remove(&format!("{}_url", platform.key()))
                .unwrap_or_default();
            draft.social_links.insert(platform, url);
        }
    }
    Ok(draft)
}

fn image_change(upload: Option<ImageUpload>, remove: bool) -> ImageChange {
    match upload {
        Some(upload) => ImageChange::Replace(upload),
        None if remove => ImageChange::Clear,
        None => ImageChange::Keep,
    }
}
