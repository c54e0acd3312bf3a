//! Read-only presentation of a stored profile.

use business_card_sdk::{Profile, SocialPlatform};
use serde::Serialize;
use uuid::Uuid;

/// Placeholder bio that is stored but never shown.
pub const HIDDEN_BIO: &str = "n/a";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialLinkView {
    pub key: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub url: String,
}

/// Everything a card page shows. Absent values are `None` so templates can
/// skip them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub user_id: Uuid,
    pub full_name: String,
    pub title: String,
    pub company: String,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub website: Option<String>,
    pub bio: Option<String>,
    pub profile_photo_url: Option<String>,
    pub company_logo_url: Option<String>,
    /// Present links in platform table order.
    pub socials: Vec<SocialLinkView>,
}

impl CardView {
    #[must_use]
    pub fn from_profile(profile: &Profile) -> Self {
        let socials = SocialPlatform::ALL
            .into_iter()
            .filter_map(|platform| {
                profile
                    .social_links
                    .get(platform)
                    .map(|url| SocialLinkView {
                        key: platform.key(),
                        label: platform.label(),
                        icon: platform.icon(),
                        url: url.to_owned(),
                    })
            })
            .collect();

        Self {
            user_id: profile.user_id,
            full_name: profile.display_name(),
            title: profile.title.clone(),
            company: profile.company.clone(),
            email: non_empty(&profile.email),
            mobile: non_empty(&profile.mobile),
            website: profile.website.clone().filter(|w| !w.is_empty()),
            bio: profile
                .bio
                .clone()
                .filter(|b| !b.is_empty() && b != HIDDEN_BIO),
            profile_photo_url: profile.profile_photo_url.clone(),
            company_logo_url: profile.company_logo_url.clone(),
            socials,
        }
    }

    /// `"title | company"` line under the name.
    #[must_use]
    pub fn headline(&self) -> String {
        format!("{} | {}", self.title, self.company)
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_owned())
}
