//! Normalization and validation of profile submissions.
//!
//! Runs before any side effect: a draft that fails here never reaches the
//! image store or the database.

use std::sync::LazyLock;

use business_card_sdk::{ImageChange, ProfileDraft, SocialLinks, SocialPlatform};
use regex::Regex;

use super::error::DomainError;
use super::fields::ProfileFields;

#[allow(clippy::expect_used)] // literal pattern, compiled once
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static regex should not panic")
});

/// `local@domain.tld` shape check shared by intake and the notifier.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// File extension for an accepted raster image type.
///
/// Scriptable formats such as SVG and unknown subtypes are refused.
#[must_use]
pub fn image_extension(content_type: &str) -> Option<&'static str> {
    let parsed: mime::Mime = content_type.parse().ok()?;
    if parsed.type_() != mime::IMAGE {
        return None;
    }
    match parsed.subtype().as_str() {
        "png" => Some("png"),
        "jpeg" | "jpg" | "pjpeg" => Some("jpg"),
        "gif" => Some("gif"),
        "webp" => Some("webp"),
        "avif" => Some("avif"),
        "bmp" => Some("bmp"),
        _ => None,
    }
}

/// Prefix `https://` unless the URL already carries an http(s) scheme.
#[must_use]
pub fn ensure_scheme(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_owned()
    } else {
        format!("https://{url}")
    }
}

/// Limits applied at intake.
#[derive(Debug, Clone, Copy)]
pub struct IntakeRules {
    pub bio_max_chars: usize,
    pub image_max_bytes: usize,
}

impl Default for IntakeRules {
    fn default() -> Self {
        Self {
            bio_max_chars: 150,
            image_max_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Text columns of a profile after normalization. Image columns are handled
/// separately because they go through the image store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedProfile {
    pub name: String,
    pub surname: String,
    pub title: String,
    pub company: String,
    pub email: String,
    pub mobile: String,
    pub website: Option<String>,
    pub bio: Option<String>,
    pub social_links: SocialLinks,
}

/// Trim, default and validate a draft.
///
/// Only the first failing field is reported.
///
/// # Errors
/// Returns `DomainError::Validation` naming the offending field.
pub fn normalize(draft: &ProfileDraft, rules: &IntakeRules) -> Result<NormalizedProfile, DomainError> {
    let name = required(ProfileFields::NAME, "Name", &draft.name)?;
    let surname = required(ProfileFields::SURNAME, "Surname", &draft.surname)?;
    let title = required(ProfileFields::TITLE, "Title", &draft.title)?;
    let company = required(ProfileFields::COMPANY, "Company", &draft.company)?;
    let email = required(ProfileFields::EMAIL, "Email", &draft.email)?;
    if !is_valid_email(&email) {
        return Err(DomainError::validation(
            ProfileFields::EMAIL,
            "Invalid email address",
        ));
    }
    let mobile = required(ProfileFields::MOBILE, "Mobile", &draft.mobile)?;

    let website = optional(draft.website.as_deref()).map(|w| ensure_scheme(&w));
    let bio = optional(draft.bio.as_deref());
    if let Some(bio) = &bio
        && bio.chars().count() > rules.bio_max_chars
    {
        return Err(DomainError::validation(
            ProfileFields::BIO,
            format!("Bio must be at most {} characters", rules.bio_max_chars),
        ));
    }

    check_image(
        ProfileFields::PROFILE_PHOTO,
        &draft.profile_photo,
        rules.image_max_bytes,
    )?;
    check_image(
        ProfileFields::COMPANY_LOGO,
        &draft.company_logo,
        rules.image_max_bytes,
    )?;

    Ok(NormalizedProfile {
        name,
        surname,
        title,
        company,
        email,
        mobile,
        website,
        bio,
        social_links: normalize_social_links(draft),
    })
}

/// Selected platforms keep their (scheme-prefixed) URL; everything else is
/// dropped, even if text was submitted for it.
fn normalize_social_links(draft: &ProfileDraft) -> SocialLinks {
    SocialPlatform::ALL
        .into_iter()
        .filter_map(|platform| {
            let url = optional(draft.social_links.get(&platform).map(String::as_str))?;
            Some((platform, ensure_scheme(&url)))
        })
        .collect()
}

fn required(field: &str, label: &str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(field, format!("{label} is required")));
    }
    Ok(trimmed.to_owned())
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToOwned::to_owned)
}

fn check_image(field: &str, change: &ImageChange, max_bytes: usize) -> Result<(), DomainError> {
    let ImageChange::Replace(upload) = change else {
        return Ok(());
    };

    if image_extension(&upload.content_type).is_none() {
        return Err(DomainError::validation(field, "File must be a PNG, JPEG, GIF, WebP, AVIF or BMP image"));
    }
    if upload.bytes.is_empty() {
        return Err(DomainError::validation(field, "File is empty"));
    }
    if upload.bytes.len() > max_bytes {
        return Err(DomainError::validation(
            field,
            format!("Image must be at most {max_bytes} bytes"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use business_card_sdk::ImageUpload;

    fn draft() -> ProfileDraft {
        ProfileDraft {
            name: " Ada ".to_owned(),
            surname: "Lovelace".to_owned(),
            title: "Engineer".to_owned(),
            company: "Analytical Engines".to_owned(),
            email: "ada@example.com".to_owned(),
            mobile: "+44 20 7946 0000".to_owned(),
            ..ProfileDraft::default()
        }
    }

    fn field_of(err: DomainError) -> String {
        match err {
            DomainError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn trims_and_nulls_blank_optionals() {
        let mut d = draft();
        d.website = Some("   ".to_owned());
        d.bio = Some(String::new());

        let p = normalize(&d, &IntakeRules::default()).unwrap();
        assert_eq!(p.name, "Ada");
        assert_eq!(p.website, None);
        assert_eq!(p.bio, None);
        assert!(p.social_links.is_empty());
    }

    #[test]
    fn website_gains_https() {
        let mut d = draft();
        d.website = Some("www.company.com".to_owned());
        let p = normalize(&d, &IntakeRules::default()).unwrap();
        assert_eq!(p.website.as_deref(), Some("https://www.company.com"));

        d.website = Some("http://plain.example".to_owned());
        let p = normalize(&d, &IntakeRules::default()).unwrap();
        assert_eq!(p.website.as_deref(), Some("http://plain.example"));
    }

    #[test]
    fn only_selected_platforms_with_urls_survive() {
        let mut d = draft();
        d.social_links.insert(SocialPlatform::Linkedin, "linkedin.com/in/ada".to_owned());
        d.social_links.insert(SocialPlatform::X, "  ".to_owned());

        let p = normalize(&d, &IntakeRules::default()).unwrap();
        assert_eq!(
            p.social_links.get(SocialPlatform::Linkedin),
            Some("https://linkedin.com/in/ada")
        );
        assert_eq!(p.social_links.get(SocialPlatform::X), None);
        assert_eq!(p.social_links.len(), 1);
    }

    #[test]
    fn required_fields_reported_in_form_order() {
        let mut d = draft();
        d.company = String::new();
        d.mobile = String::new();
        assert_eq!(
            field_of(normalize(&d, &IntakeRules::default()).unwrap_err()),
            "company"
        );
    }

    #[test]
    fn email_shape_checked() {
        let mut d = draft();
        d.email = "not-an-email".to_owned();
        assert_eq!(
            field_of(normalize(&d, &IntakeRules::default()).unwrap_err()),
            "email"
        );
    }

    #[test]
    fn bio_limit_counts_characters() {
        let rules = IntakeRules::default();
        let mut d = draft();
        d.bio = Some("\u{e9}".repeat(150));
        assert!(normalize(&d, &rules).is_ok());

        d.bio = Some("a".repeat(151));
        assert_eq!(field_of(normalize(&d, &rules).unwrap_err()), "bio");
    }

    #[test]
    fn upload_must_be_a_small_image() {
        let rules = IntakeRules {
            bio_max_chars: 150,
            image_max_bytes: 4,
        };
        let mut d = draft();
        d.profile_photo = ImageChange::Replace(ImageUpload {
            content_type: "application/pdf".to_owned(),
            file_name: None,
            bytes: vec![1],
        });
        assert_eq!(field_of(normalize(&d, &rules).unwrap_err()), "profilePhoto");

        d.profile_photo = ImageChange::Keep;
        d.company_logo = ImageChange::Replace(ImageUpload {
            content_type: "image/png".to_owned(),
            file_name: None,
            bytes: vec![0; 5],
        });
        assert_eq!(field_of(normalize(&d, &rules).unwrap_err()), "companyLogo");
    }

    #[test]
    fn svg_uploads_are_refused() {
        let mut d = draft();
        d.profile_photo = ImageChange::Replace(ImageUpload {
            content_type: "image/svg+xml".to_owned(),
            file_name: Some("me.svg".to_owned()),
            bytes: b"<svg><script>alert(1)</script></svg>".to_vec(),
        });
        assert_eq!(
            field_of(normalize(&d, &IntakeRules::default()).unwrap_err()),
            "profilePhoto"
        );
    }

    #[test]
    fn raster_types_map_to_extensions() {
        assert_eq!(image_extension("image/png"), Some("png"));
        assert_eq!(image_extension("image/jpeg"), Some("jpg"));
        assert_eq!(image_extension("image/svg+xml"), None);
        assert_eq!(image_extension("image/x-icon"), None);
        assert_eq!(image_extension("text/plain"), None);
        assert_eq!(image_extension("garbage"), None);
    }

    #[test]
    fn email_regex_matches_basic_shape() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.de"));
        assert!(!is_valid_email("@c.de"));
    }
}
