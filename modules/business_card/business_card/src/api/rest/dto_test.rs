#[cfg(test)]
mod tests {
    use super::super::*;
    use business_card_sdk::{ImageChange, Profile, SocialLinks, SocialPlatform};
    use crate::domain::card::CardView;
    use crate::domain::error::DomainError;
    use dto::{CardDto, ProfileDto, SendCardResponse, UpdateProfileRequest, parse_data_uri};
    use serde_json::json;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn profile() -> Profile {
        let mut social_links = SocialLinks::new();
        social_links.set(SocialPlatform::X, Some("https://x.com/ada".to_owned()));
        Profile {
            user_id: Uuid::new_v4(),
            name: "Ada".to_owned(),
            surname: "Lovelace".to_owned(),
            title: "Engineer".to_owned(),
            company: "Analytical Engines".to_owned(),
            email: "ada@example.com".to_owned(),
            mobile: "0912345678".to_owned(),
            website: None,
            bio: Some("n/a".to_owned()),
            profile_photo_url: None,
            company_logo_url: None,
            social_links,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn profile_dto_is_camel_case() {
        let p = profile();
        let dto = ProfileDto::new(p.clone(), format!("https://c.example/card/{}", p.user_id));
        let value = serde_json::to_value(&dto).unwrap();
        assert_eq!(value["socialLinks"]["x"], "https://x.com/ada");
        assert_eq!(value["cardUrl"], format!("https://c.example/card/{}", p.user_id));
        assert_eq!(value["createdAt"], "1970-01-01T00:00:00Z");
        assert!(value["website"].is_null());
    }

    #[test]
    fn card_dto_omits_hidden_bio() {
        let dto = CardDto::from(CardView::from_profile(&profile()));
        let value = serde_json::to_value(&dto).unwrap();
        assert!(value.get("bio").is_none());
        assert_eq!(value["socialLinks"][0]["platform"], "x");
        assert_eq!(value["fullName"], "Ada Lovelace");
    }

    #[test]
    fn image_fields_distinguish_absent_null_and_value() {
        let req: UpdateProfileRequest = serde_json::from_value(json!({
            "name": "Ada",
            "companyLogo": null,
            "profilePhoto": "data:image/png;base64,YWJj"
        }))
        .unwrap();
        let draft = req.into_draft().unwrap();
        assert_eq!(draft.company_logo, ImageChange::Clear);
        match draft.profile_photo {
            ImageChange::Replace(upload) => {
                assert_eq!(upload.content_type, "image/png");
                assert_eq!(upload.bytes, b"abc");
            }
            other => panic!("expected replace, got {other:?}"),
        }

        let req: UpdateProfileRequest = serde_json::from_value(json!({ "name": "Ada" })).unwrap();
        assert_eq!(req.into_draft().unwrap().profile_photo, ImageChange::Keep);
    }

    #[test]
    fn unknown_platform_is_a_validation_error() {
        let req: UpdateProfileRequest = serde_json::from_value(json!({
            "socialLinks": { "myspace": "myspace.com/ada" }
        }))
        .unwrap();
        let err = req.into_draft().unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "socialLinks"));
    }

    #[test]
    fn malformed_data_uri_is_rejected() {
        assert!(parse_data_uri("data:image/png,plain").is_none());
        assert!(parse_data_uri("https://x.example/a.png").is_none());
        assert!(parse_data_uri("data:image/png;base64,@@@").is_none());

        let req: UpdateProfileRequest =
            serde_json::from_value(json!({ "profilePhoto": "not-a-uri" })).unwrap();
        let err = req.into_draft().unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "profilePhoto"));
    }

    #[test]
    fn send_card_response_shape() {
        let value = serde_json::to_value(SendCardResponse::sent("re_1".to_owned())).unwrap();
        assert_eq!(value, json!({ "success": true, "message": "Card sent successfully", "emailId": "re_1" }));

        let value = serde_json::to_value(SendCardResponse::failed("Invalid email address")).unwrap();
        assert_eq!(value, json!({ "success": false, "message": "Invalid email address" }));
    }
}
