use business_card_sdk::{Profile, SocialLinks, SocialPlatform};

use super::entity::{Column, Model};

/// Column holding the URL for `platform`.
#[must_use]
pub fn social_column(platform: SocialPlatform) -> Column {
    match platform {
        SocialPlatform::Line => Column::LineUrl,
        SocialPlatform::Whatsapp => Column::WhatsappUrl,
        SocialPlatform::Linkedin => Column::LinkedinUrl,
        SocialPlatform::Instagram => Column::InstagramUrl,
        SocialPlatform::Threads => Column::ThreadsUrl,
        SocialPlatform::X => Column::XUrl,
        SocialPlatform::Wechat => Column::WechatUrl,
        SocialPlatform::Facebook => Column::FacebookUrl,
    }
}

fn social_value(model: &Model, platform: SocialPlatform) -> Option<&String> {
    match platform {
        SocialPlatform::Line => model.line_url.as_ref(),
        SocialPlatform::Whatsapp => model.whatsapp_url.as_ref(),
        SocialPlatform::Linkedin => model.linkedin_url.as_ref(),
        SocialPlatform::Instagram => model.instagram_url.as_ref(),
        SocialPlatform::Threads => model.threads_url.as_ref(),
        SocialPlatform::X => model.x_url.as_ref(),
        SocialPlatform::Wechat => model.wechat_url.as_ref(),
        SocialPlatform::Facebook => model.facebook_url.as_ref(),
    }
}

impl From<Model> for Profile {
    fn from(model: Model) -> Self {
        let social_links: SocialLinks = SocialPlatform::ALL
            .into_iter()
            .filter_map(|p| {
                social_value(&model, p)
                    .filter(|url| !url.is_empty())
                    .map(|url| (p, url.clone()))
            })
            .collect();

        Self {
            user_id: model.user_id,
            name: model.name,
            surname: model.surname,
            title: model.title,
            company: model.company,
            email: model.email,
            mobile: model.mobile,
            website: model.website,
            bio: model.bio,
            profile_photo_url: model.profile_photo_url,
            company_logo_url: model.company_logo_url,
            social_links,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
