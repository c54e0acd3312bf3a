use async_trait::async_trait;
use business_card_sdk::{Profile, SocialPlatform};
use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait, sea_query::OnConflict};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::repo::{ImageUpdate, ProfileRepository, ProfileWrite};

use super::entity::{self, Column, Entity as ProfileEntity};
use super::mapper::social_column;

pub struct SeaOrmProfileRepository {
    db: DatabaseConnection,
}

impl SeaOrmProfileRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load(&self, user_id: Uuid) -> anyhow::Result<Option<entity::Model>> {
        Ok(ProfileEntity::find_by_id(user_id).one(&self.db).await?)
    }
}

#[async_trait]
impl ProfileRepository for SeaOrmProfileRepository {
    async fn find_by_user(&self, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
        Ok(self.load(user_id).await?.map(Into::into))
    }

    async fn upsert(&self, write: ProfileWrite) -> anyhow::Result<Profile> {
        let now = OffsetDateTime::now_utc();
        let ProfileWrite {
            user_id,
            fields,
            profile_photo,
            company_logo,
        } = write;
        let social = |p: SocialPlatform| {
            ActiveValue::Set(fields.social_links.get(p).map(ToOwned::to_owned))
        };

        let mut active_model = entity::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            name: ActiveValue::Set(fields.name),
            surname: ActiveValue::Set(fields.surname),
            title: ActiveValue::Set(fields.title),
            company: ActiveValue::Set(fields.company),
            email: ActiveValue::Set(fields.email),
            mobile: ActiveValue::Set(fields.mobile),
            website: ActiveValue::Set(fields.website),
            bio: ActiveValue::Set(fields.bio),
            profile_photo_url: ActiveValue::Set(None),
            company_logo_url: ActiveValue::Set(None),
            line_url: social(SocialPlatform::Line),
            whatsapp_url: social(SocialPlatform::Whatsapp),
            linkedin_url: social(SocialPlatform::Linkedin),
            instagram_url: social(SocialPlatform::Instagram),
            threads_url: social(SocialPlatform::Threads),
            x_url: social(SocialPlatform::X),
            wechat_url: social(SocialPlatform::Wechat),
            facebook_url: social(SocialPlatform::Facebook),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };

        // created_at and untouched image columns keep their stored values on conflict
        let mut columns_to_update = vec![
            Column::Name,
            Column::Surname,
            Column::Title,
            Column::Company,
            Column::Email,
            Column::Mobile,
            Column::Website,
            Column::Bio,
            Column::UpdatedAt,
        ];
        columns_to_update.extend(SocialPlatform::ALL.map(social_column));

        if let ImageUpdate::Set(reference) = profile_photo {
            active_model.profile_photo_url = ActiveValue::Set(reference);
            columns_to_update.push(Column::ProfilePhotoUrl);
        }
        if let ImageUpdate::Set(reference) = company_logo {
            active_model.company_logo_url = ActiveValue::Set(reference);
            columns_to_update.push(Column::CompanyLogoUrl);
        }

        ProfileEntity::insert(active_model)
            .on_conflict(
                OnConflict::column(Column::UserId)
                    .update_columns(columns_to_update)
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;

        let model = self
            .load(user_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Record should exist after upsert"))?;

        Ok(model.into())
    }
}
