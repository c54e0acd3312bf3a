use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
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
    pub line_url: Option<String>,
    pub whatsapp_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub instagram_url: Option<String>,
    pub threads_url: Option<String>,
    pub x_url: Option<String>,
    pub wechat_url: Option<String>,
    pub facebook_url: Option<String>,
    pub created_at: TimeDateTimeWithTimeZone,
    pub updated_at: TimeDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
