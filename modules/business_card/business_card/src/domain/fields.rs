/// Field names used in validation errors. They match the JSON API casing.
pub struct ProfileFields;

impl ProfileFields {
    pub const NAME: &'static str = "name";
    pub const SURNAME: &'static str = "surname";
    pub const TITLE: &'static str = "title";
    pub const COMPANY: &'static str = "company";
    pub const EMAIL: &'static str = "email";
    pub const MOBILE: &'static str = "mobile";
    pub const BIO: &'static str = "bio";
    pub const PROFILE_PHOTO: &'static str = "profilePhoto";
    pub const COMPANY_LOGO: &'static str = "companyLogo";
}

pub struct InviteFields;

impl InviteFields {
    pub const RECIPIENT_EMAIL: &'static str = "recipientEmail";
    pub const SENDER_NAME: &'static str = "senderName";
    pub const CARD_URL: &'static str = "cardUrl";
}
