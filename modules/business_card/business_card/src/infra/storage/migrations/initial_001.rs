use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserProfiles::UserId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserProfiles::Name).string().not_null())
                    .col(ColumnDef::new(UserProfiles::Surname).string().not_null())
                    .col(ColumnDef::new(UserProfiles::Title).string().not_null())
                    .col(ColumnDef::new(UserProfiles::Company).string().not_null())
                    .col(ColumnDef::new(UserProfiles::Email).string().not_null())
                    .col(ColumnDef::new(UserProfiles::Mobile).string().not_null())
                    .col(ColumnDef::new(UserProfiles::Website).string())
                    .col(ColumnDef::new(UserProfiles::Bio).text())
                    .col(ColumnDef::new(UserProfiles::ProfilePhotoUrl).text())
                    .col(ColumnDef::new(UserProfiles::CompanyLogoUrl).text())
                    .col(ColumnDef::new(UserProfiles::LineUrl).string())
                    .col(ColumnDef::new(UserProfiles::WhatsappUrl).string())
                    .col(ColumnDef::new(UserProfiles::LinkedinUrl).string())
                    .col(ColumnDef::new(UserProfiles::InstagramUrl).string())
                    .col(ColumnDef::new(UserProfiles::ThreadsUrl).string())
                    .col(ColumnDef::new(UserProfiles::XUrl).string())
                    .col(ColumnDef::new(UserProfiles::WechatUrl).string())
                    .col(ColumnDef::new(UserProfiles::FacebookUrl).string())
                    .col(
                        ColumnDef::new(UserProfiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserProfiles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UserProfiles {
    Table,
    UserId,
    Name,
    Surname,
    Title,
    Company,
    Email,
    Mobile,
    Website,
    Bio,
    ProfilePhotoUrl,
    CompanyLogoUrl,
    LineUrl,
    WhatsappUrl,
    LinkedinUrl,
    InstagramUrl,
    ThreadsUrl,
    XUrl,
    WechatUrl,
    FacebookUrl,
    CreatedAt,
    UpdatedAt,
}
