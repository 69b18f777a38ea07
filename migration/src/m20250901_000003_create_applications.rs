use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Applications {
    Table,
    Id,
    CampaignId,
    UserId,
    Status,
    Message,
    ShippingName,
    ShippingPhone,
    ShippingPostalCode,
    ShippingAddress,
    VideoUrl,
    CleanVideoUrl,
    SnsUrl,
    AdCode,
    ContentUrl,
    RevisionNote,
    AdminNote,
    VideoSubmittedAt,
    SnsSubmittedAt,
    ReviewedAt,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Campaigns {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum UserProfiles {
    Table,
    Id,
}

const APPLICATION_STATUSES: [&str; 10] = [
    "pending",
    "approved",
    "rejected",
    "cancelled",
    "video_submitted",
    "revision_requested",
    "video_approved",
    "content_uploaded",
    "sns_uploaded",
    "completed",
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Applications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Applications::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Applications::CampaignId).big_integer().not_null())
                    .col(ColumnDef::new(Applications::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Applications::Status)
                            .string_len(32)
                            .not_null()
                            .default("pending")
                            .check(Expr::col(Applications::Status).is_in(APPLICATION_STATUSES)),
                    )
                    .col(ColumnDef::new(Applications::Message).text().null())
                    .col(ColumnDef::new(Applications::ShippingName).string_len(100).null())
                    .col(ColumnDef::new(Applications::ShippingPhone).string_len(32).null())
                    .col(
                        ColumnDef::new(Applications::ShippingPostalCode)
                            .string_len(16)
                            .null(),
                    )
                    .col(ColumnDef::new(Applications::ShippingAddress).string().null())
                    .col(ColumnDef::new(Applications::VideoUrl).string().null())
                    .col(ColumnDef::new(Applications::CleanVideoUrl).string().null())
                    .col(ColumnDef::new(Applications::SnsUrl).string().null())
                    .col(ColumnDef::new(Applications::AdCode).string_len(255).null())
                    .col(ColumnDef::new(Applications::ContentUrl).string().null())
                    .col(ColumnDef::new(Applications::RevisionNote).text().null())
                    .col(ColumnDef::new(Applications::AdminNote).text().null())
                    .col(
                        ColumnDef::new(Applications::VideoSubmittedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Applications::SnsSubmittedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Applications::ReviewedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Applications::CompletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Applications::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Applications::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_applications_campaign")
                            .from(Applications::Table, Applications::CampaignId)
                            .to(Campaigns::Table, Campaigns::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_applications_user")
                            .from(Applications::Table, Applications::UserId)
                            .to(UserProfiles::Table, UserProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 同一活动每个用户只能应募一次
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_applications_campaign_user")
                    .table(Applications::Table)
                    .col(Applications::CampaignId)
                    .col(Applications::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_applications_status")
                    .table(Applications::Table)
                    .col(Applications::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Applications::Table).to_owned())
            .await?;
        Ok(())
    }
}
