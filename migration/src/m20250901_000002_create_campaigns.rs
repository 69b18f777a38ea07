use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Campaigns {
    Table,
    Id,
    Brand,
    Title,
    Description,
    Requirements,
    RewardPoints,
    Platforms,
    RecruitCount,
    ApplicationDeadline,
    VideoDeadline,
    SnsDeadline,
    Status,
    GoogleDriveUrl,
    GoogleSlidesUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Campaigns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Campaigns::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Campaigns::Brand).string_len(255).not_null())
                    .col(ColumnDef::new(Campaigns::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Campaigns::Description).text().null())
                    .col(ColumnDef::new(Campaigns::Requirements).text().null())
                    .col(
                        ColumnDef::new(Campaigns::RewardPoints)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    // JSON 数组: ["instagram", "tiktok", ...]
                    .col(
                        ColumnDef::new(Campaigns::Platforms)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(ColumnDef::new(Campaigns::RecruitCount).integer().null())
                    .col(ColumnDef::new(Campaigns::ApplicationDeadline).date().null())
                    .col(ColumnDef::new(Campaigns::VideoDeadline).date().null())
                    .col(ColumnDef::new(Campaigns::SnsDeadline).date().null())
                    .col(
                        ColumnDef::new(Campaigns::Status)
                            .string_len(16)
                            .not_null()
                            .default("draft"),
                    )
                    .col(ColumnDef::new(Campaigns::GoogleDriveUrl).string().null())
                    .col(ColumnDef::new(Campaigns::GoogleSlidesUrl).string().null())
                    .col(
                        ColumnDef::new(Campaigns::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Campaigns::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_campaigns_status")
                    .table(Campaigns::Table)
                    .col(Campaigns::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Campaigns::Table).to_owned())
            .await?;
        Ok(())
    }
}
