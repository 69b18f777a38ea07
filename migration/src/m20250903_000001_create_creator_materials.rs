use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum CreatorMaterials {
    Table,
    Id,
    CampaignId,
    UserId,
    DriveUrl,
    SlidesUrl,
    Notes,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Campaigns {
    Table,
    Id,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CreatorMaterials::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CreatorMaterials::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CreatorMaterials::CampaignId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CreatorMaterials::UserId).big_integer().not_null())
                    .col(ColumnDef::new(CreatorMaterials::DriveUrl).string().null())
                    .col(ColumnDef::new(CreatorMaterials::SlidesUrl).string().null())
                    .col(ColumnDef::new(CreatorMaterials::Notes).text().null())
                    .col(ColumnDef::new(CreatorMaterials::CreatedBy).big_integer().not_null())
                    .col(
                        ColumnDef::new(CreatorMaterials::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CreatorMaterials::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_creator_materials_campaign")
                            .from(CreatorMaterials::Table, CreatorMaterials::CampaignId)
                            .to(Campaigns::Table, Campaigns::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_creator_materials_campaign_user")
                    .table(CreatorMaterials::Table)
                    .col(CreatorMaterials::CampaignId)
                    .col(CreatorMaterials::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CreatorMaterials::Table).to_owned())
            .await?;
        Ok(())
    }
}
