use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum UserProfiles {
    Table,
    Id,
    Email,
    PasswordHash,
    Role,
    Name,
    NameKana,
    Phone,
    InstagramUrl,
    TiktokUrl,
    YoutubeUrl,
    InstagramFollowers,
    TiktokFollowers,
    YoutubeSubscribers,
    PostalCode,
    Prefecture,
    Address,
    BankName,
    BranchName,
    BranchCode,
    AccountType,
    AccountNumber,
    AccountHolder,
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
                    .table(UserProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserProfiles::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserProfiles::Email).string_len(255).not_null())
                    .col(ColumnDef::new(UserProfiles::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(UserProfiles::Role)
                            .string_len(16)
                            .not_null()
                            .default("creator"),
                    )
                    .col(ColumnDef::new(UserProfiles::Name).string_len(100).not_null())
                    .col(ColumnDef::new(UserProfiles::NameKana).string_len(100).null())
                    .col(ColumnDef::new(UserProfiles::Phone).string_len(32).null())
                    .col(ColumnDef::new(UserProfiles::InstagramUrl).string().null())
                    .col(ColumnDef::new(UserProfiles::TiktokUrl).string().null())
                    .col(ColumnDef::new(UserProfiles::YoutubeUrl).string().null())
                    .col(
                        ColumnDef::new(UserProfiles::InstagramFollowers)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::TiktokFollowers)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::YoutubeSubscribers)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(UserProfiles::PostalCode).string_len(16).null())
                    .col(ColumnDef::new(UserProfiles::Prefecture).string_len(32).null())
                    .col(ColumnDef::new(UserProfiles::Address).string().null())
                    // 收款银行账户（日本银行）
                    .col(ColumnDef::new(UserProfiles::BankName).string_len(100).null())
                    .col(ColumnDef::new(UserProfiles::BranchName).string_len(100).null())
                    .col(ColumnDef::new(UserProfiles::BranchCode).string_len(3).null())
                    .col(ColumnDef::new(UserProfiles::AccountType).string_len(16).null())
                    .col(ColumnDef::new(UserProfiles::AccountNumber).string_len(7).null())
                    .col(ColumnDef::new(UserProfiles::AccountHolder).string_len(100).null())
                    .col(
                        ColumnDef::new(UserProfiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::UpdatedAt)
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
                    .name("uq_user_profiles_email")
                    .table(UserProfiles::Table)
                    .col(UserProfiles::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserProfiles::Table).to_owned())
            .await?;
        Ok(())
    }
}
