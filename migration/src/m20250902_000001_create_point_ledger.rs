use sea_orm_migration::prelude::*;

/// 积分流水 (amount 带符号，余额 = SUM(amount))
#[derive(DeriveIden)]
enum PointTransactions {
    Table,
    Id,
    UserId,
    TransactionType,
    Amount,
    RelatedApplicationId,
    RelatedWithdrawalId,
    Description,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Withdrawals {
    Table,
    Id,
    UserId,
    Amount,
    Status,
    BankName,
    BranchName,
    BranchCode,
    AccountType,
    AccountNumber,
    AccountHolder,
    AdminNote,
    ProcessedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum BankTransfers {
    Table,
    Id,
    WithdrawalId,
    UserId,
    Points,
    AmountYen,
    BankName,
    BranchName,
    BranchCode,
    AccountType,
    AccountNumber,
    AccountHolder,
    TransferReference,
    TransferredAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum UserProfiles {
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
                    .table(Withdrawals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Withdrawals::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Withdrawals::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Withdrawals::Amount).big_integer().not_null())
                    .col(
                        ColumnDef::new(Withdrawals::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Withdrawals::BankName).string_len(100).not_null())
                    .col(ColumnDef::new(Withdrawals::BranchName).string_len(100).not_null())
                    .col(ColumnDef::new(Withdrawals::BranchCode).string_len(3).not_null())
                    .col(ColumnDef::new(Withdrawals::AccountType).string_len(16).not_null())
                    .col(ColumnDef::new(Withdrawals::AccountNumber).string_len(7).not_null())
                    .col(ColumnDef::new(Withdrawals::AccountHolder).string_len(100).not_null())
                    .col(ColumnDef::new(Withdrawals::AdminNote).text().null())
                    .col(
                        ColumnDef::new(Withdrawals::ProcessedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Withdrawals::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Withdrawals::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_withdrawals_user")
                            .from(Withdrawals::Table, Withdrawals::UserId)
                            .to(UserProfiles::Table, UserProfiles::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .check(Expr::col(Withdrawals::Amount).gt(0))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PointTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PointTransactions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PointTransactions::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PointTransactions::TransactionType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(PointTransactions::Amount).big_integer().not_null())
                    .col(
                        ColumnDef::new(PointTransactions::RelatedApplicationId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PointTransactions::RelatedWithdrawalId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(PointTransactions::Description).text().null())
                    .col(
                        ColumnDef::new(PointTransactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_point_transactions_user")
                            .from(PointTransactions::Table, PointTransactions::UserId)
                            .to(UserProfiles::Table, UserProfiles::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_point_transactions_user")
                    .table(PointTransactions::Table)
                    .col(PointTransactions::UserId)
                    .to_owned(),
            )
            .await?;

        // 每个应募的奖励只发放一次
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_point_transactions_reward \
                 ON point_transactions (related_application_id, transaction_type) \
                 WHERE related_application_id IS NOT NULL",
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BankTransfers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BankTransfers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BankTransfers::WithdrawalId).big_integer().not_null())
                    .col(ColumnDef::new(BankTransfers::UserId).big_integer().not_null())
                    .col(ColumnDef::new(BankTransfers::Points).big_integer().not_null())
                    .col(ColumnDef::new(BankTransfers::AmountYen).big_integer().not_null())
                    .col(ColumnDef::new(BankTransfers::BankName).string_len(100).not_null())
                    .col(ColumnDef::new(BankTransfers::BranchName).string_len(100).not_null())
                    .col(ColumnDef::new(BankTransfers::BranchCode).string_len(3).not_null())
                    .col(ColumnDef::new(BankTransfers::AccountType).string_len(16).not_null())
                    .col(ColumnDef::new(BankTransfers::AccountNumber).string_len(7).not_null())
                    .col(
                        ColumnDef::new(BankTransfers::AccountHolder)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BankTransfers::TransferReference)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BankTransfers::TransferredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BankTransfers::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bank_transfers_withdrawal")
                            .from(BankTransfers::Table, BankTransfers::WithdrawalId)
                            .to(Withdrawals::Table, Withdrawals::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_bank_transfers_withdrawal")
                    .table(BankTransfers::Table)
                    .col(BankTransfers::WithdrawalId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BankTransfers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PointTransactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Withdrawals::Table).to_owned())
            .await?;
        Ok(())
    }
}
