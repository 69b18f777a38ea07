use super::user_profiles::AccountType;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// 实际完成的银行转账记录（每个提现最多一条）
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "bank_transfers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub withdrawal_id: i64,
    pub user_id: i64,
    pub points: i64,
    pub amount_yen: i64,
    pub bank_name: String,
    pub branch_name: String,
    pub branch_code: String,
    pub account_type: AccountType,
    pub account_number: String,
    pub account_holder: String,
    pub transfer_reference: String,
    pub transferred_at: DateTime<Utc>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::withdrawals::Entity",
        from = "Column::WithdrawalId",
        to = "super::withdrawals::Column::Id"
    )]
    Withdrawal,
}

impl Related<super::withdrawals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Withdrawal.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
