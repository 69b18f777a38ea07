use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
#[serde(rename_all = "snake_case")]
pub enum PointTransactionType {
    /// 活动完成奖励（正数）
    #[sea_orm(string_value = "campaign_reward")]
    CampaignReward,
    /// 提现申请扣除（负数）
    #[sea_orm(string_value = "withdrawal")]
    Withdrawal,
    /// 提现被拒退回（正数）
    #[sea_orm(string_value = "withdrawal_refund")]
    WithdrawalRefund,
    /// 管理员手动调整
    #[sea_orm(string_value = "admin_adjustment")]
    AdminAdjustment,
}

impl std::fmt::Display for PointTransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PointTransactionType::CampaignReward => write!(f, "campaign_reward"),
            PointTransactionType::Withdrawal => write!(f, "withdrawal"),
            PointTransactionType::WithdrawalRefund => write!(f, "withdrawal_refund"),
            PointTransactionType::AdminAdjustment => write!(f, "admin_adjustment"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "point_transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub transaction_type: PointTransactionType,
    /// 带符号的积分变动
    pub amount: i64,
    pub related_application_id: Option<i64>,
    pub related_withdrawal_id: Option<i64>,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
