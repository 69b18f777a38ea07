use crate::entities::{PointTransactionType, point_transaction_entity as pt};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PointBalanceResponse {
    pub balance: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct PointHistoryQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdjustPointsRequest {
    pub user_id: i64,
    /// 正数为增加，负数为扣除，不能为 0
    pub amount: i64,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PointTransactionResponse {
    pub id: i64,
    pub transaction_type: PointTransactionType,
    pub amount: i64,
    pub related_application_id: Option<i64>,
    pub related_withdrawal_id: Option<i64>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<pt::Model> for PointTransactionResponse {
    fn from(m: pt::Model) -> Self {
        Self {
            id: m.id,
            transaction_type: m.transaction_type,
            amount: m.amount,
            related_application_id: m.related_application_id,
            related_withdrawal_id: m.related_withdrawal_id,
            description: m.description,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}
