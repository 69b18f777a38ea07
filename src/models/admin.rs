use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    pub total_creators: i64,
    pub campaigns_by_status: BTreeMap<String, i64>,
    pub applications_by_status: BTreeMap<String, i64>,
    pub pending_withdrawals: i64,
    pub pending_withdrawal_points: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TableStatus {
    pub name: String,
    pub exists: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SchemaCheckResponse {
    pub tables: Vec<TableStatus>,
    pub all_present: bool,
}
