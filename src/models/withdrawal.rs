use super::BankAccount;
use crate::entities::{
    WithdrawalStatus, bank_transfer_entity as bt, withdrawal_entity as withdrawals,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateWithdrawalRequest {
    #[schema(example = 5000)]
    pub amount: i64,
    /// 不填写时使用个人资料中登记的账户
    pub bank_account: Option<BankAccount>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalAction {
    Approve,
    Complete,
    Reject,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProcessWithdrawalRequest {
    pub action: WithdrawalAction,
    /// 完成时的转账流水号，不填则自动生成
    pub transfer_reference: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct WithdrawalQuery {
    pub status: Option<WithdrawalStatus>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WithdrawalResponse {
    pub id: i64,
    pub user_id: i64,
    pub amount: i64,
    pub status: WithdrawalStatus,
    pub bank_account: BankAccount,
    pub admin_note: Option<String>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<withdrawals::Model> for WithdrawalResponse {
    fn from(m: withdrawals::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            amount: m.amount,
            status: m.status,
            bank_account: BankAccount {
                bank_name: m.bank_name,
                branch_name: m.branch_name,
                branch_code: m.branch_code,
                account_type: m.account_type,
                account_number: m.account_number,
                account_holder: m.account_holder,
            },
            admin_note: m.admin_note,
            processed_at: m.processed_at,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BankTransferResponse {
    pub id: i64,
    pub withdrawal_id: i64,
    pub points: i64,
    pub amount_yen: i64,
    pub transfer_reference: String,
    pub transferred_at: DateTime<Utc>,
}

impl From<bt::Model> for BankTransferResponse {
    fn from(m: bt::Model) -> Self {
        Self {
            id: m.id,
            withdrawal_id: m.withdrawal_id,
            points: m.points,
            amount_yen: m.amount_yen,
            transfer_reference: m.transfer_reference,
            transferred_at: m.transferred_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProcessWithdrawalResponse {
    pub withdrawal: WithdrawalResponse,
    pub bank_transfer: Option<BankTransferResponse>,
}
