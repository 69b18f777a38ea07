use crate::config::PayoutConfig;
use crate::entities::{
    PointTransactionType, WithdrawalStatus, bank_transfer_entity as bt,
    user_profile_entity as users, withdrawal_entity as withdrawals,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::MailService;
use crate::services::point_service::{
    NewPointTransaction, balance_of, lock_user, record_transaction,
};
use crate::utils::*;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

#[derive(Clone)]
pub struct WithdrawalService {
    pool: DatabaseConnection,
    payout: PayoutConfig,
    mail_service: MailService,
}

/// 提现金额校验：大于 0、不超过余额、不低于最低提现额
pub fn validate_withdrawal_amount(amount: i64, balance: i64, min_points: i64) -> AppResult<()> {
    if amount <= 0 {
        return Err(AppError::ValidationError(
            "Withdrawal amount must be greater than 0".to_string(),
        ));
    }
    if amount > balance {
        return Err(AppError::ValidationError(format!(
            "Insufficient points: requested {amount}, available {balance}"
        )));
    }
    if amount < min_points {
        return Err(AppError::ValidationError(format!(
            "Minimum withdrawal is {min_points} points"
        )));
    }
    Ok(())
}

pub fn next_withdrawal_status(
    action: WithdrawalAction,
    from: WithdrawalStatus,
) -> AppResult<WithdrawalStatus> {
    let to = match (action, from) {
        (WithdrawalAction::Approve, WithdrawalStatus::Pending) => WithdrawalStatus::Approved,
        (WithdrawalAction::Complete, WithdrawalStatus::Approved) => WithdrawalStatus::Completed,
        (WithdrawalAction::Reject, WithdrawalStatus::Pending | WithdrawalStatus::Approved) => {
            WithdrawalStatus::Rejected
        }
        _ => {
            return Err(AppError::ValidationError(format!(
                "Cannot {action:?} a withdrawal that is {from}"
            )));
        }
    };
    Ok(to)
}

fn points_to_yen(points: i64, yen_per_point: i64) -> AppResult<i64> {
    points
        .checked_mul(yen_per_point)
        .ok_or_else(|| AppError::ValidationError("Withdrawal amount is too large".to_string()))
}

impl WithdrawalService {
    pub fn new(pool: DatabaseConnection, payout: PayoutConfig, mail_service: MailService) -> Self {
        Self {
            pool,
            payout,
            mail_service,
        }
    }

    /// 创作者申请提现：冻结积分（写负数流水）与申请在同一事务中完成
    pub async fn request(
        &self,
        user_id: i64,
        request: CreateWithdrawalRequest,
    ) -> AppResult<WithdrawalResponse> {
        let txn = self.pool.begin().await?;

        let user = lock_user(&txn, user_id).await?;
        let account = match request.bank_account {
            Some(account) => account,
            None => BankAccount::from_profile(&user).ok_or_else(|| {
                AppError::ValidationError("Please register a bank account first".to_string())
            })?,
        };
        let account = validate_bank_account(&account)?;

        let balance = balance_of(&txn, user_id).await?;
        validate_withdrawal_amount(request.amount, balance, self.payout.min_withdrawal_points)?;
        points_to_yen(request.amount, self.payout.yen_per_point)?;

        let withdrawal = withdrawals::ActiveModel {
            user_id: Set(user_id),
            amount: Set(request.amount),
            status: Set(WithdrawalStatus::Pending),
            bank_name: Set(account.bank_name),
            branch_name: Set(account.branch_name),
            branch_code: Set(account.branch_code),
            account_type: Set(account.account_type),
            account_number: Set(account.account_number),
            account_holder: Set(account.account_holder),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        record_transaction(
            &txn,
            NewPointTransaction {
                user_id,
                transaction_type: PointTransactionType::Withdrawal,
                amount: -request.amount,
                related_application_id: None,
                related_withdrawal_id: Some(withdrawal.id),
                description: Some(format!("Withdrawal #{}", withdrawal.id)),
            },
        )
        .await?;

        txn.commit().await?;

        log::info!(
            "User {user_id} requested withdrawal {} of {} points",
            withdrawal.id,
            request.amount
        );
        Ok(withdrawal.into())
    }

    pub async fn list_mine(
        &self,
        user_id: i64,
        query: &WithdrawalQuery,
    ) -> AppResult<PaginatedResponse<WithdrawalResponse>> {
        self.list_filtered(Some(user_id), query).await
    }

    pub async fn list(&self, query: &WithdrawalQuery) -> AppResult<PaginatedResponse<WithdrawalResponse>> {
        self.list_filtered(None, query).await
    }

    async fn list_filtered(
        &self,
        user_id: Option<i64>,
        query: &WithdrawalQuery,
    ) -> AppResult<PaginatedResponse<WithdrawalResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut select = withdrawals::Entity::find();
        if let Some(user_id) = user_id {
            select = select.filter(withdrawals::Column::UserId.eq(user_id));
        }
        if let Some(status) = query.status {
            select = select.filter(withdrawals::Column::Status.eq(status));
        }

        let total = select.clone().count(&self.pool).await? as i64;
        let rows = select
            .order_by_desc(withdrawals::Column::CreatedAt)
            .order_by_desc(withdrawals::Column::Id)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;

        Ok(PaginatedResponse::new(
            rows.into_iter().map(Into::into).collect(),
            &params,
            total,
        ))
    }

    /// 管理员处理提现：批准 / 完成转账 / 拒绝并退回积分
    pub async fn process(
        &self,
        admin_id: i64,
        withdrawal_id: i64,
        request: ProcessWithdrawalRequest,
    ) -> AppResult<ProcessWithdrawalResponse> {
        let txn = self.pool.begin().await?;

        let withdrawal = withdrawals::Entity::find_by_id(withdrawal_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Withdrawal not found".to_string()))?;

        let next = next_withdrawal_status(request.action, withdrawal.status)?;
        let now = Utc::now();
        let note = request.note.filter(|n| !n.trim().is_empty());

        let bank_transfer = match request.action {
            WithdrawalAction::Complete => {
                let reference = request
                    .transfer_reference
                    .map(|r| r.trim().to_string())
                    .filter(|r| !r.is_empty())
                    .unwrap_or_else(|| {
                        format!("TR-{}-{}", now.format("%Y%m%d"), withdrawal.id)
                    });
                let transfer = bt::ActiveModel {
                    withdrawal_id: Set(withdrawal.id),
                    user_id: Set(withdrawal.user_id),
                    points: Set(withdrawal.amount),
                    amount_yen: Set(points_to_yen(withdrawal.amount, self.payout.yen_per_point)?),
                    bank_name: Set(withdrawal.bank_name.clone()),
                    branch_name: Set(withdrawal.branch_name.clone()),
                    branch_code: Set(withdrawal.branch_code.clone()),
                    account_type: Set(withdrawal.account_type),
                    account_number: Set(withdrawal.account_number.clone()),
                    account_holder: Set(withdrawal.account_holder.clone()),
                    transfer_reference: Set(reference),
                    transferred_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(|e| {
                    AppError::unique_violation_as_conflict(
                        e,
                        "A bank transfer already exists for this withdrawal",
                    )
                })?;
                Some(transfer)
            }
            WithdrawalAction::Reject => {
                record_transaction(
                    &txn,
                    NewPointTransaction {
                        user_id: withdrawal.user_id,
                        transaction_type: PointTransactionType::WithdrawalRefund,
                        amount: withdrawal.amount,
                        related_application_id: None,
                        related_withdrawal_id: Some(withdrawal.id),
                        description: Some(format!("Refund for withdrawal #{}", withdrawal.id)),
                    },
                )
                .await?;
                None
            }
            WithdrawalAction::Approve => None,
        };

        let mut am = withdrawal.clone().into_active_model();
        am.status = Set(next);
        am.processed_at = Set(Some(now));
        if note.is_some() {
            am.admin_note = Set(note);
        }
        am.updated_at = Set(Some(now));
        let updated = am.update(&txn).await?;

        txn.commit().await?;

        log::info!(
            "Admin {admin_id} processed withdrawal {withdrawal_id}: {} -> {next}",
            withdrawal.status
        );

        if let Some(transfer) = &bank_transfer {
            self.notify_completed(transfer).await;
        }

        Ok(ProcessWithdrawalResponse {
            withdrawal: updated.into(),
            bank_transfer: bank_transfer.map(Into::into),
        })
    }

    async fn notify_completed(&self, transfer: &bt::Model) {
        match users::Entity::find_by_id(transfer.user_id).one(&self.pool).await {
            Ok(Some(user)) => {
                self.mail_service
                    .notify_withdrawal_completed(&user.email, &user.name, transfer.amount_yen)
                    .await
            }
            Ok(None) => {}
            Err(e) => log::error!("Failed to load user {} for notification: {e}", transfer.user_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_withdrawal_amount_rules() {
        assert!(validate_withdrawal_amount(1000, 5000, 1000).is_ok());
        assert!(validate_withdrawal_amount(5000, 5000, 1000).is_ok());
        assert!(validate_withdrawal_amount(0, 5000, 1000).is_err());
        assert!(validate_withdrawal_amount(-10, 5000, 1000).is_err());
        assert!(validate_withdrawal_amount(5001, 5000, 1000).is_err());
        assert!(validate_withdrawal_amount(999, 5000, 1000).is_err());
    }

    #[test]
    fn test_withdrawal_amount_error_messages() {
        let err = validate_withdrawal_amount(6000, 5000, 1000).unwrap_err();
        assert!(err.to_string().contains("Insufficient"));
        let err = validate_withdrawal_amount(500, 5000, 1000).unwrap_err();
        assert!(err.to_string().contains("Minimum"));
    }

    #[test]
    fn test_withdrawal_transitions() {
        use WithdrawalStatus::*;
        assert_eq!(
            next_withdrawal_status(WithdrawalAction::Approve, Pending).unwrap(),
            Approved
        );
        assert_eq!(
            next_withdrawal_status(WithdrawalAction::Complete, Approved).unwrap(),
            Completed
        );
        assert!(next_withdrawal_status(WithdrawalAction::Complete, Pending).is_err());
        assert_eq!(
            next_withdrawal_status(WithdrawalAction::Reject, Approved).unwrap(),
            Rejected
        );
        assert!(next_withdrawal_status(WithdrawalAction::Reject, Completed).is_err());
        assert!(next_withdrawal_status(WithdrawalAction::Approve, Rejected).is_err());
    }

    #[test]
    fn test_points_to_yen() {
        assert_eq!(points_to_yen(5000, 1).unwrap(), 5000);
        assert_eq!(points_to_yen(5000, 2).unwrap(), 10000);
        assert!(matches!(
            points_to_yen(i64::MAX, 2),
            Err(AppError::ValidationError(_))
        ));
    }
}
