use crate::entities::{
    PointTransactionType, point_transaction_entity as pt, user_profile_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

#[derive(Clone)]
pub struct PointService {
    pool: DatabaseConnection,
}

/// 一条积分流水的写入参数
pub struct NewPointTransaction {
    pub user_id: i64,
    pub transaction_type: PointTransactionType,
    pub amount: i64,
    pub related_application_id: Option<i64>,
    pub related_withdrawal_id: Option<i64>,
    pub description: Option<String>,
}

/// 余额 = 该用户全部流水之和，在数据库中聚合
pub async fn balance_of<C: ConnectionTrait>(db: &C, user_id: i64) -> Result<i64, DbErr> {
    #[derive(Debug, FromQueryResult)]
    struct SumRow {
        total: i64,
    }

    let row = pt::Entity::find()
        .filter(pt::Column::UserId.eq(user_id))
        .select_only()
        .column_as(Expr::cust("COALESCE(SUM(amount), 0)::BIGINT"), "total")
        .into_model::<SumRow>()
        .one(db)
        .await?;
    Ok(row.map(|r| r.total).unwrap_or(0))
}

pub async fn record_transaction<C: ConnectionTrait>(
    db: &C,
    tx: NewPointTransaction,
) -> Result<pt::Model, DbErr> {
    pt::ActiveModel {
        user_id: Set(tx.user_id),
        transaction_type: Set(tx.transaction_type),
        amount: Set(tx.amount),
        related_application_id: Set(tx.related_application_id),
        related_withdrawal_id: Set(tx.related_withdrawal_id),
        description: Set(tx.description),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// 锁定用户行，串行化同一用户的扣减操作
pub async fn lock_user<C: ConnectionTrait>(db: &C, user_id: i64) -> AppResult<users::Model> {
    users::Entity::find_by_id(user_id)
        .lock_exclusive()
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("User profile not found".to_string()))
}

/// 单次人工调整的绝对值上限
const MAX_ADJUSTMENT_POINTS: u64 = 100_000_000;

fn check_adjustment(amount: i64, balance: i64) -> AppResult<()> {
    if amount == 0 {
        return Err(AppError::ValidationError(
            "Adjustment amount must not be 0".to_string(),
        ));
    }
    if amount.unsigned_abs() > MAX_ADJUSTMENT_POINTS {
        return Err(AppError::ValidationError(format!(
            "Adjustment amount must be within ±{MAX_ADJUSTMENT_POINTS}"
        )));
    }
    match balance.checked_add(amount) {
        Some(next) if next >= 0 => Ok(()),
        Some(_) => Err(AppError::ValidationError(format!(
            "Adjustment would make the balance negative (current balance {balance})"
        ))),
        None => Err(AppError::ValidationError(
            "Adjustment would overflow the balance".to_string(),
        )),
    }
}

impl PointService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn get_balance(&self, user_id: i64) -> AppResult<PointBalanceResponse> {
        let balance = balance_of(&self.pool, user_id).await?;
        Ok(PointBalanceResponse { balance })
    }

    pub async fn history(
        &self,
        user_id: i64,
        query: &PointHistoryQuery,
    ) -> AppResult<PaginatedResponse<PointTransactionResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);
        let select = pt::Entity::find().filter(pt::Column::UserId.eq(user_id));

        let total = select.clone().count(&self.pool).await? as i64;
        let rows = select
            .order_by_desc(pt::Column::CreatedAt)
            .order_by_desc(pt::Column::Id)
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

    /// 管理员手动调整积分，扣减不得使余额为负
    pub async fn adjust(
        &self,
        admin_id: i64,
        request: AdjustPointsRequest,
    ) -> AppResult<PointTransactionResponse> {
        let txn = self.pool.begin().await?;

        lock_user(&txn, request.user_id).await?;
        let balance = balance_of(&txn, request.user_id).await?;
        check_adjustment(request.amount, balance)?;

        let description = request
            .description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| "Manual adjustment".to_string());

        let model = record_transaction(
            &txn,
            NewPointTransaction {
                user_id: request.user_id,
                transaction_type: PointTransactionType::AdminAdjustment,
                amount: request.amount,
                related_application_id: None,
                related_withdrawal_id: None,
                description: Some(description),
            },
        )
        .await?;

        txn.commit().await?;

        log::info!(
            "Admin {admin_id} adjusted points of user {} by {}",
            request.user_id,
            request.amount
        );
        Ok(model.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_adjustment() {
        assert!(check_adjustment(0, 100).is_err());
        assert!(check_adjustment(-100, 100).is_ok());
        assert!(check_adjustment(-101, 100).is_err());
        assert!(check_adjustment(500, 0).is_ok());
    }

    #[test]
    fn test_check_adjustment_extreme_amounts() {
        assert!(matches!(
            check_adjustment(i64::MAX, 10),
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            check_adjustment(i64::MIN, 0),
            Err(AppError::ValidationError(_))
        ));
        assert!(check_adjustment(MAX_ADJUSTMENT_POINTS as i64, 0).is_ok());
        assert!(check_adjustment(-(MAX_ADJUSTMENT_POINTS as i64) - 1, i64::MAX).is_err());
        // 余额接近上限时不能溢出
        assert!(matches!(
            check_adjustment(10, i64::MAX),
            Err(AppError::ValidationError(_))
        ));
    }
}
