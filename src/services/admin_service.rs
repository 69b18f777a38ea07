use crate::entities::{
    UserRole, WithdrawalStatus, application_entity as applications, campaign_entity as campaigns,
    user_profile_entity as users, withdrawal_entity as withdrawals,
};
use crate::error::AppResult;
use crate::models::*;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QuerySelect, Statement,
};
use std::collections::BTreeMap;

/// 应用依赖的全部数据表
pub const REQUIRED_TABLES: [&str; 7] = [
    "user_profiles",
    "campaigns",
    "applications",
    "withdrawals",
    "bank_transfers",
    "point_transactions",
    "creator_materials",
];

#[derive(Clone)]
pub struct AdminService {
    pool: DatabaseConnection,
}

#[derive(Debug, FromQueryResult)]
struct StatusCount {
    status: String,
    count: i64,
}

#[derive(Debug, FromQueryResult)]
struct PendingTotals {
    count: i64,
    points: i64,
}

pub fn table_statuses(existing: &[String]) -> SchemaCheckResponse {
    let tables: Vec<TableStatus> = REQUIRED_TABLES
        .iter()
        .map(|name| TableStatus {
            name: name.to_string(),
            exists: existing.iter().any(|t| t == name),
        })
        .collect();
    let all_present = tables.iter().all(|t| t.exists);
    SchemaCheckResponse {
        tables,
        all_present,
    }
}

fn to_map(rows: Vec<StatusCount>) -> BTreeMap<String, i64> {
    rows.into_iter().map(|r| (r.status, r.count)).collect()
}

impl AdminService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn dashboard_stats(&self) -> AppResult<DashboardStats> {
        let total_creators = users::Entity::find()
            .filter(users::Column::Role.eq(UserRole::Creator))
            .count(&self.pool)
            .await? as i64;

        let campaign_rows = campaigns::Entity::find()
            .select_only()
            .column(campaigns::Column::Status)
            .column_as(campaigns::Column::Id.count(), "count")
            .group_by(campaigns::Column::Status)
            .into_model::<StatusCount>()
            .all(&self.pool)
            .await?;

        let application_rows = applications::Entity::find()
            .select_only()
            .column(applications::Column::Status)
            .column_as(applications::Column::Id.count(), "count")
            .group_by(applications::Column::Status)
            .into_model::<StatusCount>()
            .all(&self.pool)
            .await?;

        let pending = withdrawals::Entity::find()
            .filter(withdrawals::Column::Status.eq(WithdrawalStatus::Pending))
            .select_only()
            .column_as(withdrawals::Column::Id.count(), "count")
            .column_as(Expr::cust("COALESCE(SUM(amount), 0)::BIGINT"), "points")
            .into_model::<PendingTotals>()
            .one(&self.pool)
            .await?;

        let (pending_withdrawals, pending_withdrawal_points) =
            pending.map(|p| (p.count, p.points)).unwrap_or((0, 0));

        Ok(DashboardStats {
            total_creators,
            campaigns_by_status: to_map(campaign_rows),
            applications_by_status: to_map(application_rows),
            pending_withdrawals,
            pending_withdrawal_points,
        })
    }

    /// 检查数据表是否齐全
    pub async fn schema_check(&self) -> AppResult<SchemaCheckResponse> {
        let stmt = Statement::from_string(
            DbBackend::Postgres,
            "SELECT table_name::TEXT AS table_name FROM information_schema.tables \
             WHERE table_schema = current_schema()",
        );
        let rows = self.pool.query_all(stmt).await?;

        let mut existing = Vec::with_capacity(rows.len());
        for row in rows {
            existing.push(row.try_get::<String>("", "table_name")?);
        }

        let report = table_statuses(&existing);
        if !report.all_present {
            let missing: Vec<&str> = report
                .tables
                .iter()
                .filter(|t| !t.exists)
                .map(|t| t.name.as_str())
                .collect();
            log::warn!("Schema check: missing tables {missing:?}");
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_statuses() {
        let existing: Vec<String> = REQUIRED_TABLES.iter().map(|t| t.to_string()).collect();
        let report = table_statuses(&existing);
        assert!(report.all_present);
        assert_eq!(report.tables.len(), 7);

        let partial = vec!["campaigns".to_string(), "seaql_migrations".to_string()];
        let report = table_statuses(&partial);
        assert!(!report.all_present);
        assert_eq!(report.tables.iter().filter(|t| t.exists).count(), 1);
    }
}
