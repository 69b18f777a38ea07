use crate::entities::{UserRole, user_profile_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::*;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

#[derive(Clone)]
pub struct ProfileService {
    pool: DatabaseConnection,
}

/// 空字符串视为清空该字段
fn optional_text(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

const MAX_FOLLOWER_COUNT: i64 = 1_000_000_000;

fn check_follower_count(field: &str, value: Option<i64>) -> AppResult<()> {
    match value {
        Some(v) if v < 0 => Err(AppError::ValidationError(format!(
            "{field} must not be negative"
        ))),
        Some(v) if v > MAX_FOLLOWER_COUNT => Err(AppError::ValidationError(format!(
            "{field} is too large (max {MAX_FOLLOWER_COUNT})"
        ))),
        _ => Ok(()),
    }
}

impl ProfileService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn find_user(&self, user_id: i64) -> AppResult<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User profile not found".to_string()))
    }

    pub async fn get_profile(&self, user_id: i64) -> AppResult<UserProfileResponse> {
        Ok(self.find_user(user_id).await?.into())
    }

    pub async fn update_profile(
        &self,
        user_id: i64,
        request: UpdateProfileRequest,
    ) -> AppResult<UserProfileResponse> {
        if request.is_empty() {
            return Err(AppError::ValidationError("No fields to update".to_string()));
        }

        check_follower_count("instagram_followers", request.instagram_followers)?;
        check_follower_count("tiktok_followers", request.tiktok_followers)?;
        check_follower_count("youtube_subscribers", request.youtube_subscribers)?;

        if let Some(name) = &request.name
            && name.trim().is_empty()
        {
            return Err(AppError::ValidationError("Name must not be empty".to_string()));
        }
        if let Some(postal_code) = &request.postal_code
            && !postal_code.trim().is_empty()
        {
            validate_postal_code(postal_code)?;
        }
        for (field, url) in [
            ("instagram_url", &request.instagram_url),
            ("tiktok_url", &request.tiktok_url),
            ("youtube_url", &request.youtube_url),
        ] {
            if let Some(url) = url
                && !url.trim().is_empty()
            {
                validate_http_url(field, url)?;
            }
        }

        let user = self.find_user(user_id).await?;
        let mut am = user.into_active_model();

        if let Some(name) = request.name {
            am.name = Set(name.trim().to_string());
        }
        if let Some(v) = request.name_kana {
            am.name_kana = Set(optional_text(v));
        }
        if let Some(v) = request.phone {
            am.phone = Set(optional_text(v));
        }
        if let Some(v) = request.instagram_url {
            am.instagram_url = Set(optional_text(v));
        }
        if let Some(v) = request.tiktok_url {
            am.tiktok_url = Set(optional_text(v));
        }
        if let Some(v) = request.youtube_url {
            am.youtube_url = Set(optional_text(v));
        }
        if let Some(v) = request.instagram_followers {
            am.instagram_followers = Set(v);
        }
        if let Some(v) = request.tiktok_followers {
            am.tiktok_followers = Set(v);
        }
        if let Some(v) = request.youtube_subscribers {
            am.youtube_subscribers = Set(v);
        }
        if let Some(v) = request.postal_code {
            am.postal_code = Set(optional_text(to_ascii_digits(&v)));
        }
        if let Some(v) = request.prefecture {
            am.prefecture = Set(optional_text(v));
        }
        if let Some(v) = request.address {
            am.address = Set(optional_text(v));
        }
        am.updated_at = Set(Some(Utc::now()));

        let updated = am.update(&self.pool).await?;
        Ok(updated.into())
    }

    /// 登记提现用的银行账户
    pub async fn update_bank_account(
        &self,
        user_id: i64,
        account: BankAccount,
    ) -> AppResult<UserProfileResponse> {
        let account = validate_bank_account(&account)?;

        let user = self.find_user(user_id).await?;
        let mut am = user.into_active_model();
        am.bank_name = Set(Some(account.bank_name));
        am.branch_name = Set(Some(account.branch_name));
        am.branch_code = Set(Some(account.branch_code));
        am.account_type = Set(Some(account.account_type));
        am.account_number = Set(Some(account.account_number));
        am.account_holder = Set(Some(account.account_holder));
        am.updated_at = Set(Some(Utc::now()));

        let updated = am.update(&self.pool).await?;
        log::info!("User {user_id} updated bank account");
        Ok(updated.into())
    }

    /// 管理后台：创作者列表
    pub async fn list_profiles(
        &self,
        query: &ProfileQuery,
    ) -> AppResult<PaginatedResponse<UserProfileResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut select = users::Entity::find().filter(users::Column::Role.eq(UserRole::Creator));
        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            select = select.filter(
                Condition::any()
                    .add(users::Column::Name.contains(search))
                    .add(users::Column::Email.contains(search)),
            );
        }

        let total = select.clone().count(&self.pool).await? as i64;
        let rows = select
            .order_by_desc(users::Column::CreatedAt)
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text("  ".to_string()), None);
        assert_eq!(optional_text(" 東京都 ".to_string()), Some("東京都".to_string()));
    }

    #[test]
    fn test_follower_counts_must_not_be_negative() {
        assert!(check_follower_count("tiktok_followers", Some(-1)).is_err());
        assert!(check_follower_count("tiktok_followers", Some(0)).is_ok());
        assert!(check_follower_count("tiktok_followers", None).is_ok());
    }

    #[test]
    fn test_follower_counts_are_capped() {
        assert!(check_follower_count("instagram_followers", Some(MAX_FOLLOWER_COUNT)).is_ok());
        assert!(matches!(
            check_follower_count("instagram_followers", Some(MAX_FOLLOWER_COUNT + 1)),
            Err(AppError::ValidationError(_))
        ));
        assert!(check_follower_count("instagram_followers", Some(i64::MAX)).is_err());
    }
}
