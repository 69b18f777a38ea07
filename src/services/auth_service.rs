use crate::config::AdminConfig;
use crate::entities::{UserRole, user_profile_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::*;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(pool: DatabaseConnection, jwt_service: JwtService) -> Self {
        Self { pool, jwt_service }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        let email = normalize_email(&request.email);
        validate_email(&email)?;
        validate_password(&request.password)?;

        let name = request.name.trim();
        if name.is_empty() || name.chars().count() > 100 {
            return Err(AppError::ValidationError(
                "Name must be between 1 and 100 characters".to_string(),
            ));
        }

        // 检查邮箱是否已注册
        if self.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email is already registered".to_string()));
        }

        let password_hash = hash_password(&request.password)?;

        let user = users::ActiveModel {
            email: Set(email),
            password_hash: Set(password_hash),
            role: Set(UserRole::Creator),
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Registered creator {} ({})", user.id, user.email);
        self.issue_tokens(user)
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let email = normalize_email(&request.email);

        let user = self
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::AuthError("Invalid email or password".to_string()))?;

        // 验证密码
        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AppError::AuthError("Invalid email or password".to_string()));
        }

        self.issue_tokens(user)
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<AuthResponse> {
        let claims = self.jwt_service.verify_refresh_token(refresh_token)?;
        let user_id = claims.user_id()?;

        // 角色以数据库为准，管理员被降级后刷新即生效
        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("User no longer exists".to_string()))?;

        self.issue_tokens(user)
    }

    /// 启动时确保配置的管理员账号存在
    ///
    /// 已存在的同邮箱账号会被提升为 admin，密码不会被覆盖。
    pub async fn bootstrap_admin(&self, admin: &AdminConfig) -> AppResult<()> {
        if !admin.is_configured() {
            log::info!("Admin bootstrap skipped: ADMIN_EMAIL / ADMIN_PASSWORD not set");
            return Ok(());
        }

        let email = normalize_email(&admin.email);
        validate_email(&email)?;

        match self.find_by_email(&email).await? {
            Some(user) if user.is_admin() => {
                log::info!("Admin account {email} already present");
            }
            Some(user) => {
                let mut am = user.into_active_model();
                am.role = Set(UserRole::Admin);
                am.updated_at = Set(Some(Utc::now()));
                am.update(&self.pool).await?;
                log::warn!("Promoted existing profile {email} to admin");
            }
            None => {
                validate_password(&admin.password)?;
                let password_hash = hash_password(&admin.password)?;
                users::ActiveModel {
                    email: Set(email.clone()),
                    password_hash: Set(password_hash),
                    role: Set(UserRole::Admin),
                    name: Set(admin.name.clone().unwrap_or_else(|| "Administrator".to_string())),
                    ..Default::default()
                }
                .insert(&self.pool)
                .await?;
                log::info!("Created admin account {email}");
            }
        }

        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<users::Model>> {
        Ok(users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.pool)
            .await?)
    }

    fn issue_tokens(&self, user: users::Model) -> AppResult<AuthResponse> {
        let access_token = self.jwt_service.generate_access_token(user.id, user.role)?;
        let refresh_token = self.jwt_service.generate_refresh_token(user.id, user.role)?;

        Ok(AuthResponse {
            user: UserProfileResponse::from(user),
            access_token,
            refresh_token,
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }
}
