use crate::entities::{AccountType, UserRole, user_profile_entity as users};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "creator@example.jp")]
    pub email: String,
    #[schema(example = "password123")]
    pub password: String,
    #[schema(example = "山田 花子")]
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "creator@example.jp")]
    pub email: String,
    #[schema(example = "password123")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserProfileResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// 个人资料更新，未提供的字段保持不变
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    #[schema(example = "山田 花子")]
    pub name: Option<String>,
    #[schema(example = "ヤマダ ハナコ")]
    pub name_kana: Option<String>,
    #[schema(example = "090-1234-5678")]
    pub phone: Option<String>,
    pub instagram_url: Option<String>,
    pub tiktok_url: Option<String>,
    pub youtube_url: Option<String>,
    pub instagram_followers: Option<i64>,
    pub tiktok_followers: Option<i64>,
    pub youtube_subscribers: Option<i64>,
    #[schema(example = "150-0001")]
    pub postal_code: Option<String>,
    #[schema(example = "東京都")]
    pub prefecture: Option<String>,
    pub address: Option<String>,
}

impl UpdateProfileRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.name_kana.is_none()
            && self.phone.is_none()
            && self.instagram_url.is_none()
            && self.tiktok_url.is_none()
            && self.youtube_url.is_none()
            && self.instagram_followers.is_none()
            && self.tiktok_followers.is_none()
            && self.youtube_subscribers.is_none()
            && self.postal_code.is_none()
            && self.prefecture.is_none()
            && self.address.is_none()
    }
}

/// 日本国内银行转账信息（振込先）
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct BankAccount {
    #[schema(example = "三菱UFJ銀行")]
    pub bank_name: String,
    #[schema(example = "渋谷支店")]
    pub branch_name: String,
    #[schema(example = "135")]
    pub branch_code: String,
    pub account_type: AccountType,
    #[schema(example = "1234567")]
    pub account_number: String,
    #[schema(example = "ヤマダ ハナコ")]
    pub account_holder: String,
}

impl BankAccount {
    pub fn from_profile(user: &users::Model) -> Option<Self> {
        Some(Self {
            bank_name: user.bank_name.clone()?,
            branch_name: user.branch_name.clone()?,
            branch_code: user.branch_code.clone()?,
            account_type: user.account_type?,
            account_number: user.account_number.clone()?,
            account_holder: user.account_holder.clone()?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserProfileResponse {
    pub id: i64,
    pub email: String,
    pub role: UserRole,
    pub name: String,
    pub name_kana: Option<String>,
    pub phone: Option<String>,
    pub instagram_url: Option<String>,
    pub tiktok_url: Option<String>,
    pub youtube_url: Option<String>,
    pub instagram_followers: i64,
    pub tiktok_followers: i64,
    pub youtube_subscribers: i64,
    pub postal_code: Option<String>,
    pub prefecture: Option<String>,
    pub address: Option<String>,
    pub bank_account: Option<BankAccount>,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for UserProfileResponse {
    fn from(user: users::Model) -> Self {
        let bank_account = BankAccount::from_profile(&user);
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            name: user.name,
            name_kana: user.name_kana,
            phone: user.phone,
            instagram_url: user.instagram_url,
            tiktok_url: user.tiktok_url,
            youtube_url: user.youtube_url,
            instagram_followers: user.instagram_followers,
            tiktok_followers: user.tiktok_followers,
            youtube_subscribers: user.youtube_subscribers,
            postal_code: user.postal_code,
            prefecture: user.prefecture,
            address: user.address,
            bank_account,
            created_at: user.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ProfileQuery {
    /// 按名字或邮箱模糊搜索
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}
