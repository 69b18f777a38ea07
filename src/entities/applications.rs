use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 应募状态，管理员审核与创作者提交共同推进
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    ToSchema,
    DeriveActiveEnum,
    EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "video_submitted")]
    VideoSubmitted,
    #[sea_orm(string_value = "revision_requested")]
    RevisionRequested,
    #[sea_orm(string_value = "video_approved")]
    VideoApproved,
    #[sea_orm(string_value = "content_uploaded")]
    ContentUploaded,
    #[sea_orm(string_value = "sns_uploaded")]
    SnsUploaded,
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 10] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Approved,
        ApplicationStatus::Rejected,
        ApplicationStatus::Cancelled,
        ApplicationStatus::VideoSubmitted,
        ApplicationStatus::RevisionRequested,
        ApplicationStatus::VideoApproved,
        ApplicationStatus::ContentUploaded,
        ApplicationStatus::SnsUploaded,
        ApplicationStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Cancelled => "cancelled",
            ApplicationStatus::VideoSubmitted => "video_submitted",
            ApplicationStatus::RevisionRequested => "revision_requested",
            ApplicationStatus::VideoApproved => "video_approved",
            ApplicationStatus::ContentUploaded => "content_uploaded",
            ApplicationStatus::SnsUploaded => "sns_uploaded",
            ApplicationStatus::Completed => "completed",
        }
    }

    /// 终态：不再接受任何提交
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Rejected | ApplicationStatus::Cancelled | ApplicationStatus::Completed
        )
    }

    /// 已被选中（可以查看共享素材）
    pub fn is_selected(&self) -> bool {
        !matches!(
            self,
            ApplicationStatus::Pending | ApplicationStatus::Rejected | ApplicationStatus::Cancelled
        )
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown application status: {s}"))
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "applications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub campaign_id: i64,
    pub user_id: i64,
    pub status: ApplicationStatus,
    pub message: Option<String>,
    pub shipping_name: Option<String>,
    pub shipping_phone: Option<String>,
    pub shipping_postal_code: Option<String>,
    pub shipping_address: Option<String>,
    pub video_url: Option<String>,
    pub clean_video_url: Option<String>,
    pub sns_url: Option<String>,
    pub ad_code: Option<String>,
    pub content_url: Option<String>,
    pub revision_note: Option<String>,
    pub admin_note: Option<String>,
    pub video_submitted_at: Option<DateTime<Utc>>,
    pub sns_submitted_at: Option<DateTime<Utc>>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::campaigns::Entity",
        from = "Column::CampaignId",
        to = "super::campaigns::Column::Id",
        on_delete = "Cascade"
    )]
    Campaign,
    #[sea_orm(
        belongs_to = "super::user_profiles::Entity",
        from = "Column::UserId",
        to = "super::user_profiles::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::campaigns::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Campaign.def()
    }
}

impl Related<super::user_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_string_round_trip() {
        for status in ApplicationStatus::ALL {
            assert_eq!(ApplicationStatus::from_str(status.as_str()), Ok(status));
            assert_eq!(status.to_string(), status.as_str());
        }
        assert!(ApplicationStatus::from_str("shipped").is_err());
    }

    #[test]
    fn test_terminal_and_selected() {
        assert!(ApplicationStatus::Completed.is_terminal());
        assert!(!ApplicationStatus::VideoSubmitted.is_terminal());
        assert!(ApplicationStatus::Approved.is_selected());
        assert!(!ApplicationStatus::Pending.is_selected());
        assert!(!ApplicationStatus::Rejected.is_selected());
    }
}
