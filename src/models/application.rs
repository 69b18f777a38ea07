use crate::entities::{
    ApplicationStatus, application_entity as applications, user_profile_entity as users,
};
use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 管理员审核动作
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    Approve,
    Reject,
    RequestRevision,
    ApproveVideo,
    Complete,
    Cancel,
}

/// 创作者提交动作
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CreatorAction {
    SubmitVideo,
    SubmitSns,
    UploadContent,
    Cancel,
}

const NON_TERMINAL: &[ApplicationStatus] = &[
    ApplicationStatus::Pending,
    ApplicationStatus::Approved,
    ApplicationStatus::VideoSubmitted,
    ApplicationStatus::RevisionRequested,
    ApplicationStatus::VideoApproved,
    ApplicationStatus::ContentUploaded,
    ApplicationStatus::SnsUploaded,
];

impl ReviewAction {
    /// (允许的起始状态, 目标状态)
    pub fn transition(&self) -> (&'static [ApplicationStatus], ApplicationStatus) {
        match self {
            ReviewAction::Approve => (&[ApplicationStatus::Pending], ApplicationStatus::Approved),
            ReviewAction::Reject => (
                &[ApplicationStatus::Pending, ApplicationStatus::Approved],
                ApplicationStatus::Rejected,
            ),
            ReviewAction::RequestRevision => (
                &[ApplicationStatus::VideoSubmitted],
                ApplicationStatus::RevisionRequested,
            ),
            ReviewAction::ApproveVideo => (
                &[ApplicationStatus::VideoSubmitted],
                ApplicationStatus::VideoApproved,
            ),
            ReviewAction::Complete => (
                &[
                    ApplicationStatus::SnsUploaded,
                    ApplicationStatus::ContentUploaded,
                ],
                ApplicationStatus::Completed,
            ),
            ReviewAction::Cancel => (NON_TERMINAL, ApplicationStatus::Cancelled),
        }
    }

    pub fn next_status(&self, from: ApplicationStatus) -> AppResult<ApplicationStatus> {
        let (allowed, to) = self.transition();
        next_status(from, allowed, to)
    }
}

impl CreatorAction {
    pub fn transition(&self) -> (&'static [ApplicationStatus], ApplicationStatus) {
        match self {
            CreatorAction::SubmitVideo => (
                &[
                    ApplicationStatus::Approved,
                    ApplicationStatus::RevisionRequested,
                ],
                ApplicationStatus::VideoSubmitted,
            ),
            CreatorAction::SubmitSns => (
                &[ApplicationStatus::VideoApproved],
                ApplicationStatus::SnsUploaded,
            ),
            CreatorAction::UploadContent => (
                &[ApplicationStatus::Approved],
                ApplicationStatus::ContentUploaded,
            ),
            CreatorAction::Cancel => (&[ApplicationStatus::Pending], ApplicationStatus::Cancelled),
        }
    }

    pub fn next_status(&self, from: ApplicationStatus) -> AppResult<ApplicationStatus> {
        let (allowed, to) = self.transition();
        next_status(from, allowed, to)
    }
}

fn next_status(
    from: ApplicationStatus,
    allowed: &[ApplicationStatus],
    to: ApplicationStatus,
) -> AppResult<ApplicationStatus> {
    if allowed.contains(&from) {
        Ok(to)
    } else {
        Err(AppError::ValidationError(format!(
            "Cannot change application status from {from} to {to}"
        )))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ApplyRequest {
    /// 应募动机
    pub message: Option<String>,
    pub shipping_name: Option<String>,
    pub shipping_phone: Option<String>,
    pub shipping_postal_code: Option<String>,
    pub shipping_address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitVideoRequest {
    #[schema(example = "https://drive.google.com/file/d/xxxx/view")]
    pub video_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitSnsRequest {
    #[schema(example = "https://www.instagram.com/reel/xxxx/")]
    pub sns_url: String,
    /// 无字幕/无 BGM 的干净视频
    pub clean_video_url: Option<String>,
    /// 广告合作码 (Spark Ads / パートナーシップ広告コード)
    pub ad_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadContentRequest {
    pub content_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateContactRequest {
    pub shipping_name: Option<String>,
    pub shipping_phone: Option<String>,
    pub shipping_postal_code: Option<String>,
    pub shipping_address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReviewApplicationRequest {
    pub action: ReviewAction,
    /// 拒绝理由 / 修改意见 / 备注
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ApplicationQuery {
    pub status: Option<ApplicationStatus>,
    /// 按创作者名字或邮箱模糊搜索
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ExportQuery {
    pub status: Option<ApplicationStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApplicationResponse {
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
    pub video_submitted_at: Option<DateTime<Utc>>,
    pub sns_submitted_at: Option<DateTime<Utc>>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<applications::Model> for ApplicationResponse {
    fn from(m: applications::Model) -> Self {
        Self {
            id: m.id,
            campaign_id: m.campaign_id,
            user_id: m.user_id,
            status: m.status,
            message: m.message,
            shipping_name: m.shipping_name,
            shipping_phone: m.shipping_phone,
            shipping_postal_code: m.shipping_postal_code,
            shipping_address: m.shipping_address,
            video_url: m.video_url,
            clean_video_url: m.clean_video_url,
            sns_url: m.sns_url,
            ad_code: m.ad_code,
            content_url: m.content_url,
            revision_note: m.revision_note,
            video_submitted_at: m.video_submitted_at,
            sns_submitted_at: m.sns_submitted_at,
            reviewed_at: m.reviewed_at,
            completed_at: m.completed_at,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApplicantSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub instagram_url: Option<String>,
    pub tiktok_url: Option<String>,
    pub youtube_url: Option<String>,
    pub total_followers: i64,
}

impl From<&users::Model> for ApplicantSummary {
    fn from(u: &users::Model) -> Self {
        Self {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
            instagram_url: u.instagram_url.clone(),
            tiktok_url: u.tiktok_url.clone(),
            youtube_url: u.youtube_url.clone(),
            total_followers: u.total_followers(),
        }
    }
}

/// 管理后台列表：应募 + 创作者概要 + 管理员备注
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminApplicationResponse {
    pub application: ApplicationResponse,
    pub applicant: Option<ApplicantSummary>,
    pub admin_note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_transitions() {
        assert_eq!(
            ReviewAction::Approve
                .next_status(ApplicationStatus::Pending)
                .unwrap(),
            ApplicationStatus::Approved
        );
        assert!(
            ReviewAction::Approve
                .next_status(ApplicationStatus::Completed)
                .is_err()
        );
        assert_eq!(
            ReviewAction::RequestRevision
                .next_status(ApplicationStatus::VideoSubmitted)
                .unwrap(),
            ApplicationStatus::RevisionRequested
        );
        assert_eq!(
            ReviewAction::Complete
                .next_status(ApplicationStatus::ContentUploaded)
                .unwrap(),
            ApplicationStatus::Completed
        );
        assert!(
            ReviewAction::Complete
                .next_status(ApplicationStatus::VideoApproved)
                .is_err()
        );
    }

    #[test]
    fn test_cancel_only_from_non_terminal() {
        for status in ApplicationStatus::ALL {
            let result = ReviewAction::Cancel.next_status(status);
            assert_eq!(result.is_ok(), !status.is_terminal(), "{status}");
        }
    }

    #[test]
    fn test_creator_transitions() {
        assert_eq!(
            CreatorAction::SubmitVideo
                .next_status(ApplicationStatus::RevisionRequested)
                .unwrap(),
            ApplicationStatus::VideoSubmitted
        );
        assert!(
            CreatorAction::SubmitVideo
                .next_status(ApplicationStatus::Pending)
                .is_err()
        );
        assert_eq!(
            CreatorAction::SubmitSns
                .next_status(ApplicationStatus::VideoApproved)
                .unwrap(),
            ApplicationStatus::SnsUploaded
        );
        assert!(
            CreatorAction::Cancel
                .next_status(ApplicationStatus::Approved)
                .is_err()
        );
    }
}
