use crate::entities::{CampaignStatus, Platform, campaign_entity as campaigns};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCampaignRequest {
    #[schema(example = "CNEC Beauty")]
    pub brand: String,
    #[schema(example = "新作リップ PR キャンペーン")]
    pub title: String,
    pub description: Option<String>,
    pub requirements: Option<String>,
    #[schema(example = 5000)]
    pub reward_points: i64,
    pub platforms: Vec<Platform>,
    pub recruit_count: Option<i32>,
    pub application_deadline: Option<NaiveDate>,
    pub video_deadline: Option<NaiveDate>,
    pub sns_deadline: Option<NaiveDate>,
    pub google_drive_url: Option<String>,
    pub google_slides_url: Option<String>,
    /// 默认 draft
    pub status: Option<CampaignStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateCampaignRequest {
    pub brand: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub reward_points: Option<i64>,
    pub platforms: Option<Vec<Platform>>,
    pub recruit_count: Option<i32>,
    pub application_deadline: Option<NaiveDate>,
    pub video_deadline: Option<NaiveDate>,
    pub sns_deadline: Option<NaiveDate>,
    pub google_drive_url: Option<String>,
    pub google_slides_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SetCampaignStatusRequest {
    pub status: CampaignStatus,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CampaignQuery {
    pub status: Option<CampaignStatus>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CampaignResponse {
    pub id: i64,
    pub brand: String,
    pub title: String,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub reward_points: i64,
    pub platforms: Vec<Platform>,
    pub recruit_count: Option<i32>,
    pub application_deadline: Option<NaiveDate>,
    pub video_deadline: Option<NaiveDate>,
    pub sns_deadline: Option<NaiveDate>,
    pub status: CampaignStatus,
    pub google_drive_url: Option<String>,
    pub google_slides_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<campaigns::Model> for CampaignResponse {
    fn from(m: campaigns::Model) -> Self {
        let platforms = m.platform_list();
        Self {
            id: m.id,
            brand: m.brand,
            title: m.title,
            description: m.description,
            requirements: m.requirements,
            reward_points: m.reward_points,
            platforms,
            recruit_count: m.recruit_count,
            application_deadline: m.application_deadline,
            video_deadline: m.video_deadline,
            sns_deadline: m.sns_deadline,
            status: m.status,
            google_drive_url: m.google_drive_url,
            google_slides_url: m.google_slides_url,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}
