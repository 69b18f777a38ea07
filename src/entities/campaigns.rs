use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "closed")]
    Closed,
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CampaignStatus::Draft => write!(f, "draft"),
            CampaignStatus::Active => write!(f, "active"),
            CampaignStatus::Closed => write!(f, "closed"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Instagram,
    Tiktok,
    Youtube,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "campaigns")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub brand: String,
    pub title: String,
    pub description: Option<String>,
    pub requirements: Option<String>,
    /// 完成后发放的积分
    pub reward_points: i64,
    /// JSON 数组，元素为 Platform
    #[sea_orm(column_type = "JsonBinary")]
    pub platforms: Json,
    pub recruit_count: Option<i32>,
    pub application_deadline: Option<NaiveDate>,
    pub video_deadline: Option<NaiveDate>,
    pub sns_deadline: Option<NaiveDate>,
    pub status: CampaignStatus,
    pub google_drive_url: Option<String>,
    pub google_slides_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    /// 解析 platforms 列，忽略无法识别的值
    pub fn platform_list(&self) -> Vec<Platform> {
        match &self.platforms {
            Json::Array(items) => items
                .iter()
                .filter_map(|v| serde_json::from_value::<Platform>(v.clone()).ok())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// 是否仍在招募中（状态 active 且未过应募截止日）
    pub fn is_accepting_applications(&self, today: NaiveDate) -> bool {
        self.status == CampaignStatus::Active
            && self.application_deadline.is_none_or(|d| today <= d)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::applications::Entity")]
    Applications,
    #[sea_orm(has_many = "super::creator_materials::Entity")]
    CreatorMaterials,
}

impl Related<super::applications::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Applications.def()
    }
}

impl Related<super::creator_materials::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreatorMaterials.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
