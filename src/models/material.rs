use crate::entities::creator_material_entity as materials;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShareMaterialsRequest {
    pub user_id: i64,
    #[schema(example = "https://drive.google.com/drive/folders/xxxx")]
    pub drive_url: Option<String>,
    #[schema(example = "https://docs.google.com/presentation/d/xxxx")]
    pub slides_url: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MaterialsResponse {
    pub campaign_id: i64,
    pub drive_url: Option<String>,
    pub slides_url: Option<String>,
    pub notes: Option<String>,
    /// 是否为该创作者单独共享的资料（否则为活动通用资料）
    pub is_personalized: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<materials::Model> for MaterialsResponse {
    fn from(m: materials::Model) -> Self {
        Self {
            campaign_id: m.campaign_id,
            drive_url: m.drive_url,
            slides_url: m.slides_url,
            notes: m.notes,
            is_personalized: true,
            updated_at: m.updated_at,
        }
    }
}
