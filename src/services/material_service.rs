use crate::entities::{
    application_entity as applications, campaign_entity as campaigns,
    creator_material_entity as materials, user_profile_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::*;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};

#[derive(Clone)]
pub struct MaterialService {
    pool: DatabaseConnection,
}

fn clean_url(field: &str, value: Option<String>) -> AppResult<Option<String>> {
    match value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(url) => {
            validate_http_url(field, &url)?;
            Ok(Some(url))
        }
        None => Ok(None),
    }
}

/// 没有单独共享资料时使用活动通用链接
fn campaign_fallback(campaign: &campaigns::Model) -> Option<MaterialsResponse> {
    if campaign.google_drive_url.is_none() && campaign.google_slides_url.is_none() {
        return None;
    }
    Some(MaterialsResponse {
        campaign_id: campaign.id,
        drive_url: campaign.google_drive_url.clone(),
        slides_url: campaign.google_slides_url.clone(),
        notes: None,
        is_personalized: false,
        updated_at: campaign.updated_at,
    })
}

impl MaterialService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 管理员为创作者共享资料（同一活动同一创作者仅一条，重复共享即覆盖）
    pub async fn share(
        &self,
        admin_id: i64,
        campaign_id: i64,
        request: ShareMaterialsRequest,
    ) -> AppResult<MaterialsResponse> {
        let drive_url = clean_url("drive_url", request.drive_url)?;
        let slides_url = clean_url("slides_url", request.slides_url)?;
        if drive_url.is_none() && slides_url.is_none() {
            return Err(AppError::ValidationError(
                "Either drive_url or slides_url is required".to_string(),
            ));
        }
        let notes = request.notes.filter(|n| !n.trim().is_empty());

        campaigns::Entity::find_by_id(campaign_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Campaign not found".to_string()))?;
        users::Entity::find_by_id(request.user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User profile not found".to_string()))?;

        let existing = materials::Entity::find()
            .filter(materials::Column::CampaignId.eq(campaign_id))
            .filter(materials::Column::UserId.eq(request.user_id))
            .one(&self.pool)
            .await?;

        let saved = match existing {
            Some(row) => {
                let mut am = row.into_active_model();
                am.drive_url = Set(drive_url);
                am.slides_url = Set(slides_url);
                am.notes = Set(notes);
                am.created_by = Set(admin_id);
                am.updated_at = Set(Some(Utc::now()));
                am.update(&self.pool).await?
            }
            None => {
                materials::ActiveModel {
                    campaign_id: Set(campaign_id),
                    user_id: Set(request.user_id),
                    drive_url: Set(drive_url),
                    slides_url: Set(slides_url),
                    notes: Set(notes),
                    created_by: Set(admin_id),
                    ..Default::default()
                }
                .insert(&self.pool)
                .await?
            }
        };

        log::info!(
            "Admin {admin_id} shared materials of campaign {campaign_id} with user {}",
            request.user_id
        );
        Ok(saved.into())
    }

    /// 创作者查看资料：必须持有该活动已被选中的应募
    pub async fn get_for_creator(
        &self,
        user_id: i64,
        campaign_id: i64,
    ) -> AppResult<MaterialsResponse> {
        let application = applications::Entity::find()
            .filter(applications::Column::CampaignId.eq(campaign_id))
            .filter(applications::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?;
        match application {
            Some(app) if app.status.is_selected() => {}
            _ => return Err(AppError::PermissionDenied),
        }

        if let Some(row) = materials::Entity::find()
            .filter(materials::Column::CampaignId.eq(campaign_id))
            .filter(materials::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?
        {
            return Ok(row.into());
        }

        let campaign = campaigns::Entity::find_by_id(campaign_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Campaign not found".to_string()))?;

        campaign_fallback(&campaign)
            .ok_or_else(|| AppError::NotFound("No materials have been shared yet".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::CampaignStatus;

    fn campaign(drive: Option<&str>) -> campaigns::Model {
        campaigns::Model {
            id: 3,
            brand: "CNEC Beauty".to_string(),
            title: "新作リップ".to_string(),
            description: None,
            requirements: None,
            reward_points: 5000,
            platforms: serde_json::json!(["instagram"]),
            recruit_count: None,
            application_deadline: None,
            video_deadline: None,
            sns_deadline: None,
            status: CampaignStatus::Active,
            google_drive_url: drive.map(str::to_string),
            google_slides_url: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_campaign_fallback() {
        assert!(campaign_fallback(&campaign(None)).is_none());

        let fallback = campaign_fallback(&campaign(Some("https://drive.google.com/x"))).unwrap();
        assert!(!fallback.is_personalized);
        assert_eq!(fallback.campaign_id, 3);
        assert_eq!(fallback.drive_url.as_deref(), Some("https://drive.google.com/x"));
    }

    #[test]
    fn test_clean_url() {
        assert_eq!(clean_url("drive_url", Some("  ".into())).unwrap(), None);
        assert!(clean_url("drive_url", Some("javascript:alert(1)".into())).is_err());
        assert_eq!(
            clean_url("drive_url", Some(" https://drive.google.com/x ".into())).unwrap(),
            Some("https://drive.google.com/x".to_string())
        );
    }
}
