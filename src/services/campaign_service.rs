use crate::entities::{CampaignStatus, Platform, campaign_entity as campaigns};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::*;
use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

#[derive(Clone)]
pub struct CampaignService {
    pool: DatabaseConnection,
}

/// 创建/更新后的完整字段，用于统一校验
struct CampaignDraft<'a> {
    brand: &'a str,
    title: &'a str,
    reward_points: i64,
    platforms: &'a [Platform],
    recruit_count: Option<i32>,
    application_deadline: Option<NaiveDate>,
    video_deadline: Option<NaiveDate>,
    sns_deadline: Option<NaiveDate>,
    google_drive_url: Option<&'a str>,
    google_slides_url: Option<&'a str>,
}

fn validate_campaign(draft: &CampaignDraft<'_>) -> AppResult<()> {
    require_non_empty("brand", draft.brand)?;
    require_non_empty("title", draft.title)?;

    if draft.reward_points <= 0 {
        return Err(AppError::ValidationError(
            "reward_points must be greater than 0".to_string(),
        ));
    }
    if draft.platforms.is_empty() {
        return Err(AppError::ValidationError(
            "At least one platform is required".to_string(),
        ));
    }
    if let Some(n) = draft.recruit_count
        && n <= 0
    {
        return Err(AppError::ValidationError(
            "recruit_count must be greater than 0".to_string(),
        ));
    }

    // 截止日顺序: 应募 <= 视频 <= SNS
    let deadlines = [
        ("application_deadline", draft.application_deadline),
        ("video_deadline", draft.video_deadline),
        ("sns_deadline", draft.sns_deadline),
    ];
    let present: Vec<(&str, NaiveDate)> = deadlines
        .iter()
        .filter_map(|(name, d)| d.map(|d| (*name, d)))
        .collect();
    for pair in present.windows(2) {
        let ((earlier_name, earlier), (later_name, later)) = (pair[0], pair[1]);
        if earlier > later {
            return Err(AppError::ValidationError(format!(
                "{earlier_name} must not be after {later_name}"
            )));
        }
    }

    if let Some(url) = draft.google_drive_url {
        validate_http_url("google_drive_url", url)?;
    }
    if let Some(url) = draft.google_slides_url {
        validate_http_url("google_slides_url", url)?;
    }
    Ok(())
}

fn dedup_platforms(platforms: &[Platform]) -> Vec<Platform> {
    let mut out: Vec<Platform> = Vec::with_capacity(platforms.len());
    for p in platforms {
        if !out.contains(p) {
            out.push(*p);
        }
    }
    out
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl CampaignService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn find_campaign(&self, campaign_id: i64) -> AppResult<campaigns::Model> {
        campaigns::Entity::find_by_id(campaign_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Campaign not found".to_string()))
    }

    /// 公开列表：招募中的活动
    pub async fn list_active(&self, query: &CampaignQuery) -> AppResult<PaginatedResponse<CampaignResponse>> {
        self.list(Some(CampaignStatus::Active), query).await
    }

    /// 管理后台列表，可按状态过滤
    pub async fn list_all(&self, query: &CampaignQuery) -> AppResult<PaginatedResponse<CampaignResponse>> {
        self.list(query.status, query).await
    }

    async fn list(
        &self,
        status: Option<CampaignStatus>,
        query: &CampaignQuery,
    ) -> AppResult<PaginatedResponse<CampaignResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut select = campaigns::Entity::find();
        if let Some(status) = status {
            select = select.filter(campaigns::Column::Status.eq(status));
        }

        let total = select.clone().count(&self.pool).await? as i64;
        let rows = select
            .order_by_desc(campaigns::Column::CreatedAt)
            .order_by_desc(campaigns::Column::Id)
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

    /// 草稿只对管理员可见
    pub async fn get(&self, campaign_id: i64, include_drafts: bool) -> AppResult<CampaignResponse> {
        let campaign = self.find_campaign(campaign_id).await?;
        if campaign.status == CampaignStatus::Draft && !include_drafts {
            return Err(AppError::NotFound("Campaign not found".to_string()));
        }
        Ok(campaign.into())
    }

    pub async fn create(&self, request: CreateCampaignRequest) -> AppResult<CampaignResponse> {
        let platforms = dedup_platforms(&request.platforms);
        let google_drive_url = non_blank(request.google_drive_url);
        let google_slides_url = non_blank(request.google_slides_url);

        validate_campaign(&CampaignDraft {
            brand: &request.brand,
            title: &request.title,
            reward_points: request.reward_points,
            platforms: &platforms,
            recruit_count: request.recruit_count,
            application_deadline: request.application_deadline,
            video_deadline: request.video_deadline,
            sns_deadline: request.sns_deadline,
            google_drive_url: google_drive_url.as_deref(),
            google_slides_url: google_slides_url.as_deref(),
        })?;

        let campaign = campaigns::ActiveModel {
            brand: Set(request.brand.trim().to_string()),
            title: Set(request.title.trim().to_string()),
            description: Set(request.description),
            requirements: Set(request.requirements),
            reward_points: Set(request.reward_points),
            platforms: Set(serde_json::to_value(&platforms)?),
            recruit_count: Set(request.recruit_count),
            application_deadline: Set(request.application_deadline),
            video_deadline: Set(request.video_deadline),
            sns_deadline: Set(request.sns_deadline),
            status: Set(request.status.unwrap_or(CampaignStatus::Draft)),
            google_drive_url: Set(google_drive_url),
            google_slides_url: Set(google_slides_url),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Created campaign {} ({})", campaign.id, campaign.title);
        Ok(campaign.into())
    }

    pub async fn update(
        &self,
        campaign_id: i64,
        request: UpdateCampaignRequest,
    ) -> AppResult<CampaignResponse> {
        let current = self.find_campaign(campaign_id).await?;

        let brand = request.brand.unwrap_or_else(|| current.brand.clone());
        let title = request.title.unwrap_or_else(|| current.title.clone());
        let reward_points = request.reward_points.unwrap_or(current.reward_points);
        let platforms = match &request.platforms {
            Some(p) => dedup_platforms(p),
            None => current.platform_list(),
        };
        let recruit_count = request.recruit_count.or(current.recruit_count);
        let application_deadline = request.application_deadline.or(current.application_deadline);
        let video_deadline = request.video_deadline.or(current.video_deadline);
        let sns_deadline = request.sns_deadline.or(current.sns_deadline);
        let google_drive_url = match request.google_drive_url {
            Some(v) => non_blank(Some(v)),
            None => current.google_drive_url.clone(),
        };
        let google_slides_url = match request.google_slides_url {
            Some(v) => non_blank(Some(v)),
            None => current.google_slides_url.clone(),
        };

        validate_campaign(&CampaignDraft {
            brand: &brand,
            title: &title,
            reward_points,
            platforms: &platforms,
            recruit_count,
            application_deadline,
            video_deadline,
            sns_deadline,
            google_drive_url: google_drive_url.as_deref(),
            google_slides_url: google_slides_url.as_deref(),
        })?;

        let mut am = current.into_active_model();
        am.brand = Set(brand.trim().to_string());
        am.title = Set(title.trim().to_string());
        if let Some(v) = request.description {
            am.description = Set(Some(v));
        }
        if let Some(v) = request.requirements {
            am.requirements = Set(Some(v));
        }
        am.reward_points = Set(reward_points);
        am.platforms = Set(serde_json::to_value(&platforms)?);
        am.recruit_count = Set(recruit_count);
        am.application_deadline = Set(application_deadline);
        am.video_deadline = Set(video_deadline);
        am.sns_deadline = Set(sns_deadline);
        am.google_drive_url = Set(google_drive_url);
        am.google_slides_url = Set(google_slides_url);
        am.updated_at = Set(Some(Utc::now()));

        let updated = am.update(&self.pool).await?;
        Ok(updated.into())
    }

    pub async fn set_status(
        &self,
        campaign_id: i64,
        status: CampaignStatus,
    ) -> AppResult<CampaignResponse> {
        let current = self.find_campaign(campaign_id).await?;
        if current.status == status {
            return Ok(current.into());
        }

        let mut am = current.into_active_model();
        am.status = Set(status);
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&self.pool).await?;

        log::info!("Campaign {campaign_id} status -> {status}");
        Ok(updated.into())
    }

    /// 关闭已过应募截止日的招募中活动，返回关闭数量
    pub async fn close_expired_campaigns(&self) -> AppResult<u64> {
        let today = Utc::now().date_naive();
        let result = campaigns::Entity::update_many()
            .col_expr(
                campaigns::Column::Status,
                Expr::value(CampaignStatus::Closed.to_string()),
            )
            .col_expr(campaigns::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(campaigns::Column::Status.eq(CampaignStatus::Active))
            .filter(campaigns::Column::ApplicationDeadline.lt(today))
            .exec(&self.pool)
            .await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft<'a>(platforms: &'a [Platform]) -> CampaignDraft<'a> {
        CampaignDraft {
            brand: "CNEC Beauty",
            title: "新作リップ",
            reward_points: 5000,
            platforms,
            recruit_count: Some(10),
            application_deadline: NaiveDate::from_ymd_opt(2025, 9, 1),
            video_deadline: NaiveDate::from_ymd_opt(2025, 9, 15),
            sns_deadline: NaiveDate::from_ymd_opt(2025, 9, 30),
            google_drive_url: None,
            google_slides_url: None,
        }
    }

    #[test]
    fn test_valid_campaign() {
        assert!(validate_campaign(&draft(&[Platform::Instagram])).is_ok());
    }

    #[test]
    fn test_campaign_rejections() {
        assert!(validate_campaign(&draft(&[])).is_err());

        let platforms = [Platform::Tiktok];
        let mut d = draft(&platforms);
        d.reward_points = 0;
        assert!(validate_campaign(&d).is_err());

        let mut d = draft(&platforms);
        d.title = "  ";
        assert!(validate_campaign(&d).is_err());

        let mut d = draft(&platforms);
        d.google_drive_url = Some("drive.google.com/x");
        assert!(validate_campaign(&d).is_err());
    }

    #[test]
    fn test_deadlines_must_be_ordered() {
        let platforms = [Platform::Youtube];
        let mut d = draft(&platforms);
        d.video_deadline = NaiveDate::from_ymd_opt(2025, 8, 1);
        assert!(validate_campaign(&d).is_err());

        // 中间缺失时仍比较首尾
        let mut d = draft(&platforms);
        d.video_deadline = None;
        d.sns_deadline = NaiveDate::from_ymd_opt(2025, 8, 31);
        assert!(validate_campaign(&d).is_err());

        let mut d = draft(&platforms);
        d.video_deadline = None;
        assert!(validate_campaign(&d).is_ok());
    }

    #[test]
    fn test_dedup_platforms_keeps_order() {
        let p = dedup_platforms(&[Platform::Tiktok, Platform::Instagram, Platform::Tiktok]);
        assert_eq!(p, vec![Platform::Tiktok, Platform::Instagram]);
    }
}
