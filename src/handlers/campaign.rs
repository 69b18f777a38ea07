use crate::entities::CampaignStatus;
use crate::middlewares::{current_user, optional_user, require_admin};
use crate::models::*;
use crate::services::{ApplicationService, CampaignService};
use actix_web::{HttpRequest, HttpResponse, Result, ResponseError, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/campaigns",
    tag = "campaign",
    params(
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量")
    ),
    responses(
        (status = 200, description = "招募中的活动列表")
    )
)]
pub async fn list_active_campaigns(
    campaign_service: web::Data<CampaignService>,
    query: web::Query<CampaignQuery>,
) -> Result<HttpResponse> {
    match campaign_service.list_active(&query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/campaigns/{id}",
    tag = "campaign",
    params(
        ("id" = i64, Path, description = "活动 ID")
    ),
    responses(
        (status = 200, description = "活动详情", body = CampaignResponse),
        (status = 404, description = "活动不存在")
    )
)]
pub async fn get_campaign(
    campaign_service: web::Data<CampaignService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let include_drafts = optional_user(&req).is_some_and(|u| u.is_admin());

    match campaign_service
        .get(path.into_inner(), include_drafts)
        .await
    {
        Ok(campaign) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": campaign
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/campaigns/{id}/apply",
    tag = "campaign",
    params(
        ("id" = i64, Path, description = "活动 ID")
    ),
    request_body = ApplyRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "应募成功", body = ApplicationResponse),
        (status = 400, description = "活动未在招募中"),
        (status = 409, description = "已应募过该活动")
    )
)]
pub async fn apply_to_campaign(
    application_service: web::Data<ApplicationService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<ApplyRequest>,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match application_service
        .apply(user.id, path.into_inner(), request.into_inner())
        .await
    {
        Ok(application) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": application
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/campaigns",
    tag = "admin",
    params(
        ("status" = Option<CampaignStatus>, Query, description = "按状态过滤"),
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "全部活动列表"),
        (status = 403, description = "需要管理员权限")
    )
)]
pub async fn admin_list_campaigns(
    campaign_service: web::Data<CampaignService>,
    req: HttpRequest,
    query: web::Query<CampaignQuery>,
) -> Result<HttpResponse> {
    require_admin(&req)?;

    match campaign_service.list_all(&query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/campaigns",
    tag = "admin",
    request_body = CreateCampaignRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "创建成功", body = CampaignResponse),
        (status = 400, description = "请求参数错误"),
        (status = 403, description = "需要管理员权限")
    )
)]
pub async fn create_campaign(
    campaign_service: web::Data<CampaignService>,
    req: HttpRequest,
    request: web::Json<CreateCampaignRequest>,
) -> Result<HttpResponse> {
    require_admin(&req)?;

    match campaign_service.create(request.into_inner()).await {
        Ok(campaign) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": campaign
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/campaigns/{id}",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "活动 ID")
    ),
    request_body = UpdateCampaignRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "更新成功", body = CampaignResponse),
        (status = 400, description = "请求参数错误"),
        (status = 404, description = "活动不存在")
    )
)]
pub async fn update_campaign(
    campaign_service: web::Data<CampaignService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdateCampaignRequest>,
) -> Result<HttpResponse> {
    require_admin(&req)?;

    match campaign_service
        .update(path.into_inner(), request.into_inner())
        .await
    {
        Ok(campaign) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": campaign
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/campaigns/{id}/status",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "活动 ID")
    ),
    request_body = SetCampaignStatusRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "状态已更新", body = CampaignResponse),
        (status = 404, description = "活动不存在")
    )
)]
pub async fn set_campaign_status(
    campaign_service: web::Data<CampaignService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<SetCampaignStatusRequest>,
) -> Result<HttpResponse> {
    require_admin(&req)?;

    match campaign_service
        .set_status(path.into_inner(), request.status)
        .await
    {
        Ok(campaign) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": campaign
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn campaign_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/campaigns")
            .route("", web::get().to(list_active_campaigns))
            .route("/{id}", web::get().to(get_campaign))
            .route("/{id}/apply", web::post().to(apply_to_campaign)),
    );
}
