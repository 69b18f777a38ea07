use crate::entities::ApplicationStatus;
use crate::middlewares::{current_user, require_admin};
use crate::models::*;
use crate::services::ApplicationService;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, Result, ResponseError, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/applications",
    tag = "application",
    params(
        ("status" = Option<ApplicationStatus>, Query, description = "按状态过滤"),
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "我的应募列表"),
        (status = 401, description = "未授权")
    )
)]
pub async fn list_my_applications(
    application_service: web::Data<ApplicationService>,
    req: HttpRequest,
    query: web::Query<ApplicationQuery>,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match application_service
        .list_mine(user.id, &query.into_inner())
        .await
    {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/applications/{id}",
    tag = "application",
    params(
        ("id" = i64, Path, description = "应募 ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "应募详情", body = ApplicationResponse),
        (status = 404, description = "应募不存在")
    )
)]
pub async fn get_my_application(
    application_service: web::Data<ApplicationService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match application_service
        .get_mine(user.id, path.into_inner())
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
    path = "/applications/{id}/workflow",
    tag = "application",
    params(
        ("id" = i64, Path, description = "应募 ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "4 步流程进度", body = WorkflowResponse),
        (status = 404, description = "应募不存在")
    )
)]
pub async fn get_workflow(
    application_service: web::Data<ApplicationService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match application_service
        .workflow(user.id, path.into_inner())
        .await
    {
        Ok(workflow) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": workflow
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/applications/{id}/cancel",
    tag = "application",
    params(
        ("id" = i64, Path, description = "应募 ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "已取消", body = ApplicationResponse),
        (status = 400, description = "当前状态不可取消")
    )
)]
pub async fn cancel_application(
    application_service: web::Data<ApplicationService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match application_service.cancel(user.id, path.into_inner()).await {
        Ok(application) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": application
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/applications/{id}/video",
    tag = "application",
    params(
        ("id" = i64, Path, description = "应募 ID")
    ),
    request_body = SubmitVideoRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "视频已提交", body = ApplicationResponse),
        (status = 400, description = "当前状态不可提交")
    )
)]
pub async fn submit_video(
    application_service: web::Data<ApplicationService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<SubmitVideoRequest>,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match application_service
        .submit_video(user.id, path.into_inner(), request.into_inner())
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
    post,
    path = "/applications/{id}/sns",
    tag = "application",
    params(
        ("id" = i64, Path, description = "应募 ID")
    ),
    request_body = SubmitSnsRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "SNS 投稿已提交", body = ApplicationResponse),
        (status = 400, description = "当前状态不可提交")
    )
)]
pub async fn submit_sns(
    application_service: web::Data<ApplicationService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<SubmitSnsRequest>,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match application_service
        .submit_sns(user.id, path.into_inner(), request.into_inner())
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
    post,
    path = "/applications/{id}/content",
    tag = "application",
    params(
        ("id" = i64, Path, description = "应募 ID")
    ),
    request_body = UploadContentRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "内容已上传", body = ApplicationResponse),
        (status = 400, description = "当前状态不可上传")
    )
)]
pub async fn upload_content(
    application_service: web::Data<ApplicationService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UploadContentRequest>,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match application_service
        .upload_content(user.id, path.into_inner(), request.into_inner())
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
    put,
    path = "/applications/{id}/contact",
    tag = "application",
    params(
        ("id" = i64, Path, description = "应募 ID")
    ),
    request_body = UpdateContactRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "联系方式已更新", body = ApplicationResponse),
        (status = 400, description = "应募已结束")
    )
)]
pub async fn update_contact(
    application_service: web::Data<ApplicationService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdateContactRequest>,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match application_service
        .update_contact(user.id, path.into_inner(), request.into_inner())
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
    path = "/admin/campaigns/{id}/applications",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "活动 ID"),
        ("status" = Option<ApplicationStatus>, Query, description = "按状态过滤"),
        ("search" = Option<String>, Query, description = "按创作者名字或邮箱搜索"),
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "活动应募者列表"),
        (status = 403, description = "需要管理员权限")
    )
)]
pub async fn admin_list_applications(
    application_service: web::Data<ApplicationService>,
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<ApplicationQuery>,
) -> Result<HttpResponse> {
    require_admin(&req)?;

    match application_service
        .list_for_campaign(path.into_inner(), &query.into_inner())
        .await
    {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/applications/{id}/review",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "应募 ID")
    ),
    request_body = ReviewApplicationRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "审核完成", body = ApplicationResponse),
        (status = 400, description = "当前状态不允许该操作"),
        (status = 403, description = "需要管理员权限")
    )
)]
pub async fn review_application(
    application_service: web::Data<ApplicationService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<ReviewApplicationRequest>,
) -> Result<HttpResponse> {
    let admin = require_admin(&req)?;

    match application_service
        .review(admin.id, path.into_inner(), request.into_inner())
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
    path = "/admin/campaigns/{id}/applications/export",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "活动 ID"),
        ("status" = Option<ApplicationStatus>, Query, description = "按状态过滤")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "应募者 CSV", content_type = "text/csv"),
        (status = 403, description = "需要管理员权限")
    )
)]
pub async fn export_applications(
    application_service: web::Data<ApplicationService>,
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<ExportQuery>,
) -> Result<HttpResponse> {
    require_admin(&req)?;
    let campaign_id = path.into_inner();

    match application_service
        .export_csv(campaign_id, query.status)
        .await
    {
        Ok(csv) => Ok(HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"campaign_{campaign_id}_applicants.csv\""),
            ))
            .body(csv)),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn application_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/applications")
            .route("", web::get().to(list_my_applications))
            .route("/{id}", web::get().to(get_my_application))
            .route("/{id}/workflow", web::get().to(get_workflow))
            .route("/{id}/cancel", web::post().to(cancel_application))
            .route("/{id}/video", web::post().to(submit_video))
            .route("/{id}/sns", web::post().to(submit_sns))
            .route("/{id}/content", web::post().to(upload_content))
            .route("/{id}/contact", web::put().to(update_contact)),
    );
}
