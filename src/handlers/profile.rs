use crate::middlewares::{current_user, require_admin};
use crate::models::*;
use crate::services::ProfileService;
use actix_web::{HttpRequest, HttpResponse, Result, ResponseError, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/profile",
    tag = "profile",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取个人资料成功", body = UserProfileResponse),
        (status = 401, description = "未授权"),
        (status = 404, description = "资料不存在")
    )
)]
pub async fn get_profile(
    profile_service: web::Data<ProfileService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match profile_service.get_profile(user.id).await {
        Ok(profile) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": profile
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/profile",
    tag = "profile",
    request_body = UpdateProfileRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "更新个人资料成功", body = UserProfileResponse),
        (status = 400, description = "请求参数错误"),
        (status = 401, description = "未授权")
    )
)]
pub async fn update_profile(
    profile_service: web::Data<ProfileService>,
    req: HttpRequest,
    request: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match profile_service
        .update_profile(user.id, request.into_inner())
        .await
    {
        Ok(profile) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": profile
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/profile/bank-account",
    tag = "profile",
    request_body = BankAccount,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "登记银行账户成功", body = UserProfileResponse),
        (status = 400, description = "账户信息不合法"),
        (status = 401, description = "未授权")
    )
)]
pub async fn update_bank_account(
    profile_service: web::Data<ProfileService>,
    req: HttpRequest,
    request: web::Json<BankAccount>,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match profile_service
        .update_bank_account(user.id, request.into_inner())
        .await
    {
        Ok(profile) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": profile,
            "message": "Bank account saved"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/profiles",
    tag = "admin",
    params(
        ("search" = Option<String>, Query, description = "按名字或邮箱搜索"),
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "创作者列表"),
        (status = 403, description = "需要管理员权限")
    )
)]
pub async fn admin_list_profiles(
    profile_service: web::Data<ProfileService>,
    req: HttpRequest,
    query: web::Query<ProfileQuery>,
) -> Result<HttpResponse> {
    require_admin(&req)?;

    match profile_service.list_profiles(&query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn profile_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/profile")
            .route("", web::get().to(get_profile))
            .route("", web::put().to(update_profile))
            .route("/bank-account", web::put().to(update_bank_account)),
    );
}
