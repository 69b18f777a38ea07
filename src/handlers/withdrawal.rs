use crate::entities::WithdrawalStatus;
use crate::middlewares::{current_user, require_admin};
use crate::models::*;
use crate::services::WithdrawalService;
use actix_web::{HttpRequest, HttpResponse, Result, ResponseError, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/withdrawals",
    tag = "withdrawal",
    request_body = CreateWithdrawalRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "提现申请已提交", body = WithdrawalResponse),
        (status = 400, description = "金额或账户信息不合法"),
        (status = 401, description = "未授权")
    )
)]
pub async fn request_withdrawal(
    withdrawal_service: web::Data<WithdrawalService>,
    req: HttpRequest,
    request: web::Json<CreateWithdrawalRequest>,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match withdrawal_service
        .request(user.id, request.into_inner())
        .await
    {
        Ok(withdrawal) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": withdrawal
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/withdrawals",
    tag = "withdrawal",
    params(
        ("status" = Option<WithdrawalStatus>, Query, description = "按状态过滤"),
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "我的提现记录"),
        (status = 401, description = "未授权")
    )
)]
pub async fn list_my_withdrawals(
    withdrawal_service: web::Data<WithdrawalService>,
    req: HttpRequest,
    query: web::Query<WithdrawalQuery>,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match withdrawal_service
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
    path = "/admin/withdrawals",
    tag = "admin",
    params(
        ("status" = Option<WithdrawalStatus>, Query, description = "按状态过滤"),
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "全部提现申请"),
        (status = 403, description = "需要管理员权限")
    )
)]
pub async fn admin_list_withdrawals(
    withdrawal_service: web::Data<WithdrawalService>,
    req: HttpRequest,
    query: web::Query<WithdrawalQuery>,
) -> Result<HttpResponse> {
    require_admin(&req)?;

    match withdrawal_service.list(&query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/withdrawals/{id}/process",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "提现 ID")
    ),
    request_body = ProcessWithdrawalRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "处理完成", body = ProcessWithdrawalResponse),
        (status = 400, description = "当前状态不允许该操作"),
        (status = 404, description = "提现申请不存在")
    )
)]
pub async fn process_withdrawal(
    withdrawal_service: web::Data<WithdrawalService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<ProcessWithdrawalRequest>,
) -> Result<HttpResponse> {
    let admin = require_admin(&req)?;

    match withdrawal_service
        .process(admin.id, path.into_inner(), request.into_inner())
        .await
    {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": result
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn withdrawal_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/withdrawals")
            .route("", web::post().to(request_withdrawal))
            .route("", web::get().to(list_my_withdrawals)),
    );
}
