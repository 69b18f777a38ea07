use crate::middlewares::{current_user, require_admin};
use crate::models::*;
use crate::services::PointService;
use actix_web::{HttpRequest, HttpResponse, Result, ResponseError, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/points/balance",
    tag = "point",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "积分余额", body = PointBalanceResponse),
        (status = 401, description = "未授权")
    )
)]
pub async fn get_balance(
    point_service: web::Data<PointService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match point_service.get_balance(user.id).await {
        Ok(balance) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": balance
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/points/history",
    tag = "point",
    params(
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "积分流水"),
        (status = 401, description = "未授权")
    )
)]
pub async fn get_history(
    point_service: web::Data<PointService>,
    req: HttpRequest,
    query: web::Query<PointHistoryQuery>,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match point_service.history(user.id, &query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/points/adjust",
    tag = "admin",
    request_body = AdjustPointsRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "调整成功", body = PointTransactionResponse),
        (status = 400, description = "金额不合法或余额不足"),
        (status = 403, description = "需要管理员权限")
    )
)]
pub async fn adjust_points(
    point_service: web::Data<PointService>,
    req: HttpRequest,
    request: web::Json<AdjustPointsRequest>,
) -> Result<HttpResponse> {
    let admin = require_admin(&req)?;

    match point_service.adjust(admin.id, request.into_inner()).await {
        Ok(transaction) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": transaction
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn point_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/points")
            .route("/balance", web::get().to(get_balance))
            .route("/history", web::get().to(get_history)),
    );
}
