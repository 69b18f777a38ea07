use crate::middlewares::{current_user, require_admin};
use crate::models::*;
use crate::services::MaterialService;
use actix_web::{HttpRequest, HttpResponse, Result, ResponseError, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/materials/{campaign_id}",
    tag = "material",
    params(
        ("campaign_id" = i64, Path, description = "活动 ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "拍摄资料", body = MaterialsResponse),
        (status = 403, description = "尚未被选中"),
        (status = 404, description = "尚未共享资料")
    )
)]
pub async fn get_materials(
    material_service: web::Data<MaterialService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match material_service
        .get_for_creator(user.id, path.into_inner())
        .await
    {
        Ok(materials) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": materials
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/campaigns/{id}/materials",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "活动 ID")
    ),
    request_body = ShareMaterialsRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "共享成功", body = MaterialsResponse),
        (status = 400, description = "链接不合法"),
        (status = 403, description = "需要管理员权限")
    )
)]
pub async fn share_materials(
    material_service: web::Data<MaterialService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<ShareMaterialsRequest>,
) -> Result<HttpResponse> {
    let admin = require_admin(&req)?;

    match material_service
        .share(admin.id, path.into_inner(), request.into_inner())
        .await
    {
        Ok(materials) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": materials
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn material_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/materials").route("/{campaign_id}", web::get().to(get_materials)));
}
