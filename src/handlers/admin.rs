use crate::handlers::{application, campaign, material, point, profile, withdrawal};
use crate::middlewares::require_admin;
use crate::models::*;
use crate::services::AdminService;
use actix_web::{HttpRequest, HttpResponse, Result, ResponseError, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/admin/stats",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "仪表盘统计", body = DashboardStats),
        (status = 403, description = "需要管理员权限")
    )
)]
pub async fn dashboard_stats(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    require_admin(&req)?;

    match admin_service.dashboard_stats().await {
        Ok(stats) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": stats
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/schema-check",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "必需数据表检查结果", body = SchemaCheckResponse),
        (status = 403, description = "需要管理员权限")
    )
)]
pub async fn schema_check(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    require_admin(&req)?;

    match admin_service.schema_check().await {
        Ok(report) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": report
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

// /admin 下的全部路由集中注册在同一个 scope
pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/stats", web::get().to(dashboard_stats))
            .route("/schema-check", web::get().to(schema_check))
            .route("/profiles", web::get().to(profile::admin_list_profiles))
            .route("/campaigns", web::get().to(campaign::admin_list_campaigns))
            .route("/campaigns", web::post().to(campaign::create_campaign))
            .route("/campaigns/{id}", web::put().to(campaign::update_campaign))
            .route(
                "/campaigns/{id}/status",
                web::put().to(campaign::set_campaign_status),
            )
            .route(
                "/campaigns/{id}/applications",
                web::get().to(application::admin_list_applications),
            )
            .route(
                "/campaigns/{id}/applications/export",
                web::get().to(application::export_applications),
            )
            .route(
                "/campaigns/{id}/materials",
                web::post().to(material::share_materials),
            )
            .route(
                "/applications/{id}/review",
                web::post().to(application::review_application),
            )
            .route("/points/adjust", web::post().to(point::adjust_points))
            .route(
                "/withdrawals",
                web::get().to(withdrawal::admin_list_withdrawals),
            )
            .route(
                "/withdrawals/{id}/process",
                web::post().to(withdrawal::process_withdrawal),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middlewares::AuthMiddleware;
    use crate::utils::JwtService;
    use actix_web::{App, http::StatusCode, test};

    #[actix_web::test]
    async fn test_admin_routes_require_token() {
        let app = test::init_service(
            App::new()
                .wrap(AuthMiddleware::new(JwtService::new("test-secret", 3600, 86400)))
                .service(web::scope("/api/v1").configure(admin_config)),
        )
        .await;

        for uri in ["/api/v1/admin/stats", "/api/v1/admin/withdrawals"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let err = test::try_call_service(&app, req).await.unwrap_err();
            assert_eq!(err.as_response_error().status_code(), StatusCode::UNAUTHORIZED);
        }

        let req = test::TestRequest::get()
            .uri("/api/v1/admin/stats")
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_request();
        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::UNAUTHORIZED);
    }
}
