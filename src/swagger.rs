use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{
    AccountType, ApplicationStatus, CampaignStatus, Platform, PointTransactionType, UserRole,
    WithdrawalStatus,
};
use crate::external::SmtpSettings;
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::logout,
        handlers::profile::get_profile,
        handlers::profile::update_profile,
        handlers::profile::update_bank_account,
        handlers::campaign::list_active_campaigns,
        handlers::campaign::get_campaign,
        handlers::campaign::apply_to_campaign,
        handlers::application::list_my_applications,
        handlers::application::get_my_application,
        handlers::application::get_workflow,
        handlers::application::cancel_application,
        handlers::application::submit_video,
        handlers::application::submit_sns,
        handlers::application::upload_content,
        handlers::application::update_contact,
        handlers::material::get_materials,
        handlers::point::get_balance,
        handlers::point::get_history,
        handlers::withdrawal::request_withdrawal,
        handlers::withdrawal::list_my_withdrawals,
        handlers::email::send_email,
        handlers::admin::dashboard_stats,
        handlers::admin::schema_check,
        handlers::profile::admin_list_profiles,
        handlers::campaign::admin_list_campaigns,
        handlers::campaign::create_campaign,
        handlers::campaign::update_campaign,
        handlers::campaign::set_campaign_status,
        handlers::application::admin_list_applications,
        handlers::application::review_application,
        handlers::application::export_applications,
        handlers::material::share_materials,
        handlers::point::adjust_points,
        handlers::withdrawal::admin_list_withdrawals,
        handlers::withdrawal::process_withdrawal,
    ),
    components(
        schemas(
            UserRole,
            AccountType,
            CampaignStatus,
            Platform,
            ApplicationStatus,
            PointTransactionType,
            WithdrawalStatus,
            RegisterRequest,
            LoginRequest,
            RefreshTokenRequest,
            AuthResponse,
            UpdateProfileRequest,
            BankAccount,
            UserProfileResponse,
            ProfileQuery,
            CreateCampaignRequest,
            UpdateCampaignRequest,
            SetCampaignStatusRequest,
            CampaignQuery,
            CampaignResponse,
            ReviewAction,
            CreatorAction,
            ApplyRequest,
            SubmitVideoRequest,
            SubmitSnsRequest,
            UploadContentRequest,
            UpdateContactRequest,
            ReviewApplicationRequest,
            ApplicationQuery,
            ExportQuery,
            ApplicationResponse,
            ApplicantSummary,
            AdminApplicationResponse,
            StepState,
            StepStates,
            WorkflowResponse,
            ShareMaterialsRequest,
            MaterialsResponse,
            PointBalanceResponse,
            PointHistoryQuery,
            AdjustPointsRequest,
            PointTransactionResponse,
            CreateWithdrawalRequest,
            WithdrawalAction,
            ProcessWithdrawalRequest,
            WithdrawalQuery,
            WithdrawalResponse,
            BankTransferResponse,
            ProcessWithdrawalResponse,
            SmtpSettings,
            SendEmailRequest,
            SendEmailResponse,
            DashboardStats,
            TableStatus,
            SchemaCheckResponse,
            ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Authentication API"),
        (name = "profile", description = "Creator profile API"),
        (name = "campaign", description = "Campaign API"),
        (name = "application", description = "Application workflow API"),
        (name = "material", description = "Shooting materials API"),
        (name = "point", description = "Point ledger API"),
        (name = "withdrawal", description = "Withdrawal API"),
        (name = "email", description = "Email delivery API"),
        (name = "admin", description = "Administration API"),
    ),
    info(
        title = "CNEC Backend API",
        version = "1.0.0",
        description = "CNEC Japan campaign management REST API documentation"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_lists_admin_routes() {
        let doc = ApiDoc::openapi();
        let json = doc.to_json().unwrap();
        assert!(json.contains("/admin/withdrawals/{id}/process"));
        assert!(json.contains("/functions/send-email"));
        assert!(json.contains("bearer_auth"));
    }
}
