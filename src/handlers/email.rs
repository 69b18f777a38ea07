use crate::middlewares::current_user;
use crate::models::*;
use crate::services::MailService;
use actix_web::{HttpRequest, HttpResponse, Result, error, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/functions/send-email",
    tag = "email",
    request_body = SendEmailRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "发送成功", body = SendEmailResponse),
        (status = 400, description = "缺少必填字段"),
        (status = 401, description = "未授权"),
        (status = 500, description = "SMTP 发送失败")
    )
)]
pub async fn send_email(
    mail_service: web::Data<MailService>,
    req: HttpRequest,
    request: web::Json<SendEmailRequest>,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    let validated = match request.into_inner().validate() {
        Ok(v) => v,
        Err(message) => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "success": false,
                "error": message
            })));
        }
    };

    match mail_service.send(&validated.settings, &validated.mail).await {
        Ok(message_id) => Ok(HttpResponse::Ok().json(SendEmailResponse {
            success: true,
            message_id,
        })),
        Err(e) => {
            log::error!(
                "send-email by user {} to {} failed [{}]: {e}",
                user.id,
                validated.mail.to,
                e.code()
            );
            Ok(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "error": e.user_message(),
                "code": e.code()
            })))
        }
    }
}

// 请求体无法解析时同样返回 JSON 格式的 400
fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(json!({
        "success": false,
        "error": format!("Invalid request body: {err}")
    }));
    error::InternalError::from_response(err, response).into()
}

pub fn email_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/functions")
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .route("/send-email", web::post().to(send_email)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SmtpConfig;
    use crate::entities::UserRole;
    use crate::external::{MailError, MailTransport, OutgoingMail, SmtpSettings};
    use crate::middlewares::AuthMiddleware;
    use crate::utils::JwtService;
    use actix_web::{App, http::StatusCode, test};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Arc;

    struct StubTransport {
        result: Result<String, MailError>,
    }

    #[async_trait]
    impl MailTransport for StubTransport {
        async fn send(
            &self,
            _settings: &SmtpSettings,
            _mail: &OutgoingMail,
        ) -> Result<String, MailError> {
            self.result.clone()
        }
    }

    fn jwt() -> JwtService {
        JwtService::new("test-secret", 3600, 86400)
    }

    fn mail_service(result: Result<String, MailError>) -> MailService {
        MailService::new(Arc::new(StubTransport { result }), &SmtpConfig::default())
    }

    fn payload() -> Value {
        json!({
            "to": "creator@example.jp",
            "subject": "選考結果",
            "html": "<p>おめでとうございます</p>",
            "settings": {
                "smtpHost": "smtp.example.jp",
                "smtpPort": 465,
                "smtpUser": "noreply@example.jp",
                "smtpPass": "secret"
            }
        })
    }

    async fn call(result: Result<String, MailError>, body: Value, token: Option<String>) -> (StatusCode, Value) {
        let jwt_service = jwt();
        let app = test::init_service(
            App::new()
                .wrap(AuthMiddleware::new(jwt_service))
                .app_data(web::Data::new(mail_service(result)))
                .service(web::scope("/api/v1").configure(email_config)),
        )
        .await;

        let mut req = test::TestRequest::post()
            .uri("/api/v1/functions/send-email")
            .set_json(body);
        if let Some(token) = token {
            req = req.insert_header(("Authorization", format!("Bearer {token}")));
        }

        match test::try_call_service(&app, req.to_request()).await {
            Ok(resp) => {
                let status = resp.status();
                let body: Value = test::read_body_json(resp).await;
                (status, body)
            }
            Err(e) => (e.as_response_error().status_code(), Value::Null),
        }
    }

    fn token() -> Option<String> {
        Some(jwt().generate_access_token(7, UserRole::Creator).unwrap())
    }

    #[actix_web::test]
    async fn test_send_email_requires_authentication() {
        let (status, _) = call(Ok("<id@example.jp>".into()), payload(), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_send_email_missing_fields() {
        let mut body = payload();
        body.as_object_mut().unwrap().remove("html");
        let (status, json) = call(Ok("<id@example.jp>".into()), body, token()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Missing required field: html");

        let mut body = payload();
        body.as_object_mut().unwrap().remove("settings");
        let (status, json) = call(Ok("<id@example.jp>".into()), body, token()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("settings"));
    }

    #[actix_web::test]
    async fn test_send_email_partial_settings_is_bad_request() {
        let mut body = payload();
        body["settings"] = json!({ "smtpHost": "smtp.example.jp" });
        let (status, json) = call(Ok("<id@example.jp>".into()), body, token()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Missing required field: settings.smtp_user");

        let mut body = payload();
        body["settings"]["smtpPort"] = json!("not-a-port");
        let (status, json) = call(Ok("<id@example.jp>".into()), body, token()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().is_some_and(|s| s.contains("Invalid request body")));
    }

    #[actix_web::test]
    async fn test_send_email_success_returns_message_id() {
        let (status, json) = call(Ok("<abc@example.jp>".into()), payload(), token()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["messageId"], "<abc@example.jp>");
    }

    #[actix_web::test]
    async fn test_send_email_smtp_failure_maps_code() {
        let failure = Err(MailError::Auth("535 authentication failed".into()));
        let (status, json) = call(failure, payload(), token()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], "EAUTH");
        assert!(json["error"].as_str().is_some_and(|s| !s.is_empty()));
    }
}
