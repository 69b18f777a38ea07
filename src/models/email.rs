use crate::external::SmtpSettings;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// send-email 请求体，字段缺失由 handler 返回 400
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SendEmailRequest {
    pub to: Option<String>,
    pub subject: Option<String>,
    pub html: Option<String>,
    pub text: Option<String>,
    pub settings: Option<SmtpSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailResponse {
    pub success: bool,
    pub message_id: String,
}
