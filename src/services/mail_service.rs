use crate::config::SmtpConfig;
use crate::external::{MailError, MailTransport, OutgoingMail, SmtpSettings};
use crate::models::SendEmailRequest;
use std::sync::Arc;

/// 邮件服务：send-email 接口与系统通知共用同一通道
#[derive(Clone)]
pub struct MailService {
    transport: Arc<dyn MailTransport>,
    default_settings: Option<SmtpSettings>,
}

/// 校验后的 send-email 请求
#[derive(Debug)]
pub struct ValidatedSendEmail {
    pub mail: OutgoingMail,
    pub settings: SmtpSettings,
}

fn required(value: Option<String>, field: &str) -> Result<String, String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(format!("Missing required field: {field}")),
    }
}

impl SendEmailRequest {
    pub fn validate(self) -> Result<ValidatedSendEmail, String> {
        let to = required(self.to, "to")?;
        let subject = required(self.subject, "subject")?;
        let html = required(self.html, "html")?;
        let settings = self
            .settings
            .ok_or_else(|| "Missing required field: settings".to_string())?;
        // 缺字段在反序列化时为空串，这里统一报 400
        for (value, field) in [
            (&settings.smtp_host, "settings.smtp_host"),
            (&settings.smtp_user, "settings.smtp_user"),
            (&settings.smtp_pass, "settings.smtp_pass"),
        ] {
            if value.trim().is_empty() {
                return Err(format!("Missing required field: {field}"));
            }
        }

        Ok(ValidatedSendEmail {
            mail: OutgoingMail {
                to,
                subject,
                html,
                text: self.text.filter(|t| !t.is_empty()),
            },
            settings,
        })
    }
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl MailService {
    pub fn new(transport: Arc<dyn MailTransport>, smtp: &SmtpConfig) -> Self {
        let default_settings = smtp.is_enabled().then(|| SmtpSettings::from(smtp));
        if default_settings.is_none() {
            log::warn!("SMTP host not configured, system notifications are disabled");
        }
        Self {
            transport,
            default_settings,
        }
    }

    pub async fn send(
        &self,
        settings: &SmtpSettings,
        mail: &OutgoingMail,
    ) -> Result<String, MailError> {
        self.transport.send(settings, mail).await
    }

    /// 系统通知：失败只记日志，不影响业务
    pub async fn notify(&self, to: &str, subject: &str, body: &str) {
        let Some(settings) = &self.default_settings else {
            log::debug!("Notification to {to} skipped: SMTP disabled");
            return;
        };

        let mail = OutgoingMail {
            to: to.to_string(),
            subject: subject.to_string(),
            html: format!(
                "<div style=\"font-family:sans-serif;line-height:1.6\">{}</div>",
                escape_html(body).replace('\n', "<br>")
            ),
            text: Some(body.to_string()),
        };

        match self.transport.send(settings, &mail).await {
            Ok(message_id) => log::info!("Notification sent to {to} ({message_id})"),
            Err(e) => log::error!("Notification to {to} failed [{}]: {e}", e.code()),
        }
    }

    pub async fn notify_application_approved(&self, to: &str, name: &str, campaign_title: &str) {
        let body = format!(
            "{name} 様\n\n「{campaign_title}」への応募が承認されました。\nマイページから撮影ガイドを確認し、動画を提出してください。\n\nCNEC Japan"
        );
        self.notify(to, &format!("【CNEC】応募承認のお知らせ: {campaign_title}"), &body)
            .await;
    }

    pub async fn notify_application_rejected(
        &self,
        to: &str,
        name: &str,
        campaign_title: &str,
        reason: Option<&str>,
    ) {
        let mut body = format!(
            "{name} 様\n\n誠に残念ながら、「{campaign_title}」への応募は今回見送りとなりました。"
        );
        if let Some(reason) = reason.filter(|r| !r.trim().is_empty()) {
            body.push_str(&format!("\n理由: {reason}"));
        }
        body.push_str("\n\nまたのご応募をお待ちしております。\n\nCNEC Japan");
        self.notify(to, &format!("【CNEC】応募結果のお知らせ: {campaign_title}"), &body)
            .await;
    }

    pub async fn notify_withdrawal_completed(&self, to: &str, name: &str, amount_yen: i64) {
        let body = format!(
            "{name} 様\n\nご申請いただいた出金 {amount_yen} 円の振込が完了しました。\nご登録の口座をご確認ください。\n\nCNEC Japan"
        );
        self.notify(to, "【CNEC】出金完了のお知らせ", &body).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<OutgoingMail>>,
    }

    #[async_trait]
    impl MailTransport for RecordingTransport {
        async fn send(
            &self,
            _settings: &SmtpSettings,
            mail: &OutgoingMail,
        ) -> Result<String, MailError> {
            self.sent.lock().unwrap().push(mail.clone());
            Ok("<test@cnec.jp>".to_string())
        }
    }

    fn smtp(host: &str) -> SmtpConfig {
        SmtpConfig {
            host: host.to_string(),
            username: "noreply@cnec.jp".to_string(),
            password: "secret".to_string(),
            ..SmtpConfig::default()
        }
    }

    #[test]
    fn test_validate_send_email_request() {
        let request = SendEmailRequest {
            to: Some("a@example.jp".into()),
            subject: Some("件名".into()),
            html: Some("<p>x</p>".into()),
            text: Some(String::new()),
            settings: Some(SmtpSettings::from(&smtp("smtp.example.jp"))),
        };
        let validated = request.clone().validate().unwrap();
        assert_eq!(validated.mail.text, None);

        let mut missing = request.clone();
        missing.subject = Some("   ".into());
        assert!(missing.validate().unwrap_err().contains("subject"));

        let mut missing = request.clone();
        missing.settings = None;
        assert!(missing.validate().unwrap_err().contains("settings"));

        let mut missing = request;
        if let Some(settings) = missing.settings.as_mut() {
            settings.smtp_pass = String::new();
        }
        assert_eq!(
            missing.validate().unwrap_err(),
            "Missing required field: settings.smtp_pass"
        );
    }

    #[tokio::test]
    async fn test_notification_uses_default_settings() {
        let transport = Arc::new(RecordingTransport::default());
        let service = MailService::new(transport.clone(), &smtp("smtp.example.jp"));
        service
            .notify_application_rejected("a@example.jp", "山田", "新作リップ", Some("<条件不一致>"))
            .await;

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].subject.contains("新作リップ"));
        assert!(sent[0].html.contains("&lt;条件不一致&gt;"));
    }

    #[tokio::test]
    async fn test_notification_skipped_without_host() {
        let transport = Arc::new(RecordingTransport::default());
        let service = MailService::new(transport.clone(), &smtp(""));
        service.notify_withdrawal_completed("a@example.jp", "山田", 5000).await;
        assert!(transport.sent.lock().unwrap().is_empty());
    }
}
