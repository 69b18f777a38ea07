use crate::config::SmtpConfig;
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

const DEFAULT_SMTP_TIMEOUT: Duration = Duration::from_secs(30);

fn default_smtp_port() -> u16 {
    587
}

/// 调用方提供的 SMTP 设置，兼容前端的 camelCase 字段名
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SmtpSettings {
    #[serde(alias = "smtpHost", default)]
    pub smtp_host: String,
    #[serde(alias = "smtpPort", default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(alias = "smtpUser", default)]
    pub smtp_user: String,
    #[serde(alias = "smtpPass", default)]
    pub smtp_pass: String,
    #[serde(alias = "senderName", default)]
    pub sender_name: Option<String>,
    #[serde(alias = "senderEmail", default)]
    pub sender_email: Option<String>,
    /// 隐式 TLS；未指定时端口 465 视为 true
    #[serde(default)]
    pub secure: Option<bool>,
}

impl SmtpSettings {
    pub fn use_implicit_tls(&self) -> bool {
        self.secure.unwrap_or(self.smtp_port == 465)
    }

    pub fn from_address(&self) -> &str {
        self.sender_email.as_deref().unwrap_or(&self.smtp_user)
    }
}

impl From<&SmtpConfig> for SmtpSettings {
    fn from(cfg: &SmtpConfig) -> Self {
        Self {
            smtp_host: cfg.host.clone(),
            smtp_port: cfg.port,
            smtp_user: cfg.username.clone(),
            smtp_pass: cfg.password.clone(),
            sender_name: cfg.sender_name.clone(),
            sender_email: cfg.sender_email.clone(),
            secure: cfg.secure,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    /// 逗号分隔的多个收件人
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MailError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("SMTP authentication failed: {0}")]
    Auth(String),
    #[error("SMTP connection failed: {0}")]
    Connection(String),
    #[error("SMTP timed out: {0}")]
    Timeout(String),
    #[error("SMTP send failed: {0}")]
    Other(String),
}

impl MailError {
    /// nodemailer 风格的错误码，前端按此展示提示
    pub fn code(&self) -> &'static str {
        match self {
            MailError::InvalidAddress(_) => "EENVELOPE",
            MailError::Auth(_) => "EAUTH",
            MailError::Connection(_) => "ECONNECTION",
            MailError::Timeout(_) => "ETIMEDOUT",
            MailError::Other(_) => "EMESSAGE",
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            MailError::InvalidAddress(detail) => {
                format!("メールアドレスの形式が正しくありません: {detail}")
            }
            MailError::Auth(_) => "SMTP認証に失敗しました。ユーザー名とアプリパスワードを確認してください。"
                .to_string(),
            MailError::Connection(_) => {
                "SMTPサーバーに接続できません。ホスト名とポート番号を確認してください。".to_string()
            }
            MailError::Timeout(_) => {
                "SMTPサーバーへの接続がタイムアウトしました。しばらくしてから再度お試しください。"
                    .to_string()
            }
            MailError::Other(detail) => format!("メール送信に失敗しました: {detail}"),
        }
    }

    /// 按 SMTP 回复码与失败类型归类
    pub fn classify(reply_code: Option<u16>, is_timeout: bool, detail: String) -> Self {
        match reply_code {
            Some(530 | 534 | 535) => MailError::Auth(detail),
            _ if is_timeout => MailError::Timeout(detail),
            Some(_) => MailError::Other(detail),
            None => MailError::Connection(detail),
        }
    }
}

impl From<lettre::transport::smtp::Error> for MailError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        let reply_code = err.status().and_then(|code| code.to_string().parse::<u16>().ok());
        MailError::classify(reply_code, err.is_timeout(), err.to_string())
    }
}

/// 邮件发送通道，返回 Message-ID
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, settings: &SmtpSettings, mail: &OutgoingMail) -> Result<String, MailError>;
}

fn parse_mailbox(raw: &str) -> Result<Mailbox, MailError> {
    raw.trim()
        .parse::<Mailbox>()
        .map_err(|e| MailError::InvalidAddress(format!("{raw}: {e}")))
}

pub fn build_message(
    settings: &SmtpSettings,
    mail: &OutgoingMail,
    message_id: &str,
) -> Result<Message, MailError> {
    let from_address = settings
        .from_address()
        .parse::<Address>()
        .map_err(|e| MailError::InvalidAddress(format!("{}: {e}", settings.from_address())))?;
    let from = Mailbox::new(settings.sender_name.clone(), from_address);

    let mut builder = Message::builder()
        .from(from)
        .subject(mail.subject.clone())
        .message_id(Some(message_id.to_string()));

    let recipients: Vec<&str> = mail
        .to
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if recipients.is_empty() {
        return Err(MailError::InvalidAddress("no recipients".to_string()));
    }
    for recipient in recipients {
        builder = builder.to(parse_mailbox(recipient)?);
    }

    let message = match &mail.text {
        Some(text) => builder.multipart(MultiPart::alternative_plain_html(
            text.clone(),
            mail.html.clone(),
        )),
        None => builder.header(ContentType::TEXT_HTML).body(mail.html.clone()),
    };
    message.map_err(|e| MailError::Other(e.to_string()))
}

/// 生产环境使用的 lettre SMTP 通道
#[derive(Clone)]
pub struct SmtpMailTransport {
    timeout: Duration,
}

impl SmtpMailTransport {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_SMTP_TIMEOUT,
        }
    }
}

impl Default for SmtpMailTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, settings: &SmtpSettings, mail: &OutgoingMail) -> Result<String, MailError> {
        let domain = settings
            .from_address()
            .rsplit_once('@')
            .map(|(_, d)| d.to_string())
            .unwrap_or_else(|| "localhost".to_string());
        let message_id = format!("<{}@{}>", Uuid::new_v4(), domain);
        let message = build_message(settings, mail, &message_id)?;

        let builder = if settings.use_implicit_tls() {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_host)
        }?;

        let transport = builder
            .port(settings.smtp_port)
            .credentials(Credentials::new(
                settings.smtp_user.clone(),
                settings.smtp_pass.clone(),
            ))
            .timeout(Some(self.timeout))
            .build();

        let response = transport.send(message).await?;
        log::info!(
            "Mail sent via {}:{} (reply {})",
            settings.smtp_host,
            settings.smtp_port,
            response.code()
        );
        Ok(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> SmtpSettings {
        SmtpSettings {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            smtp_user: "noreply@cnec.jp".to_string(),
            smtp_pass: "app-password".to_string(),
            sender_name: Some("CNEC Japan".to_string()),
            sender_email: None,
            secure: None,
        }
    }

    fn mail(to: &str) -> OutgoingMail {
        OutgoingMail {
            to: to.to_string(),
            subject: "テスト".to_string(),
            html: "<p>こんにちは</p>".to_string(),
            text: Some("こんにちは".to_string()),
        }
    }

    #[test]
    fn test_classify_smtp_failures() {
        assert_eq!(
            MailError::classify(Some(535), false, "bad creds".into()).code(),
            "EAUTH"
        );
        assert_eq!(
            MailError::classify(None, true, "timed out".into()).code(),
            "ETIMEDOUT"
        );
        assert_eq!(
            MailError::classify(None, false, "refused".into()).code(),
            "ECONNECTION"
        );
        assert_eq!(
            MailError::classify(Some(550), false, "mailbox unavailable".into()).code(),
            "EMESSAGE"
        );
    }

    #[test]
    fn test_settings_accept_camel_case() {
        let raw = serde_json::json!({
            "smtpHost": "smtp.example.jp",
            "smtpPort": 465,
            "smtpUser": "user@example.jp",
            "smtpPass": "pw",
            "senderName": "CNEC"
        });
        let s: SmtpSettings = serde_json::from_value(raw).unwrap();
        assert_eq!(s.smtp_host, "smtp.example.jp");
        assert!(s.use_implicit_tls());
        assert_eq!(s.from_address(), "user@example.jp");
    }

    #[test]
    fn test_default_port_is_starttls() {
        let raw = serde_json::json!({
            "smtp_host": "smtp.example.jp",
            "smtp_user": "user@example.jp",
            "smtp_pass": "pw"
        });
        let s: SmtpSettings = serde_json::from_value(raw).unwrap();
        assert_eq!(s.smtp_port, 587);
        assert!(!s.use_implicit_tls());
    }

    #[test]
    fn test_build_message_multiple_recipients() {
        let msg = build_message(&settings(), &mail("a@example.jp, b@example.jp"), "<id@cnec.jp>")
            .unwrap();
        let raw = String::from_utf8(msg.formatted()).unwrap();
        assert!(raw.contains("a@example.jp"));
        assert!(raw.contains("b@example.jp"));
        assert!(raw.contains("<id@cnec.jp>"));
    }

    #[test]
    fn test_build_message_rejects_bad_recipient() {
        let err = build_message(&settings(), &mail("not-an-address"), "<id@cnec.jp>").unwrap_err();
        assert_eq!(err.code(), "EENVELOPE");

        let err = build_message(&settings(), &mail(" , "), "<id@cnec.jp>").unwrap_err();
        assert_eq!(err.code(), "EENVELOPE");
    }
}
