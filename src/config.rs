use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub payout: PayoutConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 前端来源白名单，为空时放行全部
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expires_in: i64,  // seconds
    pub refresh_token_expires_in: i64, // seconds
}

/// 启动时自动创建/提升的管理员账号，email 或 password 为空则跳过
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AdminConfig {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl AdminConfig {
    pub fn is_configured(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }
}

/// 系统通知邮件使用的默认 SMTP 设置，host 为空时不发送通知
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    #[serde(default)]
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub sender_email: Option<String>,
    #[serde(default)]
    pub secure: Option<bool>,
}

fn default_smtp_port() -> u16 {
    587
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
            sender_name: None,
            sender_email: None,
            secure: None,
        }
    }
}

impl SmtpConfig {
    pub fn is_enabled(&self) -> bool {
        !self.host.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutConfig {
    /// 单次提现最少积分
    #[serde(default = "default_min_withdrawal_points")]
    pub min_withdrawal_points: i64,
    /// 1 积分 = N 日元
    #[serde(default = "default_yen_per_point")]
    pub yen_per_point: i64,
}

fn default_min_withdrawal_points() -> i64 {
    1000
}

fn default_yen_per_point() -> i64 {
    1
}

impl Default for PayoutConfig {
    fn default() -> Self {
        Self {
            min_withdrawal_points: default_min_withdrawal_points(),
            yen_per_point: default_yen_per_point(),
        }
    }
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        fn get_env(name: &str) -> Option<String> {
            env::var(name).ok()
        }
        fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
            env::var(name)
                .ok()
                .and_then(|v| v.parse::<T>().ok())
                .unwrap_or(default)
        }

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let mut config: Config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => {
                toml::from_str(&config_str).map_err(|e| format!("解析配置文件失败: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // 数据库 URL 在无配置文件时必须提供
                let database_url = get_env("DATABASE_URL")
                    .ok_or("缺少 DATABASE_URL 环境变量，且未找到配置文件 config.toml")?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                        allowed_origins: Vec::new(),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    jwt: JwtConfig {
                        secret: get_env("JWT_SECRET")
                            .unwrap_or_else(|| "change-me-in-production".to_string()),
                        access_token_expires_in: get_env_parse("JWT_ACCESS_EXPIRES_IN", 7200i64),
                        refresh_token_expires_in: get_env_parse(
                            "JWT_REFRESH_EXPIRES_IN",
                            2_592_000i64,
                        ),
                    },
                    admin: AdminConfig::default(),
                    smtp: SmtpConfig::default(),
                    payout: PayoutConfig::default(),
                }
            }
            Err(e) => {
                return Err(format!("无法读取配置文件 {config_path}: {e}").into());
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// 环境变量覆盖（即便文件存在时也覆盖）
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Ok(v) = env::var("CORS_ALLOWED_ORIGINS") {
            self.server.allowed_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            self.database.max_connections = mc;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.jwt.secret = v;
        }
        if let Ok(v) = env::var("JWT_ACCESS_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            self.jwt.access_token_expires_in = n;
        }
        if let Ok(v) = env::var("JWT_REFRESH_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            self.jwt.refresh_token_expires_in = n;
        }

        // Admin bootstrap
        if let Ok(v) = env::var("ADMIN_EMAIL") {
            self.admin.email = v;
        }
        if let Ok(v) = env::var("ADMIN_PASSWORD") {
            self.admin.password = v;
        }
        if let Ok(v) = env::var("ADMIN_NAME") {
            self.admin.name = Some(v);
        }

        // SMTP
        if let Ok(v) = env::var("SMTP_HOST") {
            self.smtp.host = v;
        }
        if let Ok(v) = env::var("SMTP_PORT")
            && let Ok(p) = v.parse()
        {
            self.smtp.port = p;
        }
        if let Ok(v) = env::var("SMTP_USERNAME") {
            self.smtp.username = v;
        }
        if let Ok(v) = env::var("SMTP_PASSWORD") {
            self.smtp.password = v;
        }
        if let Ok(v) = env::var("SMTP_SENDER_NAME") {
            self.smtp.sender_name = Some(v);
        }
        if let Ok(v) = env::var("SMTP_SENDER_EMAIL") {
            self.smtp.sender_email = Some(v);
        }
        if let Ok(v) = env::var("SMTP_SECURE")
            && let Ok(b) = v.parse()
        {
            self.smtp.secure = Some(b);
        }

        if let Ok(v) = env::var("PAYOUT_MIN_WITHDRAWAL_POINTS")
            && let Ok(n) = v.parse()
        {
            self.payout.min_withdrawal_points = n;
        }
        if let Ok(v) = env::var("PAYOUT_YEN_PER_POINT")
            && let Ok(n) = v.parse()
        {
            self.payout.yen_per_point = n;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_toml_uses_defaults() {
        let raw = r#"
            [server]
            host = "127.0.0.1"
            port = 9000

            [database]
            url = "postgres://localhost/cnec"
            max_connections = 5

            [jwt]
            secret = "s"
            access_token_expires_in = 60
            refresh_token_expires_in = 120
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.server.port, 9000);
        assert!(!config.admin.is_configured());
        assert!(!config.smtp.is_enabled());
        assert_eq!(config.smtp.port, 587);
        assert_eq!(config.payout.min_withdrawal_points, 1000);
        assert_eq!(config.payout.yen_per_point, 1);
    }

    #[test]
    fn test_parse_smtp_and_payout_sections() {
        let raw = r#"
            [server]
            host = "0.0.0.0"
            port = 8080

            [database]
            url = "postgres://localhost/cnec"
            max_connections = 10

            [jwt]
            secret = "s"
            access_token_expires_in = 60
            refresh_token_expires_in = 120

            [admin]
            email = "admin@cnec.jp"
            password = "Admin12345"

            [smtp]
            host = "smtp.gmail.com"
            port = 465
            username = "noreply@cnec.jp"
            password = "app-password"
            secure = true

            [payout]
            min_withdrawal_points = 3000
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert!(config.admin.is_configured());
        assert!(config.smtp.is_enabled());
        assert_eq!(config.smtp.secure, Some(true));
        assert_eq!(config.payout.min_withdrawal_points, 3000);
        assert_eq!(config.payout.yen_per_point, 1);
    }
}
