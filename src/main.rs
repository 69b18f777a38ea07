use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use std::sync::Arc;

use cnec_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    external::SmtpMailTransport,
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    tasks,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration file");

    // 创建数据库连接池
    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    // 运行数据库迁移
    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // 创建JWT服务
    let jwt_service = JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expires_in,
        config.jwt.refresh_token_expires_in,
    );

    // 邮件通道
    let mail_service = MailService::new(Arc::new(SmtpMailTransport::new()), &config.smtp);

    // 创建服务
    let auth_service = AuthService::new(pool.clone(), jwt_service.clone());
    let profile_service = ProfileService::new(pool.clone());
    let campaign_service = CampaignService::new(pool.clone());
    let application_service = ApplicationService::new(pool.clone(), mail_service.clone());
    let material_service = MaterialService::new(pool.clone());
    let point_service = PointService::new(pool.clone());
    let withdrawal_service =
        WithdrawalService::new(pool.clone(), config.payout.clone(), mail_service.clone());
    let admin_service = AdminService::new(pool.clone());

    if let Err(e) = auth_service.bootstrap_admin(&config.admin).await {
        log::error!("Admin bootstrap failed: {e:?}");
    }

    // 启动后台定时任务
    tasks::spawn_all(campaign_service.clone());

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    let allowed_origins = config.server.allowed_origins.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .wrap(create_cors(&allowed_origins))
            .wrap(Logger::default())
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(profile_service.clone()))
            .app_data(web::Data::new(campaign_service.clone()))
            .app_data(web::Data::new(application_service.clone()))
            .app_data(web::Data::new(material_service.clone()))
            .app_data(web::Data::new(point_service.clone()))
            .app_data(web::Data::new(withdrawal_service.clone()))
            .app_data(web::Data::new(mail_service.clone()))
            .app_data(web::Data::new(admin_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::auth_config)
                    .configure(handlers::profile_config)
                    .configure(handlers::campaign_config)
                    .configure(handlers::application_config)
                    .configure(handlers::material_config)
                    .configure(handlers::point_config)
                    .configure(handlers::withdrawal_config)
                    .configure(handlers::email_config)
                    .configure(handlers::admin_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
