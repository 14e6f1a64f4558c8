//! Rushhour scheduling service entrypoint
//!
//! Reads configuration from a TOML file, runs migrations, seeds the default
//! admin account and serves the REST API.

use std::path::PathBuf;
use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use rushhour::application::services::identity::RegisterUser;
use rushhour::application::{ActivityService, AppointmentService, UserService};
use rushhour::infrastructure::crypto::jwt::JwtConfig;
use rushhour::infrastructure::database::migrator::Migrator;
use rushhour::infrastructure::database::repositories::{
    SeaOrmActivityRepository, SeaOrmAppointmentRepository, SeaOrmUserRepository,
};
use rushhour::{create_api_router, default_config_path, init_database, AppConfig, DatabaseConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("RUSHHOUR_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting Rushhour scheduling service...");

    // ── Prometheus metrics recorder (must be installed before any metrics calls) ──
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.url.clone(),
    };
    let db = init_database(&db_config).await?;
    Migrator::up(&db, None).await?;
    info!("Database migrations applied");

    let jwt_config = JwtConfig {
        secret: app_cfg.security.jwt_secret.clone(),
        expiration_hours: app_cfg.security.jwt_expiration_hours,
        issuer: "rushhour".to_string(),
    };
    info!(
        "JWT configured with {}h token expiration",
        jwt_config.expiration_hours
    );

    // ── Repositories and services ──────────────────────────────
    let user_repo = Arc::new(SeaOrmUserRepository::new(db.clone()));
    let activity_repo = Arc::new(SeaOrmActivityRepository::new(db.clone()));
    let appointment_repo = Arc::new(SeaOrmAppointmentRepository::new(db.clone()));

    let user_service = Arc::new(UserService::new(user_repo, jwt_config.clone()));
    let activity_service = Arc::new(ActivityService::new(activity_repo.clone()));
    let appointment_service = Arc::new(AppointmentService::new(appointment_repo, activity_repo));

    seed_default_admin(&user_service, &app_cfg).await;

    // ── HTTP server ────────────────────────────────────────────
    let app = create_api_router(
        user_service,
        activity_service,
        appointment_service,
        jwt_config,
        prometheus_handle,
    );

    let addr = app_cfg.server.address();
    info!("Listening on http://{}", addr);
    info!("Swagger UI at http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}

/// Ensure at least one admin account exists so the activity catalogue can be
/// managed on a fresh install.
async fn seed_default_admin(
    user_service: &Arc<UserService<SeaOrmUserRepository>>,
    cfg: &AppConfig,
) {
    let email = &cfg.security.default_admin_email;
    match user_service.get_by_email(email).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            let payload = RegisterUser {
                first_name: "Default".to_string(),
                last_name: "Admin".to_string(),
                email: email.clone(),
                password: cfg.security.default_admin_password.clone(),
                role: Some("admin".to_string()),
            };
            match user_service.register(payload).await {
                Ok(_) => warn!(
                    "Seeded default admin '{}' — change its password immediately",
                    email
                ),
                Err(e) => error!("Failed to seed default admin: {}", e),
            }
        }
        Err(e) => error!("Failed to check for default admin: {}", e),
    }
}
