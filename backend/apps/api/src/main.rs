//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use auth::{AuthConfig, LogNotifier, PgAuthRepository, auth_router};
use axum::{
    Router, http,
    http::{Method, header},
};
use chrono::{Duration, Utc};
use otp::{OtpConfig, store::OtpStore};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

/// Verification code records older than this are swept at startup
const OTP_RETENTION_DAYS: i64 = 7;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,otp=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Startup cleanup: sweep verification code records no live flow
    // can reach again. Errors here should not prevent server startup.
    let otp_store_for_cleanup = OtpStore::new(pool.clone());
    match otp_store_for_cleanup
        .purge_stale(Utc::now() - Duration::days(OTP_RETENTION_DAYS))
        .await
    {
        Ok(deleted) => {
            tracing::info!(records_deleted = deleted, "OTP record cleanup completed");
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "OTP record cleanup failed, continuing anyway"
            );
        }
    }

    // Engine configuration
    let otp_config = if cfg!(debug_assertions) {
        OtpConfig::development()
    } else {
        OtpConfig::from_env()?
    };

    // Auth configuration; in production the token secret must come
    // from the environment so tokens survive restarts
    let auth_config = if cfg!(debug_assertions) {
        AuthConfig::development()
    } else {
        AuthConfig::from_env()?
    };

    let users = PgAuthRepository::new(pool.clone());
    let otp_records = OtpStore::new(pool.clone());
    let notifier = LogNotifier::new();

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .nest(
            "/api/auth",
            auth_router(users, otp_records, notifier, auth_config, otp_config),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], 31113));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
