//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use otp::application::config::OtpConfig;
use otp::domain::repository::OtpRecordRepository;
use otp::infra::postgres::PgOtpRepository;

use crate::application::config::AuthConfig;
use crate::domain::notification::OtpNotifier;
use crate::domain::repository::UserRepository;
use crate::infra::notify::LogNotifier;
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router with PostgreSQL repositories
pub fn auth_router(
    users: PgAuthRepository,
    otp_records: PgOtpRepository,
    notifier: LogNotifier,
    config: AuthConfig,
    otp_config: OtpConfig,
) -> Router {
    auth_router_generic(users, otp_records, notifier, config, otp_config)
}

/// Create an Auth router over any repository / notifier implementations
pub fn auth_router_generic<U, O, N>(
    users: U,
    otp_records: O,
    notifier: N,
    config: AuthConfig,
    otp_config: OtpConfig,
) -> Router
where
    U: UserRepository + Send + Sync + 'static,
    O: OtpRecordRepository + Send + Sync + 'static,
    N: OtpNotifier + Send + Sync + 'static,
{
    let state = AuthAppState {
        users: Arc::new(users),
        otp_records: Arc::new(otp_records),
        notifier: Arc::new(notifier),
        config: Arc::new(config),
        otp_config: Arc::new(otp_config),
    };

    Router::new()
        .route("/register", post(handlers::register::<U, O, N>))
        .route("/verify-otp", post(handlers::verify_otp::<U, O, N>))
        .route("/resend-otp", post(handlers::resend_otp::<U, O, N>))
        .route("/login", post(handlers::login::<U, O, N>))
        .route(
            "/login/verify-otp",
            post(handlers::login_verify_otp::<U, O, N>),
        )
        .route(
            "/password-reset/request",
            post(handlers::password_reset_request::<U, O, N>),
        )
        .route(
            "/password-reset/confirm",
            post(handlers::password_reset_confirm::<U, O, N>),
        )
        .route("/status", get(handlers::auth_status::<U, O, N>))
        .with_state(state)
}
