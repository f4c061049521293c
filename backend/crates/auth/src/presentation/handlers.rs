//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use std::sync::Arc;

use otp::application::config::OtpConfig;
use otp::domain::repository::OtpRecordRepository;

use crate::application::config::AuthConfig;
use crate::application::{
    AuthStatusUseCase, ConfirmPasswordResetInput, LoginInput, LoginUseCase, PasswordResetUseCase,
    RegisterInput, RegisterUseCase, RequestPasswordResetInput, ResendOtpInput, ResendOtpUseCase,
    VerifyLoginInput, VerifyRegistrationInput, VerifyRegistrationUseCase,
};
use crate::domain::notification::OtpNotifier;
use crate::domain::repository::UserRepository;
use crate::error::AuthResult;
use crate::presentation::dto::{
    AuthStatusResponse, LoginRequest, LoginResponse, MessageResponse, PasswordResetConfirmRequest,
    PasswordResetRequest, RegisterRequest, RegisterResponse, ResendOtpRequest, VerifyLoginRequest,
    VerifyOtpRequest,
};

/// Shared state for auth handlers
pub struct AuthAppState<U, O, N>
where
    U: UserRepository,
    O: OtpRecordRepository,
    N: OtpNotifier,
{
    pub users: Arc<U>,
    pub otp_records: Arc<O>,
    pub notifier: Arc<N>,
    pub config: Arc<AuthConfig>,
    pub otp_config: Arc<OtpConfig>,
}

// Manual impl: the repositories themselves need not be Clone, only the Arcs
impl<U, O, N> Clone for AuthAppState<U, O, N>
where
    U: UserRepository,
    O: OtpRecordRepository,
    N: OtpNotifier,
{
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            otp_records: self.otp_records.clone(),
            notifier: self.notifier.clone(),
            config: self.config.clone(),
            otp_config: self.otp_config.clone(),
        }
    }
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/auth/register
pub async fn register<U, O, N>(
    State(state): State<AuthAppState<U, O, N>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<impl IntoResponse>
where
    U: UserRepository + Send + Sync + 'static,
    O: OtpRecordRepository + Send + Sync + 'static,
    N: OtpNotifier + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(
        state.users.clone(),
        state.otp_records.clone(),
        state.notifier.clone(),
        state.config.clone(),
        state.otp_config.clone(),
    );

    let input = RegisterInput {
        display_name: req.display_name,
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            public_id: output.public_id,
            message: output.message,
        }),
    ))
}

// ============================================================================
// Registration Verification
// ============================================================================

/// POST /api/auth/verify-otp
pub async fn verify_otp<U, O, N>(
    State(state): State<AuthAppState<U, O, N>>,
    Json(req): Json<VerifyOtpRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    O: OtpRecordRepository + Send + Sync + 'static,
    N: OtpNotifier + Send + Sync + 'static,
{
    let use_case = VerifyRegistrationUseCase::new(
        state.users.clone(),
        state.otp_records.clone(),
        state.otp_config.clone(),
    );

    let input = VerifyRegistrationInput {
        email: req.email,
        channel: req.channel,
        code: req.otp_code,
    };

    let output = use_case.execute(input).await?;

    Ok(Json(MessageResponse {
        message: output.message,
    }))
}

/// POST /api/auth/resend-otp
pub async fn resend_otp<U, O, N>(
    State(state): State<AuthAppState<U, O, N>>,
    Json(req): Json<ResendOtpRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    O: OtpRecordRepository + Send + Sync + 'static,
    N: OtpNotifier + Send + Sync + 'static,
{
    let use_case = ResendOtpUseCase::new(
        state.users.clone(),
        state.otp_records.clone(),
        state.notifier.clone(),
        state.otp_config.clone(),
    );

    let input = ResendOtpInput {
        email: req.email,
        purpose: req.purpose,
        channel: req.channel,
    };

    let output = use_case.execute(input).await?;

    Ok(Json(MessageResponse {
        message: output.message,
    }))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<U, O, N>(
    State(state): State<AuthAppState<U, O, N>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Json<LoginResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    O: OtpRecordRepository + Send + Sync + 'static,
    N: OtpNotifier + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(
        state.users.clone(),
        state.otp_records.clone(),
        state.notifier.clone(),
        state.config.clone(),
        state.otp_config.clone(),
    );

    let input = LoginInput {
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    Ok(Json(LoginResponse {
        public_id: output.public_id,
        requires_otp: output.requires_otp,
        access_token: output.access_token,
        expires_at_ms: output.expires_at_ms,
    }))
}

/// POST /api/auth/login/verify-otp
pub async fn login_verify_otp<U, O, N>(
    State(state): State<AuthAppState<U, O, N>>,
    Json(req): Json<VerifyLoginRequest>,
) -> AuthResult<Json<LoginResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    O: OtpRecordRepository + Send + Sync + 'static,
    N: OtpNotifier + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(
        state.users.clone(),
        state.otp_records.clone(),
        state.notifier.clone(),
        state.config.clone(),
        state.otp_config.clone(),
    );

    let input = VerifyLoginInput {
        email: req.email,
        channel: req.channel,
        code: req.otp_code,
    };

    let output = use_case.verify_otp(input).await?;

    Ok(Json(LoginResponse {
        public_id: output.public_id,
        requires_otp: output.requires_otp,
        access_token: output.access_token,
        expires_at_ms: output.expires_at_ms,
    }))
}

// ============================================================================
// Password Reset
// ============================================================================

/// POST /api/auth/password-reset/request
pub async fn password_reset_request<U, O, N>(
    State(state): State<AuthAppState<U, O, N>>,
    Json(req): Json<PasswordResetRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    O: OtpRecordRepository + Send + Sync + 'static,
    N: OtpNotifier + Send + Sync + 'static,
{
    let use_case = PasswordResetUseCase::new(
        state.users.clone(),
        state.otp_records.clone(),
        state.notifier.clone(),
        state.config.clone(),
        state.otp_config.clone(),
    );

    let input = RequestPasswordResetInput {
        email: req.email,
        channel: req.channel,
    };

    let output = use_case.request(input).await?;

    Ok(Json(MessageResponse {
        message: output.message,
    }))
}

/// POST /api/auth/password-reset/confirm
pub async fn password_reset_confirm<U, O, N>(
    State(state): State<AuthAppState<U, O, N>>,
    Json(req): Json<PasswordResetConfirmRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    O: OtpRecordRepository + Send + Sync + 'static,
    N: OtpNotifier + Send + Sync + 'static,
{
    let use_case = PasswordResetUseCase::new(
        state.users.clone(),
        state.otp_records.clone(),
        state.notifier.clone(),
        state.config.clone(),
        state.otp_config.clone(),
    );

    let input = ConfirmPasswordResetInput {
        email: req.email,
        channel: req.channel,
        code: req.otp_code,
        new_password: req.new_password,
    };

    let output = use_case.confirm(input).await?;

    Ok(Json(MessageResponse {
        message: output.message,
    }))
}

// ============================================================================
// Auth Status
// ============================================================================

/// GET /api/auth/status
///
/// Always 200; a missing or bad token means `authenticated: false`.
pub async fn auth_status<U, O, N>(
    State(state): State<AuthAppState<U, O, N>>,
    headers: HeaderMap,
) -> Json<AuthStatusResponse>
where
    U: UserRepository + Send + Sync + 'static,
    O: OtpRecordRepository + Send + Sync + 'static,
    N: OtpNotifier + Send + Sync + 'static,
{
    let token = extract_bearer_token(&headers);

    let use_case = AuthStatusUseCase::new(state.users.clone(), state.config.clone());
    let status = use_case.execute(token.as_deref()).await;

    Json(AuthStatusResponse {
        authenticated: status.authenticated,
        public_id: status.public_id,
        user_role: status.user_role,
        expires_at_ms: status.expires_at_ms,
    })
}

// ============================================================================
// Helper Functions
// ============================================================================

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}
