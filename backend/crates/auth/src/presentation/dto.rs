//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use otp::models::{OtpChannel, OtpPurpose};

// ============================================================================
// Register
// ============================================================================

/// Register request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub display_name: String,
    pub email: String,
    pub password: String,
}

/// Register response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub public_id: String,
    pub message: String,
}

// ============================================================================
// Verification Codes
// ============================================================================

/// Registration verification request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp_code: String,
    /// Defaults to EMAIL when omitted
    #[serde(default)]
    pub channel: OtpChannel,
}

/// Resend request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResendOtpRequest {
    pub email: String,
    pub purpose: OtpPurpose,
    #[serde(default)]
    pub channel: OtpChannel,
}

/// Plain confirmation message
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// Login
// ============================================================================

/// Login request (password step)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login verification request (code step, 2FA accounts only)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyLoginRequest {
    pub email: String,
    pub otp_code: String,
    #[serde(default)]
    pub channel: OtpChannel,
}

/// Login response, shared by both steps
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub public_id: String,
    /// True if a verification code was sent (need to call /login/verify-otp)
    pub requires_otp: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at_ms: Option<i64>,
}

// ============================================================================
// Password Reset
// ============================================================================

/// Reset request (step 1)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetRequest {
    pub email: String,
    #[serde(default)]
    pub channel: OtpChannel,
}

/// Reset confirmation (step 2)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetConfirmRequest {
    pub email: String,
    pub otp_code: String,
    pub new_password: String,
    #[serde(default)]
    pub channel: OtpChannel,
}

// ============================================================================
// Auth Status
// ============================================================================

/// Auth status response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatusResponse {
    pub authenticated: bool,
    pub public_id: Option<String>,
    pub user_role: Option<String>,
    pub expires_at_ms: Option<i64>,
}
