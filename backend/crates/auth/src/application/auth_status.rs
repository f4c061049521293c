//! Auth Status Use Case
//!
//! Reports whether a bearer token is currently good. This flow never
//! errors: a missing, malformed, expired or orphaned token is simply
//! an unauthenticated answer.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::verify_access_token;
use crate::domain::repository::UserRepository;

/// Auth status output
pub struct AuthStatusOutput {
    pub authenticated: bool,
    pub public_id: Option<String>,
    pub user_role: Option<String>,
    pub expires_at_ms: Option<i64>,
}

impl AuthStatusOutput {
    fn unauthenticated() -> Self {
        Self {
            authenticated: false,
            public_id: None,
            user_role: None,
            expires_at_ms: None,
        }
    }
}

/// Auth status use case
pub struct AuthStatusUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> AuthStatusUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, token: Option<&str>) -> AuthStatusOutput {
        let Some(token) = token else {
            return AuthStatusOutput::unauthenticated();
        };

        let Some(claims) = verify_access_token(token, &self.config.token_secret) else {
            return AuthStatusOutput::unauthenticated();
        };

        // A valid signature for a user that no longer exists is still
        // an unauthenticated answer, not an error
        let user = match self.user_repo.find_by_id(claims.user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => return AuthStatusOutput::unauthenticated(),
            Err(e) => {
                tracing::warn!(error = %e, "User lookup failed during status check");
                return AuthStatusOutput::unauthenticated();
            }
        };

        AuthStatusOutput {
            authenticated: true,
            public_id: Some(user.public_id.to_string()),
            user_role: Some(user.user_role.to_string()),
            expires_at_ms: Some(claims.expires_at_ms),
        }
    }
}
