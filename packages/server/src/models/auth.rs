use common::identity::{Identity, Session};
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Request body for signing in.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "s3cret!")]
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.email.trim().is_empty() {
        return Err(AppError::Validation("Email must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// Request body for creating an account.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SignupRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// At least 6 characters.
    #[schema(example = "s3cret!")]
    pub password: String,
    /// Must equal `password`.
    #[schema(example = "s3cret!")]
    pub confirm_password: String,
}

pub fn validate_signup_request(payload: &SignupRequest) -> Result<(), AppError> {
    if !EmailAddress::is_valid(payload.email.trim()) {
        return Err(AppError::Validation("Email is not a valid address".into()));
    }
    common::identity::validate_sign_up(&payload.password, &payload.confirm_password)?;
    Ok(())
}

/// Successful sign-in or sign-up.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SessionResponse {
    /// Bearer token for later requests.
    pub token: String,
    pub refresh_token: Option<String>,
    /// Token lifetime in seconds.
    #[schema(example = 3600)]
    pub expires_in: Option<u64>,
    pub user: Identity,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            token: session.id_token,
            refresh_token: session.refresh_token,
            expires_in: session.expires_in,
            user: session.identity,
        }
    }
}

/// The signed-in user.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MeResponse {
    #[serde(flatten)]
    pub identity: Identity,
    /// Whether this user may see unmoderated listings.
    pub is_admin: bool,
}
