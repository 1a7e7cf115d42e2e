//! Boundary to the external identity provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AdminConfig;

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

/// An authenticated user as reported by the provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Identity {
    pub uid: String,
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
}

/// Credentials returned by a successful sign-in or sign-up.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token to present on later requests.
    pub id_token: String,
    pub refresh_token: Option<String>,
    /// Token lifetime in seconds.
    pub expires_in: Option<u64>,
    pub identity: Identity,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    /// Rejected locally before reaching the provider.
    #[error("{0}")]
    Validation(String),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("identity provider configuration error: {0}")]
    Configuration(String),

    #[error("identity provider responded with status {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("identity provider transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve a bearer token. `Ok(None)` when the token is not valid.
    async fn current_identity(&self, token: &str) -> Result<Option<Identity>, IdentityError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, IdentityError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, IdentityError>;

    /// End the session behind `token`.
    async fn sign_out(&self, token: &str) -> Result<(), IdentityError>;
}

/// Whether `identity` is the configured administrator.
///
/// Derived on demand from the current identity; never stored.
pub fn is_admin(identity: Option<&Identity>, admin: &AdminConfig) -> bool {
    match (identity.and_then(|i| i.email.as_deref()), admin.email.as_deref()) {
        (Some(email), Some(admin_email)) => email == admin_email,
        _ => false,
    }
}

/// Local checks run before a sign-up is forwarded to the provider.
pub fn validate_sign_up(password: &str, confirm: &str) -> Result<(), IdentityError> {
    if password != confirm {
        return Err(IdentityError::Validation("Passwords do not match".into()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(IdentityError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
