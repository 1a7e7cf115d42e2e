use axum::{extract::FromRequestParts, http::request::Parts};
use common::identity::{Identity, is_admin};

use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user resolved from the `Authorization: Bearer <token>` header.
///
/// The token is checked with the identity provider on every request. Add this
/// as a handler parameter to require authentication.
pub struct AuthUser {
    pub identity: Identity,
    pub token: String,
    pub is_admin: bool,
}

impl AuthUser {
    pub fn uid(&self) -> &str {
        &self.identity.uid
    }

    /// Returns `Ok(())` for the configured admin, `Err(PermissionDenied)` otherwise.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AppError::TokenInvalid)?;

        let identity = state
            .identity
            .current_identity(token)
            .await?
            .ok_or(AppError::TokenInvalid)?;

        let is_admin = is_admin(Some(&identity), &state.config.admin);
        Ok(AuthUser {
            identity,
            token: token.to_string(),
            is_admin,
        })
    }
}
