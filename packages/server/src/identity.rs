use async_trait::async_trait;
use common::identity::{Identity, IdentityError, IdentityProvider, Session};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, instrument, warn};

use crate::config::IdentityConfig;

/// Identity provider backed by the Identity Toolkit REST API.
///
/// Sessions are the provider's ID tokens; nothing is kept server-side.
pub struct IdentityToolkit {
    client: Client,
    api_base: String,
    api_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    local_id: String,
    email: Option<String>,
    id_token: String,
    refresh_token: Option<String>,
    /// Seconds, sent as a string.
    expires_in: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Provider failure: HTTP status plus the leading error code, e.g. `EMAIL_NOT_FOUND`.
struct ProviderFailure {
    status: u16,
    code: String,
}

impl IdentityToolkit {
    pub fn new(config: &IdentityConfig) -> Result<Self, IdentityError> {
        let api_key = match config.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => {
                return Err(IdentityError::Configuration(
                    "identity.api_key is not set".into(),
                ));
            }
        };

        Ok(Self {
            client: Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn call<B, R>(&self, method: &str, body: &B) -> Result<Result<R, ProviderFailure>, IdentityError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}/accounts:{method}", self.api_base))
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(Ok(response.json::<R>().await?));
        }

        let text = response.text().await.unwrap_or_default();
        let code = serde_json::from_str::<ErrorEnvelope>(&text)
            .map(|e| {
                e.error
                    .message
                    .split([' ', ':'])
                    .next()
                    .unwrap_or_default()
                    .to_string()
            })
            .unwrap_or(text);
        Ok(Err(ProviderFailure {
            status: status.as_u16(),
            code,
        }))
    }

    async fn lookup(&self, id_token: &str) -> Result<Option<Identity>, IdentityError> {
        let result: Result<LookupResponse, _> =
            self.call("lookup", &json!({ "idToken": id_token })).await?;
        match result {
            Ok(found) => Ok(found.users.into_iter().next().map(|u| Identity {
                uid: u.local_id,
                email: u.email,
                email_verified: u.email_verified,
            })),
            Err(failure) if failure.status == 400 => {
                debug!(code = %failure.code, "Token rejected");
                Ok(None)
            }
            Err(failure) => Err(provider_error(failure)),
        }
    }

    fn session(&self, tokens: TokenResponse, identity: Option<Identity>) -> Session {
        let identity = identity.unwrap_or(Identity {
            uid: tokens.local_id,
            email: tokens.email,
            email_verified: false,
        });
        Session {
            id_token: tokens.id_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in.and_then(|s| s.parse().ok()),
            identity,
        }
    }
}

fn provider_error(failure: ProviderFailure) -> IdentityError {
    IdentityError::Provider {
        status: failure.status,
        message: failure.code,
    }
}

#[async_trait]
impl IdentityProvider for IdentityToolkit {
    async fn current_identity(&self, token: &str) -> Result<Option<Identity>, IdentityError> {
        self.lookup(token).await
    }

    #[instrument(skip(self, password))]
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        let request = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        let tokens: TokenResponse = match self.call("signInWithPassword", &request).await? {
            Ok(tokens) => tokens,
            Err(failure) => {
                return Err(match failure.code.as_str() {
                    "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS"
                    | "USER_DISABLED" => IdentityError::InvalidCredentials,
                    "INVALID_EMAIL" => IdentityError::Validation("Invalid email address".into()),
                    _ => provider_error(failure),
                });
            }
        };

        let identity = self.lookup(&tokens.id_token).await?;
        Ok(self.session(tokens, identity))
    }

    #[instrument(skip(self, password))]
    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        let request = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        let tokens: TokenResponse = match self.call("signUp", &request).await? {
            Ok(tokens) => tokens,
            Err(failure) => {
                return Err(match failure.code.as_str() {
                    "EMAIL_EXISTS" => {
                        IdentityError::Validation("Email is already registered".into())
                    }
                    "INVALID_EMAIL" => IdentityError::Validation("Invalid email address".into()),
                    "WEAK_PASSWORD" => IdentityError::Validation("Password is too weak".into()),
                    "OPERATION_NOT_ALLOWED" => {
                        IdentityError::Validation("Operation not allowed".into())
                    }
                    _ => provider_error(failure),
                });
            }
        };

        let verification: Result<serde_json::Value, _> = self
            .call(
                "sendOobCode",
                &json!({ "requestType": "VERIFY_EMAIL", "idToken": tokens.id_token }),
            )
            .await?;
        if let Err(failure) = verification {
            warn!(code = %failure.code, "Failed to send verification email");
        }

        Ok(self.session(tokens, None))
    }

    async fn sign_out(&self, _token: &str) -> Result<(), IdentityError> {
        debug!("Sign-out is client-side; nothing to revoke");
        Ok(())
    }
}
