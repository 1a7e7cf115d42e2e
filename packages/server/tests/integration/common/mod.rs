use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use common::config::{AdminConfig, AssetStoreConfig};
use common::identity::{Identity, IdentityError, IdentityProvider, Session};
use common::repository::PartitionedRepository;
use common::repository::memory::MemoryDocumentStore;
use common::storage::memory::MemoryAssetStore;
use common::website::{Developer, NewWebsite};
use common::{AssetUrl, Category, ModerationStatus, Monetization, Website};
use server::config::{
    AppConfig, CorsConfig, DatabaseConfig, IdentityConfig, ServerConfig, SubmissionConfig,
};
use server::state::AppState;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ASSET_BASE: &str = "https://cdn.test";

pub mod routes {
    pub const LOGIN: &str = "/api/v1/auth/login";
    pub const SIGNUP: &str = "/api/v1/auth/signup";
    pub const LOGOUT: &str = "/api/v1/auth/logout";
    pub const ME: &str = "/api/v1/auth/me";
    pub const WEBSITES: &str = "/api/v1/websites";
    pub const MY_WEBSITES: &str = "/api/v1/me/websites";
    pub const ADMIN_WEBSITES: &str = "/api/v1/admin/websites";
    pub const ADMIN_ASSET_ACCESS: &str = "/api/v1/admin/assets/access";
    pub const OPENAPI: &str = "/api-docs/openapi.json";

    pub fn website(unique_name: &str) -> String {
        format!("/api/v1/websites/{unique_name}")
    }
}

#[derive(Default)]
struct Accounts {
    /// email -> (password, uid)
    passwords: HashMap<String, (String, String)>,
    /// live token -> uid
    sessions: HashMap<String, String>,
    next_uid: u32,
}

/// In-process identity provider. Tokens are `token-{uid}`.
#[derive(Default)]
pub struct StaticIdentity {
    accounts: Mutex<Accounts>,
}

impl StaticIdentity {
    fn identity(accounts: &Accounts, uid: &str) -> Identity {
        let email = accounts
            .passwords
            .iter()
            .find(|(_, (_, id))| id == uid)
            .map(|(email, _)| email.clone());
        Identity {
            uid: uid.to_string(),
            email,
            email_verified: true,
        }
    }

    fn open_session(accounts: &mut Accounts, uid: &str) -> Session {
        let token = format!("token-{uid}");
        accounts.sessions.insert(token.clone(), uid.to_string());
        Session {
            id_token: token,
            refresh_token: None,
            expires_in: Some(3600),
            identity: Self::identity(accounts, uid),
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn current_identity(&self, token: &str) -> Result<Option<Identity>, IdentityError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .sessions
            .get(token)
            .map(|uid| Self::identity(&accounts, uid)))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        let mut accounts = self.accounts.lock().unwrap();
        let uid = match accounts.passwords.get(email) {
            Some((stored, uid)) if stored == password => uid.clone(),
            _ => return Err(IdentityError::InvalidCredentials),
        };
        Ok(Self::open_session(&mut accounts, &uid))
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.passwords.contains_key(email) {
            return Err(IdentityError::Validation(
                "Email is already registered".into(),
            ));
        }
        accounts.next_uid += 1;
        let uid = format!("uid-{}", accounts.next_uid);
        accounts
            .passwords
            .insert(email.to_string(), (password.to_string(), uid.clone()));
        Ok(Self::open_session(&mut accounts, &uid))
    }

    async fn sign_out(&self, token: &str) -> Result<(), IdentityError> {
        self.accounts.lock().unwrap().sessions.remove(token);
        Ok(())
    }
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestResponse {
    async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.expect("Failed to read response body");
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }
}

/// A running test server backed by in-memory stores.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub repository: PartitionedRepository,
    pub assets: Arc<MemoryAssetStore>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(SubmissionConfig::default()).await
    }

    pub async fn spawn_with(submission: SubmissionConfig) -> Self {
        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig {
                url: "unused://".to_string(),
            },
            assets: AssetStoreConfig::default(),
            identity: IdentityConfig::default(),
            admin: AdminConfig {
                email: Some(ADMIN_EMAIL.to_string()),
            },
            submission,
        };

        let repository = PartitionedRepository::new(Arc::new(MemoryDocumentStore::new()));
        let assets = Arc::new(MemoryAssetStore::new(ASSET_BASE, "main"));
        let state = AppState::new(
            config,
            repository.clone(),
            assets.clone(),
            Arc::new(StaticIdentity::default()),
        );

        let app = server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            repository,
            assets,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        let mut req = self.client.get(self.url(path));
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        let res = req.send().await.expect("Failed to send GET request");
        TestResponse::from_response(res).await
    }

    pub async fn post_json(&self, path: &str, body: &Value, token: Option<&str>) -> TestResponse {
        let mut req = self.client.post(self.url(path)).json(body);
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        let res = req.send().await.expect("Failed to send POST request");
        TestResponse::from_response(res).await
    }

    pub async fn post_multipart(&self, path: &str, form: Form, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart request");
        TestResponse::from_response(res).await
    }

    /// Create an account and return its token.
    pub async fn sign_up(&self, email: &str) -> String {
        let res = self
            .post_json(
                routes::SIGNUP,
                &serde_json::json!({
                    "email": email,
                    "password": "secret1",
                    "confirm_password": "secret1"
                }),
                None,
            )
            .await;
        assert_eq!(res.status, 201, "Sign-up failed: {}", res.text);
        res.body["token"].as_str().unwrap().to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.sign_up(ADMIN_EMAIL).await
    }

    /// Store a website directly, bypassing the submission flow.
    pub async fn seed(
        &self,
        name: &str,
        category: Category,
        owner: &str,
        created_at: DateTime<Utc>,
    ) -> Website {
        let unique_name = format!(
            "{}-{}",
            name.to_lowercase().replace(' ', "-"),
            created_at.timestamp_millis()
        );
        self.repository
            .insert(NewWebsite {
                unique_name,
                name: name.to_string(),
                description: format!("About {name}"),
                icon: AssetUrl::new(format!("{ASSET_BASE}/icon.png")),
                images: vec![AssetUrl::new(format!("{ASSET_BASE}/shot.png"))],
                monetization: Monetization::Free,
                link: "https://example.com".to_string(),
                developer: Developer {
                    name: "Dev".to_string(),
                    email: "dev@example.com".to_string(),
                },
                category,
                user_id: owner.to_string(),
                created_at,
                status: ModerationStatus::Approved,
            })
            .await
            .expect("Failed to seed website")
    }
}

/// A complete, valid submission form.
pub fn submission_form(name: &str, category: &str) -> Form {
    Form::new()
        .text("name", name.to_string())
        .text("description", "A tiny platformer")
        .text("link", "https://pixel.example")
        .text("monetization", "Freemium")
        .text("category", category.to_string())
        .text("developer_name", "Ada")
        .text("developer_email", "ada@example.com")
        .part("icon", image_part("icon.png"))
        .part("images", image_part("one.png"))
        .part("images", image_part("two.png"))
}

pub fn image_part(filename: &str) -> Part {
    Part::bytes(vec![0x89, b'P', b'N', b'G'])
        .file_name(filename.to_string())
        .mime_str("image/png")
        .unwrap()
}

pub fn names(body: &Value) -> Vec<String> {
    body.as_array()
        .expect("Expected a JSON array")
        .iter()
        .map(|w| w["name"].as_str().unwrap().to_string())
        .collect()
}
