use common::config::{AdminConfig, AssetStoreConfig};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Identity Toolkit endpoint and project key.
#[derive(Debug, Deserialize, Clone)]
pub struct IdentityConfig {
    #[serde(default = "default_identity_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_identity_api_base() -> String {
    "https://identitytoolkit.googleapis.com/v1".into()
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            api_base: default_identity_api_base(),
            api_key: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SubmissionConfig {
    /// Largest accepted icon or screenshot, in bytes. Default: 1 MiB.
    #[serde(default = "default_max_asset_size")]
    pub max_asset_size: usize,
    /// Most screenshots per submission. Default: 10.
    #[serde(default = "default_max_images")]
    pub max_images: usize,
}

fn default_max_asset_size() -> usize {
    1024 * 1024
}
fn default_max_images() -> usize {
    10
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            max_asset_size: default_max_asset_size(),
            max_images: default_max_images(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub assets: AssetStoreConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub submission: SubmissionConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., WEBDIR__ASSETS__TOKEN)
            .add_source(
                Environment::with_prefix("WEBDIR")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors.allow_origins")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }
}
