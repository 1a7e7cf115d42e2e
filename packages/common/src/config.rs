use serde::Deserialize;

/// Remote asset store configuration.
///
/// `owner`, `repo` and `token` have no defaults; the client refuses to start
/// without them.
#[derive(Debug, Deserialize, Clone)]
pub struct AssetStoreConfig {
    /// REST API root. Default: "https://api.github.com".
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Root for public raw-content URLs. Default: "https://raw.githubusercontent.com".
    #[serde(default = "default_raw_base")]
    pub raw_base: String,
    /// Account that owns the repository.
    #[serde(default)]
    pub owner: Option<String>,
    /// Repository holding the assets.
    #[serde(default)]
    pub repo: Option<String>,
    /// Branch written to and served from. Default: "main".
    #[serde(default = "default_branch")]
    pub branch: String,
    /// Bearer token with contents write access.
    #[serde(default)]
    pub token: Option<String>,
    /// User-Agent sent with every request. Default: "webdir".
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_api_base() -> String {
    "https://api.github.com".into()
}
fn default_raw_base() -> String {
    "https://raw.githubusercontent.com".into()
}
fn default_branch() -> String {
    "main".into()
}
fn default_user_agent() -> String {
    "webdir".into()
}

impl Default for AssetStoreConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            raw_base: default_raw_base(),
            owner: None,
            repo: None,
            branch: default_branch(),
            token: None,
            user_agent: default_user_agent(),
        }
    }
}

/// Who counts as an administrator.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AdminConfig {
    /// Email address of the single admin account.
    #[serde(default)]
    pub email: Option<String>,
}
