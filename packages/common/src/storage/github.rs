use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use tracing::{error, info, instrument, warn};

use super::error::StorageError;
use super::traits::{AssetStore, ExistingAsset, PutContents};
use crate::config::AssetStoreConfig;
use crate::website::AssetUrl;

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github.v3+json";

/// Asset store backed by the GitHub repository contents API.
///
/// Objects live at `/repos/{owner}/{repo}/contents/{path}` and are served
/// from `{raw_base}/{owner}/{repo}/{branch}/{path}`. Each path segment is
/// percent-encoded in both URLs.
pub struct GithubAssetStore {
    client: Client,
    api_base: Url,
    raw_base: Url,
    owner: String,
    repo: String,
    branch: String,
    token: String,
}

impl GithubAssetStore {
    /// Build a client from configuration. Fails before any network call if
    /// the owner, repository, or token is missing.
    pub fn new(config: &AssetStoreConfig) -> Result<Self, StorageError> {
        let owner = required(&config.owner, "assets.owner")?;
        let repo = required(&config.repo, "assets.repo")?;
        let token = required(&config.token, "assets.token")?;

        let client = Client::builder().user_agent(&config.user_agent).build()?;

        Ok(Self {
            client,
            api_base: base_url(&config.api_base, "assets.api_base")?,
            raw_base: base_url(&config.raw_base, "assets.raw_base")?,
            owner,
            repo,
            branch: config.branch.clone(),
            token,
        })
    }

    fn repo_url(&self) -> Url {
        with_segments(&self.api_base, ["repos", self.owner.as_str(), self.repo.as_str()])
    }

    fn contents_url(&self, path: &str) -> Url {
        let url = with_segments(&self.api_base, [
            "repos",
            self.owner.as_str(),
            self.repo.as_str(),
            "contents",
        ]);
        with_segments(&url, path.split('/'))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.token)
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
    }
}

fn base_url(raw: &str, key: &str) -> Result<Url, StorageError> {
    let url = Url::parse(raw)
        .map_err(|e| StorageError::Configuration(format!("{key} is not a valid URL: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(StorageError::Configuration(format!(
            "{key} cannot carry a path: {raw}"
        )));
    }
    Ok(url)
}

/// Append `segments` to `base`, percent-encoding each one.
fn with_segments<'a>(base: &Url, segments: impl IntoIterator<Item = &'a str>) -> Url {
    let mut url = base.clone();
    // Bases are checked in `base_url`, so they always accept segments.
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

fn required(value: &Option<String>, key: &str) -> Result<String, StorageError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(StorageError::Configuration(format!("{key} is not set"))),
    }
}

#[async_trait]
impl AssetStore for GithubAssetStore {
    #[instrument(skip(self))]
    async fn existing(&self, path: &str) -> Result<Option<ExistingAsset>, StorageError> {
        let response = self
            .authorized(self.client.get(self.contents_url(path)))
            .query(&[("ref", self.branch.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            // The write that follows reports the real failure.
            warn!(status = status.as_u16(), "Asset metadata read failed, treating path as absent");
            return Ok(None);
        }

        let body = response.text().await?;
        let existing: ExistingAsset = serde_json::from_str(&body)
            .map_err(|e| StorageError::MalformedResponse(format!("metadata of {path}: {e}")))?;
        Ok(Some(existing))
    }

    #[instrument(skip(self, body), fields(update = body.sha.is_some()))]
    async fn put_contents(&self, path: &str, body: &PutContents) -> Result<(), StorageError> {
        let response = self
            .authorized(self.client.put(self.contents_url(path)))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %body, "Asset write rejected");
            return Err(StorageError::RemoteWrite {
                status: status.as_u16(),
                body,
            });
        }

        info!("Asset written");
        Ok(())
    }

    fn branch(&self) -> &str {
        &self.branch
    }

    fn public_url(&self, path: &str) -> AssetUrl {
        let root = with_segments(&self.raw_base, [
            self.owner.as_str(),
            self.repo.as_str(),
            self.branch.as_str(),
        ]);
        AssetUrl::new(with_segments(&root, path.split('/')).to_string())
    }

    async fn check_access(&self) -> Result<bool, StorageError> {
        let response = self
            .authorized(self.client.get(self.repo_url()))
            .send()
            .await?;
        Ok(response.status().is_success())
    }
}
