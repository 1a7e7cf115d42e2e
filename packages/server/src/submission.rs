use std::sync::Arc;

use chrono::Utc;
use common::repository::{PartitionedRepository, RepositoryError};
use common::slug::slugify;
use common::storage::{AssetStore, StorageError};
use common::website::{Developer, NewWebsite};
use common::{AssetUrl, Category, ModerationStatus, Monetization, Website};
use email_address::EmailAddress;
use futures::future::try_join_all;
use thiserror::Error;
use tracing::{info, instrument};

use crate::config::SubmissionConfig;

/// One uploaded file.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Everything a user fills in to submit a website.
#[derive(Debug, Clone, Default)]
pub struct SubmissionForm {
    pub name: String,
    pub description: String,
    pub link: String,
    pub monetization: Monetization,
    pub category: Option<Category>,
    pub developer_name: String,
    pub developer_email: String,
    pub icon: Option<Upload>,
    pub images: Vec<Upload>,
}

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Publishes the assets of a submission and records it as pending.
#[derive(Clone)]
pub struct SubmissionService {
    assets: Arc<dyn AssetStore>,
    repository: PartitionedRepository,
    config: SubmissionConfig,
}

/// An upload that passed validation, with its final file name.
struct CheckedUpload<'a> {
    filename: &'a str,
    data: &'a [u8],
}

fn required(value: &str, label: &str) -> Result<(), SubmissionError> {
    if value.trim().is_empty() {
        return Err(SubmissionError::Validation(format!("{label} is required")));
    }
    Ok(())
}

/// Reduce a client-supplied file name to its final path component.
fn file_name(raw: &str) -> Option<&str> {
    let name = raw.rsplit(['/', '\\']).next()?.trim();
    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name)
    }
}

impl SubmissionService {
    pub fn new(
        assets: Arc<dyn AssetStore>,
        repository: PartitionedRepository,
        config: SubmissionConfig,
    ) -> Self {
        Self {
            assets,
            repository,
            config,
        }
    }

    fn check_upload<'a>(&self, upload: &'a Upload) -> Result<CheckedUpload<'a>, SubmissionError> {
        let filename = file_name(&upload.filename).ok_or_else(|| {
            SubmissionError::Validation(format!("Invalid file name '{}'", upload.filename))
        })?;

        if upload.data.is_empty() {
            return Err(SubmissionError::Validation(format!("{filename} is empty")));
        }
        if upload.data.len() > self.config.max_asset_size {
            return Err(SubmissionError::Validation(format!(
                "{filename} exceeds the maximum size of {} bytes",
                self.config.max_asset_size
            )));
        }

        let is_image = mime_guess::from_path(filename)
            .first()
            .is_some_and(|mime| mime.type_() == mime_guess::mime::IMAGE);
        if !is_image {
            return Err(SubmissionError::Validation(format!(
                "{filename} is not an image"
            )));
        }

        Ok(CheckedUpload {
            filename,
            data: &upload.data,
        })
    }

    /// Validate the form, upload the icon and screenshots, then store the
    /// website as pending in its category.
    ///
    /// Nothing is recorded unless every upload succeeded. Assets already
    /// published before a failure are left in the store.
    #[instrument(skip(self, form), fields(name = %form.name))]
    pub async fn submit(&self, user_id: &str, form: SubmissionForm) -> Result<Website, SubmissionError> {
        required(&form.name, "Name")?;
        required(&form.description, "Description")?;
        required(&form.link, "Link")?;
        required(&form.developer_name, "Developer name")?;
        if !EmailAddress::is_valid(form.developer_email.trim()) {
            return Err(SubmissionError::Validation(
                "Developer email is not a valid address".into(),
            ));
        }
        let category = form
            .category
            .ok_or_else(|| SubmissionError::Validation("Category is required".into()))?;

        let icon = form
            .icon
            .as_ref()
            .ok_or_else(|| SubmissionError::Validation("An icon is required".into()))?;
        let icon = self.check_upload(icon)?;

        if form.images.is_empty() {
            return Err(SubmissionError::Validation(
                "At least one screenshot is required".into(),
            ));
        }
        if form.images.len() > self.config.max_images {
            return Err(SubmissionError::Validation(format!(
                "At most {} screenshots are allowed",
                self.config.max_images
            )));
        }
        let images = form
            .images
            .iter()
            .map(|upload| self.check_upload(upload))
            .collect::<Result<Vec<_>, _>>()?;

        let now = Utc::now();
        let slug = slugify(&form.name, now);
        // A `/` in the name must not add directory levels under `websites/`.
        let dir = slug.replace('/', "-");

        let icon_url = self
            .assets
            .publish(icon.data, &format!("websites/{dir}/icon/{}", icon.filename))
            .await?;

        let image_urls: Vec<AssetUrl> = try_join_all(images.iter().map(|image| {
            let path = format!("websites/{dir}/images/{}", image.filename);
            async move { self.assets.publish(image.data, &path).await }
        }))
        .await?;

        let record = NewWebsite {
            unique_name: slug,
            name: form.name.trim().to_string(),
            description: form.description.trim().to_string(),
            icon: icon_url,
            images: image_urls,
            monetization: form.monetization,
            link: form.link.trim().to_string(),
            developer: Developer {
                name: form.developer_name.trim().to_string(),
                email: form.developer_email.trim().to_string(),
            },
            category,
            user_id: user_id.to_string(),
            created_at: now,
            status: ModerationStatus::Pending,
        };

        let website = self.repository.insert(record).await?;
        info!(
            unique_name = %website.unique_name,
            category = %website.category,
            "Website submitted"
        );
        Ok(website)
    }
}
