use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;

/// Public URL of a published asset.
///
/// Derived from the asset store's naming convention, never from a write
/// response, so it is known before the upload completes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(transparent)]
pub struct AssetUrl(String);

impl AssetUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a listed website charges its users.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
pub enum Monetization {
    #[default]
    Free,
    Paid,
    Freemium,
}

impl Monetization {
    pub const ALL: &'static [Monetization] = &[Self::Free, Self::Paid, Self::Freemium];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Paid => "Paid",
            Self::Freemium => "Freemium",
        }
    }
}

impl fmt::Display for Monetization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Monetization {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Free" => Ok(Self::Free),
            "Paid" => Ok(Self::Paid),
            "Freemium" => Ok(Self::Freemium),
            _ => Err(ParseEnumError::new("monetization", s)),
        }
    }
}

/// Moderation state of a submission. New submissions start as `Pending`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    #[default]
    Pending,
    Approved,
}

impl ModerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
        }
    }
}

impl fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModerationStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            _ => Err(ParseEnumError::new("moderation status", s)),
        }
    }
}

/// Error when a stored or submitted enum value is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    kind: &'static str,
    invalid: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, invalid: &str) -> Self {
        Self {
            kind,
            invalid: invalid.to_string(),
        }
    }
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid {} '{}'", self.kind, self.invalid)
    }
}

impl std::error::Error for ParseEnumError {}

/// Contact details of the person behind a listed website.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Developer {
    pub name: String,
    pub email: String,
}

/// A submitted website that has not been stored yet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWebsite {
    pub unique_name: String,
    pub name: String,
    pub description: String,
    pub icon: AssetUrl,
    pub images: Vec<AssetUrl>,
    pub monetization: Monetization,
    pub link: String,
    pub developer: Developer,
    pub category: Category,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub status: ModerationStatus,
}

impl NewWebsite {
    /// Attach the document id assigned by the store.
    pub fn into_stored(self, id: String) -> Website {
        Website {
            id,
            unique_name: self.unique_name,
            name: self.name,
            description: self.description,
            icon: self.icon,
            images: self.images,
            monetization: self.monetization,
            link: self.link,
            developer: self.developer,
            category: self.category,
            user_id: self.user_id,
            created_at: self.created_at,
            status: self.status,
        }
    }
}

/// A stored website record.
///
/// A record lives in exactly one category partition for its whole life.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Website {
    /// Document id assigned by the store.
    pub id: String,
    /// Slug built from the display name and submission time.
    pub unique_name: String,
    pub name: String,
    pub description: String,
    pub icon: AssetUrl,
    /// Screenshot URLs, in upload order.
    pub images: Vec<AssetUrl>,
    pub monetization: Monetization,
    pub link: String,
    pub developer: Developer,
    pub category: Category,
    /// Identity of the submitting user.
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub status: ModerationStatus,
}
