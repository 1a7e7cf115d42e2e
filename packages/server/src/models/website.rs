use common::{CategoryFilter, TimeFilter};
use serde::{Deserialize, Deserializer};

use crate::error::AppError;

/// Query parameters of the listing endpoints.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListingQuery {
    /// `all`, `games`, `tools`, `education` or `business`. Default: `all`.
    #[param(value_type = Option<String>, example = "games")]
    #[serde(default, deserialize_with = "parse_param")]
    pub category: CategoryFilter,
    /// `all`, `today`, `week` or `month`. Default: `all`.
    #[param(value_type = Option<String>, example = "week")]
    #[serde(default, deserialize_with = "parse_param")]
    pub time: TimeFilter,
}

/// Query parameters of `GET /me/websites`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OwnListingQuery {
    /// `all`, `games`, `tools`, `education` or `business`. Default: `all`.
    #[param(value_type = Option<String>, example = "tools")]
    #[serde(default, deserialize_with = "parse_param")]
    pub category: CategoryFilter,
}

/// Deserialize a query value through its `FromStr` impl.
fn parse_param<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

/// Multipart fields of a submission, for the API document.
#[allow(dead_code)]
#[derive(utoipa::ToSchema)]
pub struct SubmitWebsiteForm {
    #[schema(example = "Pixel Quest")]
    pub name: String,
    pub description: String,
    #[schema(example = "https://pixel.example")]
    pub link: String,
    /// `Free`, `Paid` or `Freemium`. Default: `Free`.
    pub monetization: Option<String>,
    /// `games`, `tools`, `education` or `business`.
    pub category: String,
    pub developer_name: String,
    pub developer_email: String,
    /// Exactly one image file.
    #[schema(value_type = String, format = Binary)]
    pub icon: Vec<u8>,
    /// One or more image files.
    #[schema(value_type = Vec<String>, format = Binary)]
    pub images: Vec<Vec<u8>>,
}

/// Reject a malformed multipart text field.
pub fn parse_field<T>(name: &str, value: &str) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| AppError::Validation(format!("Invalid {name}: {e}")))
}
