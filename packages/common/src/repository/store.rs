use async_trait::async_trait;
use thiserror::Error;

use crate::category::Category;
use crate::website::{NewWebsite, Website};

/// Record fields that support server-side equality filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Globally unique slug.
    UniqueName,
    /// Owner identity.
    UserId,
}

impl Field {
    pub fn value_of<'a>(&self, website: &'a Website) -> &'a str {
        match self {
            Self::UniqueName => &website.unique_name,
            Self::UserId => &website.user_id,
        }
    }
}

/// `field == value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    pub field: Field,
    pub value: String,
}

impl FieldFilter {
    pub fn eq(field: Field, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }

    pub fn matches(&self, website: &Website) -> bool {
        self.field.value_of(website) == self.value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Per-partition ordering. The only sortable field is the creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub direction: Direction,
}

impl SortOrder {
    pub const NEWEST_FIRST: SortOrder = SortOrder {
        direction: Direction::Desc,
    };
    pub const OLDEST_FIRST: SortOrder = SortOrder {
        direction: Direction::Asc,
    };
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document store error: {0}")]
    Backend(String),

    #[error("stored record {id} is unreadable: {reason}")]
    CorruptRecord { id: String, reason: String },
}

/// Boundary to the external document store.
///
/// The store only answers single-partition queries; anything spanning
/// categories is a fan-out done by the caller.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Records of one partition, optionally filtered and ordered by the store.
    async fn query_partition(
        &self,
        partition: Category,
        filter: Option<&FieldFilter>,
        order: Option<SortOrder>,
    ) -> Result<Vec<Website>, StoreError>;

    /// Store a record in `partition` and return its document id.
    async fn insert(&self, partition: Category, record: &NewWebsite) -> Result<String, StoreError>;
}
