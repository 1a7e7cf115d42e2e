//! Category-partitioned view over the document store.
//!
//! Every cross-category read is a sequential fan-out over [`Category::ALL`]:
//! one store query per partition, results concatenated in that order. Any
//! failing partition aborts the whole call.

mod store;

pub mod memory;

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, instrument};

use crate::category::Category;
use crate::website::{NewWebsite, Website};

pub use store::{Direction, DocumentStore, Field, FieldFilter, SortOrder, StoreError};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("query of partition '{partition}' failed: {source}")]
    PartitionQuery {
        partition: Category,
        source: StoreError,
    },

    #[error("insert into partition '{partition}' failed: {source}")]
    Insert {
        partition: Category,
        source: StoreError,
    },
}

/// A record together with the partition it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub partition: Category,
    pub record: Website,
}

#[derive(Clone)]
pub struct PartitionedRepository {
    store: Arc<dyn DocumentStore>,
}

impl PartitionedRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Every record of every partition.
    ///
    /// `order` is applied by the store inside each partition only. The
    /// concatenation is not re-sorted, so the result is globally ordered only
    /// when partitions do not interleave.
    #[instrument(skip(self))]
    pub async fn fetch_all(&self, order: Option<SortOrder>) -> Result<Vec<Website>, RepositoryError> {
        self.fan_out(None, order).await
    }

    /// Records of a single partition.
    #[instrument(skip(self))]
    pub async fn fetch_partition(
        &self,
        partition: Category,
        order: Option<SortOrder>,
    ) -> Result<Vec<Website>, RepositoryError> {
        self.query(partition, None, order).await
    }

    /// Records submitted by `owner_id`, filtered by the store in each partition.
    #[instrument(skip(self))]
    pub async fn fetch_by_owner(&self, owner_id: &str) -> Result<Vec<Website>, RepositoryError> {
        let filter = FieldFilter::eq(Field::UserId, owner_id);
        self.fan_out(Some(&filter), None).await
    }

    /// First record whose `field` equals `value`.
    ///
    /// Partitions are visited in order and the search stops at the first one
    /// with a match; later partitions are never queried. Duplicate keys in
    /// later partitions are therefore invisible.
    #[instrument(skip(self))]
    pub async fn fetch_by_key(
        &self,
        field: Field,
        value: &str,
    ) -> Result<Option<Located>, RepositoryError> {
        let filter = FieldFilter::eq(field, value);
        for &partition in Category::ALL {
            let mut records = self.query(partition, Some(&filter), None).await?;
            if !records.is_empty() {
                debug!(%partition, "Key found");
                return Ok(Some(Located {
                    partition,
                    record: records.swap_remove(0),
                }));
            }
        }
        Ok(None)
    }

    /// Store a new record in the partition named by its category.
    #[instrument(skip(self, record), fields(partition = %record.category))]
    pub async fn insert(&self, record: NewWebsite) -> Result<Website, RepositoryError> {
        let partition = record.category;
        let id = self
            .store
            .insert(partition, &record)
            .await
            .map_err(|source| RepositoryError::Insert { partition, source })?;
        Ok(record.into_stored(id))
    }

    async fn fan_out(
        &self,
        filter: Option<&FieldFilter>,
        order: Option<SortOrder>,
    ) -> Result<Vec<Website>, RepositoryError> {
        let mut all = Vec::new();
        for &partition in Category::ALL {
            all.extend(self.query(partition, filter, order).await?);
        }
        debug!(count = all.len(), "Fan-out complete");
        Ok(all)
    }

    async fn query(
        &self,
        partition: Category,
        filter: Option<&FieldFilter>,
        order: Option<SortOrder>,
    ) -> Result<Vec<Website>, RepositoryError> {
        let mut records = self
            .store
            .query_partition(partition, filter, order)
            .await
            .map_err(|source| RepositoryError::PartitionQuery { partition, source })?;
        // The partition a record came from is authoritative.
        for record in &mut records {
            record.category = partition;
        }
        Ok(records)
    }
}
