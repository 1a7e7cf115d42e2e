use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{Direction, DocumentStore, FieldFilter, SortOrder, StoreError};
use crate::category::Category;
use crate::website::{NewWebsite, Website};

/// Document store kept in process memory, one vector per partition.
#[derive(Default)]
pub struct MemoryDocumentStore {
    partitions: RwLock<HashMap<Category, Vec<Website>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn query_partition(
        &self,
        partition: Category,
        filter: Option<&FieldFilter>,
        order: Option<SortOrder>,
    ) -> Result<Vec<Website>, StoreError> {
        let partitions = self.partitions.read().await;
        let mut records: Vec<Website> = partitions
            .get(&partition)
            .into_iter()
            .flatten()
            .filter(|w| filter.is_none_or(|f| f.matches(w)))
            .cloned()
            .collect();

        if let Some(order) = order {
            records.sort_by(|a, b| match order.direction {
                Direction::Asc => a.created_at.cmp(&b.created_at),
                Direction::Desc => b.created_at.cmp(&a.created_at),
            });
        }

        Ok(records)
    }

    async fn insert(&self, partition: Category, record: &NewWebsite) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        self.partitions
            .write()
            .await
            .entry(partition)
            .or_default()
            .push(record.clone().into_stored(id.clone()));
        Ok(id)
    }
}
