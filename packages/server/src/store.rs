use async_trait::async_trait;
use common::{Category, ModerationStatus, Monetization};
use common::repository::{Direction, DocumentStore, Field, FieldFilter, SortOrder, StoreError};
use common::website::{AssetUrl, Developer, NewWebsite, Website};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, Order, QueryFilter, QueryOrder, Set,
};
use tracing::instrument;
use uuid::Uuid;

use crate::entity::website;

/// Document store on a relational database.
///
/// Each partition query is its own `SELECT ... WHERE category = ?`; the
/// store never answers a cross-partition query.
#[derive(Clone)]
pub struct SeaOrmDocumentStore {
    db: DatabaseConnection,
}

impl SeaOrmDocumentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_error(err: DbErr) -> StoreError {
    StoreError::Backend(err.to_string())
}

fn filter_column(field: Field) -> website::Column {
    match field {
        Field::UniqueName => website::Column::UniqueName,
        Field::UserId => website::Column::UserId,
    }
}

fn into_website(model: website::Model) -> Result<Website, StoreError> {
    let corrupt = |reason: String| StoreError::CorruptRecord {
        id: model.id.to_string(),
        reason,
    };

    let category = model
        .category
        .parse::<Category>()
        .map_err(|e| corrupt(e.to_string()))?;
    let monetization = model
        .monetization
        .parse::<Monetization>()
        .map_err(|e| corrupt(e.to_string()))?;
    let status = model
        .status
        .parse::<ModerationStatus>()
        .map_err(|e| corrupt(e.to_string()))?;
    let images: Vec<AssetUrl> = serde_json::from_value(model.images.clone())
        .map_err(|e| corrupt(format!("images: {e}")))?;

    Ok(Website {
        id: model.id.to_string(),
        unique_name: model.unique_name,
        name: model.name,
        description: model.description,
        icon: AssetUrl::new(model.icon),
        images,
        monetization,
        link: model.link,
        developer: Developer {
            name: model.developer_name,
            email: model.developer_email,
        },
        category,
        user_id: model.user_id,
        created_at: model.created_at,
        status,
    })
}

#[async_trait]
impl DocumentStore for SeaOrmDocumentStore {
    #[instrument(skip(self))]
    async fn query_partition(
        &self,
        partition: Category,
        filter: Option<&FieldFilter>,
        order: Option<SortOrder>,
    ) -> Result<Vec<Website>, StoreError> {
        let mut select =
            website::Entity::find().filter(website::Column::Category.eq(partition.as_str()));

        if let Some(filter) = filter {
            select = select.filter(filter_column(filter.field).eq(filter.value.as_str()));
        }

        if let Some(order) = order {
            let direction = match order.direction {
                Direction::Asc => Order::Asc,
                Direction::Desc => Order::Desc,
            };
            select = select.order_by(website::Column::CreatedAt, direction);
        }

        let rows = select.all(&self.db).await.map_err(db_error)?;
        rows.into_iter().map(into_website).collect()
    }

    #[instrument(skip(self, record), fields(unique_name = %record.unique_name))]
    async fn insert(&self, partition: Category, record: &NewWebsite) -> Result<String, StoreError> {
        let id = Uuid::now_v7();
        let images = serde_json::to_value(&record.images)
            .map_err(|e| StoreError::Backend(format!("failed to encode images: {e}")))?;

        let model = website::ActiveModel {
            id: Set(id),
            category: Set(partition.as_str().to_string()),
            unique_name: Set(record.unique_name.clone()),
            name: Set(record.name.clone()),
            description: Set(record.description.clone()),
            icon: Set(record.icon.as_str().to_string()),
            images: Set(images),
            monetization: Set(record.monetization.as_str().to_string()),
            link: Set(record.link.clone()),
            developer_name: Set(record.developer.name.clone()),
            developer_email: Set(record.developer.email.clone()),
            user_id: Set(record.user_id.clone()),
            status: Set(record.status.as_str().to_string()),
            created_at: Set(record.created_at),
        };

        website::Entity::insert(model)
            .exec_without_returning(&self.db)
            .await
            .map_err(db_error)?;

        Ok(id.to_string())
    }
}
