use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One submitted website. All category partitions share this table and are
/// told apart by `category`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "website")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Partition name: games, tools, education or business.
    pub category: String,

    pub unique_name: String,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub icon: String,
    /// Screenshot URLs stored as a JSON array of strings.
    #[sea_orm(column_type = "JsonBinary")]
    pub images: serde_json::Value,
    /// One of: Free, Paid, Freemium
    pub monetization: String,
    pub link: String,
    pub developer_name: String,
    pub developer_email: String,

    pub user_id: String,
    /// One of: pending, approved
    pub status: String,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
