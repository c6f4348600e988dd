use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Collection document database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    /// Collection name
    #[sea_orm(primary_key, auto_increment = false)]
    pub collection: String,

    /// Document id, unique within its collection
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Document body
    #[sea_orm(column_type = "Json")]
    pub data: Json,

    /// Creation timestamp
    pub created_at: DateTimeWithTimeZone,

    /// Last write timestamp
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
