use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Catalog product that purchase request lines point into. Read-only from the
/// request lifecycle's perspective.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::models::purchase_request_line_entity::Entity")]
    PurchaseRequestLines,
}

impl Related<crate::models::purchase_request_line_entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseRequestLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
