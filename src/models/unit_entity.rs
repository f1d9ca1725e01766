use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unit of measure referenced by purchase request lines.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "units")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
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
