use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One product/quantity/unit entry within a purchase request. Lines live and
/// die with their parent; there is no add/remove after creation.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_request_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub purchase_request_id: Uuid,
    /// 1-based position within the parent request.
    pub line_no: i32,
    pub product_id: Uuid,
    pub unit_id: Uuid,
    pub quantity: Decimal,
    pub required_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::models::purchase_request_entity::Entity",
        from = "Column::PurchaseRequestId",
        to = "crate::models::purchase_request_entity::Column::Id"
    )]
    PurchaseRequest,
    #[sea_orm(
        belongs_to = "crate::models::product_entity::Entity",
        from = "Column::ProductId",
        to = "crate::models::product_entity::Column::Id"
    )]
    Product,
    #[sea_orm(
        belongs_to = "crate::models::unit_entity::Entity",
        from = "Column::UnitId",
        to = "crate::models::unit_entity::Column::Id"
    )]
    Unit,
}

impl Related<crate::models::purchase_request_entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseRequest.def()
    }
}

impl Related<crate::models::product_entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<crate::models::unit_entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Unit.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
