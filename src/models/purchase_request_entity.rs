use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle status of a purchase request. Draft is the only creatable
/// status; the other four are reachable exclusively through transitions.
#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum PurchaseRequestStatus {
    #[sea_orm(string_value = "Draft")]
    Draft,
    #[sea_orm(string_value = "Submitted")]
    Submitted,
    #[sea_orm(string_value = "Approved")]
    Approved,
    #[sea_orm(string_value = "Rejected")]
    Rejected,
    #[sea_orm(string_value = "Cancelled")]
    Cancelled,
}

impl fmt::Display for PurchaseRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PurchaseRequestStatus::Draft => "Draft",
            PurchaseRequestStatus::Submitted => "Submitted",
            PurchaseRequestStatus::Approved => "Approved",
            PurchaseRequestStatus::Rejected => "Rejected",
            PurchaseRequestStatus::Cancelled => "Cancelled",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for PurchaseRequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "draft" => Ok(PurchaseRequestStatus::Draft),
            "submitted" => Ok(PurchaseRequestStatus::Submitted),
            "approved" => Ok(PurchaseRequestStatus::Approved),
            "rejected" => Ok(PurchaseRequestStatus::Rejected),
            "cancelled" => Ok(PurchaseRequestStatus::Cancelled),
            other => Err(format!("unknown purchase request status '{}'", other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Human-facing sequential identifier, `PR-` + 6 zero-padded digits.
    /// Assigned once at creation, unique forever, never reused.
    #[sea_orm(unique)]
    pub request_number: String,
    pub requested_by: Uuid,
    pub request_date: NaiveDate,
    pub status: PurchaseRequestStatus,
    pub description: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::models::user_entity::Entity",
        from = "Column::RequestedBy",
        to = "crate::models::user_entity::Column::Id"
    )]
    Requester,
    #[sea_orm(has_many = "crate::models::purchase_request_line_entity::Entity")]
    Lines,
}

impl Related<crate::models::user_entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Requester.def()
    }
}

impl Related<crate::models::purchase_request_line_entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
