use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use utoipa::ToSchema;
use uuid::Uuid;

use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, JoinType, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};

use crate::{
    errors::ServiceError,
    models::{
        product_entity,
        purchase_request_entity::{
            self, Column, Entity as PurchaseRequestEntity, Model as PurchaseRequestModel,
            PurchaseRequestStatus,
        },
        purchase_request_line_entity,
        unit_entity, user_entity,
    },
};

const DEFAULT_PAGE_SIZE: u64 = 20;
const MAX_PAGE_SIZE: u64 = 100;

/// Trait representing a generic asynchronous query.
#[async_trait]
pub trait Query: Send + Sync {
    type Result: Send + Sync;

    /// Executes the query using the provided database connection.
    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError>;
}

/// Read projection of a purchase request plus denormalized catalog detail.
/// Never accepted back as input.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PurchaseRequestView {
    pub id: Uuid,
    pub request_number: String,
    pub requested_by: Uuid,
    pub requester_name: Option<String>,
    pub request_date: NaiveDate,
    pub status: PurchaseRequestStatus,
    pub description: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub lines: Vec<PurchaseRequestLineView>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PurchaseRequestLineView {
    pub id: Uuid,
    pub line_no: i32,
    pub product_id: Uuid,
    pub product_sku: String,
    pub product_name: String,
    pub unit_id: Uuid,
    pub unit_code: String,
    pub unit_name: String,
    pub quantity: Decimal,
    pub required_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Page envelope for list results. `total` counts the full filtered set,
/// independent of paging.
#[derive(Debug, Serialize)]
pub struct Paged<T> {
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub items: Vec<T>,
}

/// Builds views for the given requests, batch-loading lines and resolving
/// product, unit and requester names in one pass per catalog.
pub async fn project_views(
    db: &DatabaseConnection,
    requests: Vec<PurchaseRequestModel>,
) -> Result<Vec<PurchaseRequestView>, ServiceError> {
    if requests.is_empty() {
        return Ok(Vec::new());
    }

    let request_ids: Vec<Uuid> = requests.iter().map(|r| r.id).collect();

    let lines = purchase_request_line_entity::Entity::find()
        .filter(purchase_request_line_entity::Column::PurchaseRequestId.is_in(request_ids))
        .order_by_asc(purchase_request_line_entity::Column::LineNo)
        .all(db)
        .await
        .map_err(ServiceError::db_error)?;

    let product_ids: HashSet<Uuid> = lines.iter().map(|l| l.product_id).collect();
    let unit_ids: HashSet<Uuid> = lines.iter().map(|l| l.unit_id).collect();
    let user_ids: HashSet<Uuid> = requests.iter().map(|r| r.requested_by).collect();

    let products: HashMap<Uuid, product_entity::Model> = product_entity::Entity::find()
        .filter(product_entity::Column::Id.is_in(product_ids))
        .all(db)
        .await
        .map_err(ServiceError::db_error)?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let units: HashMap<Uuid, unit_entity::Model> = unit_entity::Entity::find()
        .filter(unit_entity::Column::Id.is_in(unit_ids))
        .all(db)
        .await
        .map_err(ServiceError::db_error)?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let users: HashMap<Uuid, user_entity::Model> = user_entity::Entity::find()
        .filter(user_entity::Column::Id.is_in(user_ids))
        .all(db)
        .await
        .map_err(ServiceError::db_error)?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    // Lines arrive sorted by line_no, so each request's bucket stays ordered.
    let mut lines_by_request: HashMap<Uuid, Vec<PurchaseRequestLineView>> = HashMap::new();
    for line in lines {
        let view = PurchaseRequestLineView {
            id: line.id,
            line_no: line.line_no,
            product_id: line.product_id,
            product_sku: products
                .get(&line.product_id)
                .map(|p| p.sku.clone())
                .unwrap_or_default(),
            product_name: products
                .get(&line.product_id)
                .map(|p| p.name.clone())
                .unwrap_or_default(),
            unit_id: line.unit_id,
            unit_code: units
                .get(&line.unit_id)
                .map(|u| u.code.clone())
                .unwrap_or_default(),
            unit_name: units
                .get(&line.unit_id)
                .map(|u| u.name.clone())
                .unwrap_or_default(),
            quantity: line.quantity,
            required_date: line.required_date,
            notes: line.notes,
        };
        lines_by_request
            .entry(line.purchase_request_id)
            .or_default()
            .push(view);
    }

    Ok(requests
        .into_iter()
        .map(|request| PurchaseRequestView {
            requester_name: users.get(&request.requested_by).map(|u| u.name.clone()),
            lines: lines_by_request.remove(&request.id).unwrap_or_default(),
            id: request.id,
            request_number: request.request_number,
            requested_by: request.requested_by,
            request_date: request.request_date,
            status: request.status,
            description: request.description,
            submitted_at: request.submitted_at,
            approved_by: request.approved_by,
            approved_at: request.approved_at,
            rejection_reason: request.rejection_reason,
            created_at: request.created_at,
            updated_at: request.updated_at,
        })
        .collect())
}

/// Loads one purchase request as a view, failing with `NotFound` when absent.
pub async fn load_purchase_request_view(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<PurchaseRequestView, ServiceError> {
    let request = PurchaseRequestEntity::find_by_id(id)
        .one(db)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| ServiceError::NotFound(format!("Purchase request {} not found", id)))?;

    let mut views = project_views(db, vec![request]).await?;
    views
        .pop()
        .ok_or_else(|| ServiceError::InternalError("projection returned no view".to_string()))
}

/// Query to get a specific purchase request by id.
#[derive(Debug, Serialize, Deserialize)]
pub struct GetPurchaseRequestQuery {
    pub id: Uuid,
}

#[async_trait]
impl Query for GetPurchaseRequestQuery {
    type Result = Option<PurchaseRequestView>;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        let Some(request) = PurchaseRequestEntity::find_by_id(self.id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
        else {
            return Ok(None);
        };

        Ok(project_views(db, vec![request]).await?.pop())
    }
}

/// Query to list purchase requests with filtering, sorting and paging.
///
/// Out-of-range paging inputs are silently clamped, and an unrecognized sort
/// key falls back to newest-first; the query never rejects its inputs.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListPurchaseRequestsQuery {
    /// Substring match against request number or description.
    pub q: Option<String>,
    pub status: Option<PurchaseRequestStatus>,
    pub requested_by: Option<Uuid>,
    /// Substring match against the requester's display name.
    pub user_name: Option<String>,
    /// Inclusive lower bound on `request_date`.
    pub from_date: Option<NaiveDate>,
    /// Inclusive upper bound on `request_date`.
    pub to_date: Option<NaiveDate>,
    pub sort: Option<String>,
    pub page: u64,
    pub page_size: u64,
}

/// `page < 1 -> 1`; `page_size < 1 -> 20`; `page_size > 100 -> 100`.
fn normalize_paging(page: u64, page_size: u64) -> (u64, u64) {
    let page = page.max(1);
    let page_size = match page_size {
        0 => DEFAULT_PAGE_SIZE,
        n if n > MAX_PAGE_SIZE => MAX_PAGE_SIZE,
        n => n,
    };
    (page, page_size)
}

/// Maps a sort key to a column and direction. Both snake_case and camelCase
/// spellings are accepted; anything else means newest-first.
fn sort_order(sort: Option<&str>) -> (Column, Order) {
    match sort.unwrap_or_default() {
        "request_number" | "requestNumber" => (Column::RequestNumber, Order::Asc),
        "-request_number" | "-requestNumber" => (Column::RequestNumber, Order::Desc),
        "request_date" | "requestDate" => (Column::RequestDate, Order::Asc),
        "-request_date" | "-requestDate" => (Column::RequestDate, Order::Desc),
        "status" => (Column::Status, Order::Asc),
        "-status" => (Column::Status, Order::Desc),
        "created_at" | "createdAt" => (Column::CreatedAt, Order::Asc),
        _ => (Column::CreatedAt, Order::Desc),
    }
}

#[async_trait]
impl Query for ListPurchaseRequestsQuery {
    type Result = Paged<PurchaseRequestView>;

    async fn execute(&self, db: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        let (page, page_size) = normalize_paging(self.page, self.page_size);

        let mut condition = Condition::all();
        if let Some(q) = self.q.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            condition = condition.add(
                Condition::any()
                    .add(Column::RequestNumber.contains(q))
                    .add(Column::Description.contains(q)),
            );
        }
        if let Some(status) = &self.status {
            condition = condition.add(Column::Status.eq(status.clone()));
        }
        if let Some(requester) = self.requested_by {
            condition = condition.add(Column::RequestedBy.eq(requester));
        }
        if let Some(from) = self.from_date {
            condition = condition.add(Column::RequestDate.gte(from));
        }
        if let Some(to) = self.to_date {
            condition = condition.add(Column::RequestDate.lte(to));
        }

        let mut query = PurchaseRequestEntity::find().filter(condition);

        if let Some(name) = self
            .user_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            query = query
                .join(
                    JoinType::InnerJoin,
                    purchase_request_entity::Relation::Requester.def(),
                )
                .filter(user_entity::Column::Name.contains(name));
        }

        let total = query
            .clone()
            .count(db)
            .await
            .map_err(ServiceError::db_error)?;

        let (column, order) = sort_order(self.sort.as_deref());
        let requests = query
            .order_by(column, order)
            // Tiebreaker keeps page boundaries stable when the sort column
            // has duplicates.
            .order_by(Column::Id, Order::Asc)
            .offset((page - 1) * page_size)
            .limit(page_size)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let items = project_views(db, requests).await?;

        Ok(Paged {
            page,
            page_size,
            total,
            items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paging_clamps_are_silent() {
        assert_eq!(normalize_paging(0, 20), (1, 20));
        assert_eq!(normalize_paging(1, 0), (1, 20));
        assert_eq!(normalize_paging(3, 500), (3, 100));
        assert_eq!(normalize_paging(2, 100), (2, 100));
        assert_eq!(normalize_paging(7, 55), (7, 55));
    }

    #[test]
    fn unrecognized_sort_falls_back_to_newest_first() {
        assert!(matches!(
            sort_order(Some("bogus")),
            (Column::CreatedAt, Order::Desc)
        ));
        assert!(matches!(sort_order(None), (Column::CreatedAt, Order::Desc)));
        assert!(matches!(
            sort_order(Some("")),
            (Column::CreatedAt, Order::Desc)
        ));
    }

    #[test]
    fn sort_keys_map_both_spellings() {
        assert!(matches!(
            sort_order(Some("request_number")),
            (Column::RequestNumber, Order::Asc)
        ));
        assert!(matches!(
            sort_order(Some("-requestNumber")),
            (Column::RequestNumber, Order::Desc)
        ));
        assert!(matches!(
            sort_order(Some("-request_date")),
            (Column::RequestDate, Order::Desc)
        ));
        assert!(matches!(
            sort_order(Some("-status")),
            (Column::Status, Order::Desc)
        ));
        assert!(matches!(
            sort_order(Some("createdAt")),
            (Column::CreatedAt, Order::Asc)
        ));
    }
}
