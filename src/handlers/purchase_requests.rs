use super::common::{created_response, map_service_error, success_response, validate_input};
use crate::{
    commands::purchaserequests::{CreatePurchaseRequestCommand, PurchaseRequestLineInput},
    errors::ApiError,
    handlers::AppState,
    models::purchase_request_entity::PurchaseRequestStatus,
    queries::purchase_request_queries::ListPurchaseRequestsQuery,
};
use axum::{
    extract::{Json, Path, Query, State},
    response::Response,
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

// Request DTOs

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePurchaseRequestRequest {
    pub requested_by: Uuid,
    pub request_date: NaiveDate,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "At least one line is required"))]
    pub lines: Vec<PurchaseRequestLineRequest>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PurchaseRequestLineRequest {
    pub product_id: Uuid,
    pub unit_id: Uuid,
    pub quantity: Decimal,
    pub required_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct ApprovePurchaseRequestRequest {
    pub approver_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RejectPurchaseRequestRequest {
    #[validate(length(min = 1, max = 500, message = "Rejection reason is required"))]
    pub reason: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListPurchaseRequestsParams {
    /// Substring match against request number or description
    pub q: Option<String>,
    /// Exact status filter (Draft, Submitted, Approved, Rejected, Cancelled)
    pub status: Option<String>,
    pub requested_by: Option<Uuid>,
    /// Substring match against the requester's display name
    pub user_name: Option<String>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub sort: Option<String>,
    #[serde(default = "super::common::default_page")]
    pub page: u64,
    #[serde(default = "super::common::default_per_page")]
    pub page_size: u64,
}

// Handler functions

/// Create a new purchase request
#[utoipa::path(
    post,
    path = "/api/v1/purchase-requests",
    tag = "purchase-requests",
    request_body = CreatePurchaseRequestRequest,
    responses(
        (status = 201, description = "Purchase request created", body = crate::queries::purchase_request_queries::PurchaseRequestView),
        (status = 400, description = "Invalid input or unknown catalog reference"),
        (status = 503, description = "Request number allocation failed")
    )
)]
pub async fn create_purchase_request(
    State(state): State<AppState>,
    Json(payload): Json<CreatePurchaseRequestRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;

    let command = CreatePurchaseRequestCommand {
        requested_by: payload.requested_by,
        request_date: payload.request_date,
        description: payload.description,
        lines: payload
            .lines
            .into_iter()
            .map(|line| PurchaseRequestLineInput {
                product_id: line.product_id,
                unit_id: line.unit_id,
                quantity: line.quantity,
                required_date: line.required_date,
                notes: line.notes,
            })
            .collect(),
    };

    let view = state
        .services
        .purchase_requests
        .create(command)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(view))
}

/// List purchase requests with filtering, sorting and paging
#[utoipa::path(
    get,
    path = "/api/v1/purchase-requests",
    tag = "purchase-requests",
    params(ListPurchaseRequestsParams),
    responses(
        (status = 200, description = "Page of purchase requests"),
        (status = 400, description = "Unknown status filter")
    )
)]
pub async fn list_purchase_requests(
    State(state): State<AppState>,
    Query(params): Query<ListPurchaseRequestsParams>,
) -> Result<Response, ApiError> {
    let status: Option<PurchaseRequestStatus> = params
        .status
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(ApiError::BadRequest)?;

    let query = ListPurchaseRequestsQuery {
        q: params.q,
        status,
        requested_by: params.requested_by,
        user_name: params.user_name,
        from_date: params.from_date,
        to_date: params.to_date,
        sort: params.sort,
        page: params.page,
        page_size: params.page_size,
    };

    let page = state
        .services
        .purchase_requests
        .list(query)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(page))
}

/// Get a purchase request by id
#[utoipa::path(
    get,
    path = "/api/v1/purchase-requests/{id}",
    tag = "purchase-requests",
    params(("id" = Uuid, Path, description = "Purchase request id")),
    responses(
        (status = 200, description = "Purchase request detail", body = crate::queries::purchase_request_queries::PurchaseRequestView),
        (status = 404, description = "Purchase request not found")
    )
)]
pub async fn get_purchase_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let view = state
        .services
        .purchase_requests
        .get(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(view))
}

/// Submit a draft purchase request for approval
#[utoipa::path(
    post,
    path = "/api/v1/purchase-requests/{id}/submit",
    tag = "purchase-requests",
    params(("id" = Uuid, Path, description = "Purchase request id")),
    responses(
        (status = 200, description = "Purchase request submitted", body = crate::queries::purchase_request_queries::PurchaseRequestView),
        (status = 404, description = "Purchase request not found"),
        (status = 409, description = "Not in a submittable status")
    )
)]
pub async fn submit_purchase_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let view = state
        .services
        .purchase_requests
        .submit(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(view))
}

/// Approve a submitted purchase request
#[utoipa::path(
    post,
    path = "/api/v1/purchase-requests/{id}/approve",
    tag = "purchase-requests",
    params(("id" = Uuid, Path, description = "Purchase request id")),
    request_body = ApprovePurchaseRequestRequest,
    responses(
        (status = 200, description = "Purchase request approved", body = crate::queries::purchase_request_queries::PurchaseRequestView),
        (status = 404, description = "Purchase request not found"),
        (status = 409, description = "Not in an approvable status")
    )
)]
pub async fn approve_purchase_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApprovePurchaseRequestRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;

    let view = state
        .services
        .purchase_requests
        .approve(id, payload.approver_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(view))
}

/// Reject a submitted purchase request
#[utoipa::path(
    post,
    path = "/api/v1/purchase-requests/{id}/reject",
    tag = "purchase-requests",
    params(("id" = Uuid, Path, description = "Purchase request id")),
    request_body = RejectPurchaseRequestRequest,
    responses(
        (status = 200, description = "Purchase request rejected", body = crate::queries::purchase_request_queries::PurchaseRequestView),
        (status = 400, description = "Missing rejection reason"),
        (status = 404, description = "Purchase request not found"),
        (status = 409, description = "Not in a rejectable status")
    )
)]
pub async fn reject_purchase_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectPurchaseRequestRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;

    let view = state
        .services
        .purchase_requests
        .reject(id, payload.reason)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(view))
}

/// Cancel a submitted purchase request
#[utoipa::path(
    post,
    path = "/api/v1/purchase-requests/{id}/cancel",
    tag = "purchase-requests",
    params(("id" = Uuid, Path, description = "Purchase request id")),
    responses(
        (status = 200, description = "Purchase request cancelled", body = crate::queries::purchase_request_queries::PurchaseRequestView),
        (status = 404, description = "Purchase request not found"),
        (status = 409, description = "Not in a cancellable status")
    )
)]
pub async fn cancel_purchase_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let view = state
        .services
        .purchase_requests
        .cancel(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(view))
}

pub fn purchase_request_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(create_purchase_request).get(list_purchase_requests),
        )
        .route("/:id", get(get_purchase_request))
        .route("/:id/submit", post(submit_purchase_request))
        .route("/:id/approve", post(approve_purchase_request))
        .route("/:id/reject", post(reject_purchase_request))
        .route("/:id/cancel", post(cancel_purchase_request))
}
