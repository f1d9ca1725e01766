use super::common::{
    created_response, map_service_error, success_response, validate_input, PaginationParams,
};
use crate::{errors::ApiError, handlers::AppState, services::units::CreateUnitInput};
use axum::{
    extract::{Json, Path, Query, State},
    response::Response,
    routing::{get, post},
    Router,
};
use serde_json::json;
use uuid::Uuid;

/// Create a unit of measure
#[utoipa::path(
    post,
    path = "/api/v1/units",
    tag = "units",
    request_body = CreateUnitInput,
    responses(
        (status = 201, description = "Unit created"),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_unit(
    State(state): State<AppState>,
    Json(payload): Json<CreateUnitInput>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;

    let unit = state
        .services
        .units
        .create(payload)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(unit))
}

/// Get a unit by id
#[utoipa::path(
    get,
    path = "/api/v1/units/{id}",
    tag = "units",
    params(("id" = Uuid, Path, description = "Unit id")),
    responses(
        (status = 200, description = "Unit detail"),
        (status = 404, description = "Unit not found")
    )
)]
pub async fn get_unit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let unit = state
        .services
        .units
        .get(id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Unit {} not found", id)))?;

    Ok(success_response(unit))
}

/// List units of measure
#[utoipa::path(
    get,
    path = "/api/v1/units",
    tag = "units",
    params(PaginationParams),
    responses((status = 200, description = "Page of units"))
)]
pub async fn list_units(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, ApiError> {
    let (items, total) = state
        .services
        .units
        .list(params.page, params.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(json!({
        "page": params.page.max(1),
        "per_page": params.per_page,
        "total": total,
        "items": items,
    })))
}

pub fn unit_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_unit).get(list_units))
        .route("/:id", get(get_unit))
}
