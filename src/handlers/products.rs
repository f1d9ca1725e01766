use super::common::{
    created_response, map_service_error, success_response, validate_input, PaginationParams,
};
use crate::{errors::ApiError, handlers::AppState, services::products::CreateProductInput};
use axum::{
    extract::{Json, Path, Query, State},
    response::Response,
    routing::{get, post},
    Router,
};
use serde_json::json;
use uuid::Uuid;

/// Create a catalog product
#[utoipa::path(
    post,
    path = "/api/v1/products",
    tag = "products",
    request_body = CreateProductInput,
    responses(
        (status = 201, description = "Product created"),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductInput>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;

    let product = state
        .services
        .products
        .create(payload)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(product))
}

/// Get a product by id
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    tag = "products",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product detail"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let product = state
        .services
        .products
        .get(id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Product {} not found", id)))?;

    Ok(success_response(product))
}

/// List catalog products
#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "products",
    params(PaginationParams),
    responses((status = 200, description = "Page of products"))
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, ApiError> {
    let (items, total) = state
        .services
        .products
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

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_product).get(list_products))
        .route("/:id", get(get_product))
}
