use utoipa::OpenApi;

/// OpenAPI document for the procurement API, served at
/// `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::purchase_requests::create_purchase_request,
        crate::handlers::purchase_requests::list_purchase_requests,
        crate::handlers::purchase_requests::get_purchase_request,
        crate::handlers::purchase_requests::submit_purchase_request,
        crate::handlers::purchase_requests::approve_purchase_request,
        crate::handlers::purchase_requests::reject_purchase_request,
        crate::handlers::purchase_requests::cancel_purchase_request,
        crate::handlers::products::create_product,
        crate::handlers::products::list_products,
        crate::handlers::products::get_product,
        crate::handlers::units::create_unit,
        crate::handlers::units::list_units,
        crate::handlers::units::get_unit,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::handlers::health::HealthResponse,
        crate::handlers::purchase_requests::CreatePurchaseRequestRequest,
        crate::handlers::purchase_requests::PurchaseRequestLineRequest,
        crate::handlers::purchase_requests::ApprovePurchaseRequestRequest,
        crate::handlers::purchase_requests::RejectPurchaseRequestRequest,
        crate::queries::purchase_request_queries::PurchaseRequestView,
        crate::queries::purchase_request_queries::PurchaseRequestLineView,
        crate::models::purchase_request_entity::PurchaseRequestStatus,
        crate::services::products::CreateProductInput,
        crate::services::units::CreateUnitInput,
    )),
    tags(
        (name = "purchase-requests", description = "Purchase request lifecycle"),
        (name = "products", description = "Product catalog"),
        (name = "units", description = "Units of measure"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
