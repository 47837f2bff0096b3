use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
};
use crate::{
    entities::purchase_order::PurchaseOrderStatus,
    errors::ApiError,
    handlers::AppState,
    services::purchase_orders::{CreatePurchaseOrderRequest, UpdatePurchaseOrderRequest},
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use utoipa::IntoParams;
use uuid::Uuid;

/// Query parameters for listing purchase orders
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListPurchaseOrdersQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    /// Restrict to a single vendor
    pub vendor: Option<Uuid>,
    /// Restrict to a single status
    pub status: Option<PurchaseOrderStatus>,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    20
}

// Handler functions

/// Create a new purchase order.
///
/// Saving fires the vendor metrics recompute before the response is
/// returned.
#[utoipa::path(
    post,
    path = "/api/v1/purchase-orders",
    request_body = CreatePurchaseOrderRequest,
    responses(
        (status = 201, description = "Purchase order created", body = crate::services::purchase_orders::PurchaseOrderResponse),
        (status = 400, description = "Validation failure", body = crate::errors::ErrorResponse),
        (status = 409, description = "PO number already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "Purchase Orders"
)]
pub async fn create_purchase_order(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreatePurchaseOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let order = state
        .services
        .purchase_orders
        .create_purchase_order(payload)
        .await
        .map_err(map_service_error)?;

    info!("Purchase order created: {}", order.id);

    Ok(created_response(order))
}

/// Get a purchase order by ID
#[utoipa::path(
    get,
    path = "/api/v1/purchase-orders/{id}",
    responses(
        (status = 200, description = "Purchase order found", body = crate::services::purchase_orders::PurchaseOrderResponse),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Purchase Orders"
)]
pub async fn get_purchase_order(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .services
        .purchase_orders
        .get_purchase_order(order_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Purchase order with ID {} not found", order_id))
        })?;

    Ok(success_response(order))
}

/// List purchase orders, optionally filtered by vendor and status
#[utoipa::path(
    get,
    path = "/api/v1/purchase-orders",
    params(ListPurchaseOrdersQuery),
    responses(
        (status = 200, description = "Purchase orders listed", body = crate::services::purchase_orders::PurchaseOrderListResponse)
    ),
    tag = "Purchase Orders"
)]
pub async fn list_purchase_orders(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListPurchaseOrdersQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let per_page = query
        .per_page
        .min(state.config.api_max_page_size as u64)
        .max(1);

    let orders = state
        .services
        .purchase_orders
        .list_purchase_orders(query.page, per_page, query.vendor, query.status)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(orders))
}

/// Update a purchase order's lifecycle fields.
///
/// Saving fires the vendor metrics recompute before the response is
/// returned.
#[utoipa::path(
    put,
    path = "/api/v1/purchase-orders/{id}",
    request_body = UpdatePurchaseOrderRequest,
    responses(
        (status = 200, description = "Purchase order updated", body = crate::services::purchase_orders::PurchaseOrderResponse),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Purchase Orders"
)]
pub async fn update_purchase_order(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<UpdatePurchaseOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let order = state
        .services
        .purchase_orders
        .update_purchase_order(order_id, payload)
        .await
        .map_err(map_service_error)?;

    info!("Purchase order updated: {}", order_id);

    Ok(success_response(order))
}

/// Delete a purchase order
#[utoipa::path(
    delete,
    path = "/api/v1/purchase-orders/{id}",
    responses(
        (status = 204, description = "Purchase order deleted"),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Purchase Orders"
)]
pub async fn delete_purchase_order(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .purchase_orders
        .delete_purchase_order(order_id)
        .await
        .map_err(map_service_error)?;

    info!("Purchase order deleted: {}", order_id);

    Ok(no_content_response())
}

/// Creates the router for purchase order endpoints
pub fn purchase_order_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_purchase_order))
        .route("/", get(list_purchase_orders))
        .route("/:id", get(get_purchase_order))
        .route("/:id", put(update_purchase_order))
        .route("/:id", delete(delete_purchase_order))
}
