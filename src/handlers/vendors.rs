use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginationParams,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::vendors::{CreateVendorRequest, UpdateVendorRequest},
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

// Handler functions

/// Create a new vendor
#[utoipa::path(
    post,
    path = "/api/v1/vendors",
    request_body = CreateVendorRequest,
    responses(
        (status = 201, description = "Vendor created", body = crate::services::vendors::VendorResponse),
        (status = 400, description = "Validation failure", body = crate::errors::ErrorResponse),
        (status = 409, description = "Vendor code already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "Vendors"
)]
pub async fn create_vendor(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateVendorRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let vendor = state
        .services
        .vendors
        .create_vendor(payload)
        .await
        .map_err(map_service_error)?;

    info!("Vendor created: {}", vendor.id);

    Ok(created_response(vendor))
}

/// Get a vendor by ID
#[utoipa::path(
    get,
    path = "/api/v1/vendors/{id}",
    responses(
        (status = 200, description = "Vendor found", body = crate::services::vendors::VendorResponse),
        (status = 404, description = "Vendor not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Vendors"
)]
pub async fn get_vendor(
    State(state): State<Arc<AppState>>,
    Path(vendor_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let vendor = state
        .services
        .vendors
        .get_vendor(vendor_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Vendor with ID {} not found", vendor_id)))?;

    Ok(success_response(vendor))
}

/// List vendors with pagination
#[utoipa::path(
    get,
    path = "/api/v1/vendors",
    params(PaginationParams),
    responses(
        (status = 200, description = "Vendors listed", body = crate::services::vendors::VendorListResponse)
    ),
    tag = "Vendors"
)]
pub async fn list_vendors(
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let per_page = pagination.per_page_clamped(state.config.api_max_page_size as u64);
    let vendors = state
        .services
        .vendors
        .list_vendors(pagination.page, per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(vendors))
}

/// Update a vendor's descriptive fields
#[utoipa::path(
    put,
    path = "/api/v1/vendors/{id}",
    request_body = UpdateVendorRequest,
    responses(
        (status = 200, description = "Vendor updated", body = crate::services::vendors::VendorResponse),
        (status = 404, description = "Vendor not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Vendors"
)]
pub async fn update_vendor(
    State(state): State<Arc<AppState>>,
    Path(vendor_id): Path<Uuid>,
    Json(payload): Json<UpdateVendorRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let vendor = state
        .services
        .vendors
        .update_vendor(vendor_id, payload)
        .await
        .map_err(map_service_error)?;

    info!("Vendor updated: {}", vendor_id);

    Ok(success_response(vendor))
}

/// Delete a vendor (cascades to its purchase orders and history)
#[utoipa::path(
    delete,
    path = "/api/v1/vendors/{id}",
    responses(
        (status = 204, description = "Vendor deleted"),
        (status = 404, description = "Vendor not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Vendors"
)]
pub async fn delete_vendor(
    State(state): State<Arc<AppState>>,
    Path(vendor_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .vendors
        .delete_vendor(vendor_id)
        .await
        .map_err(map_service_error)?;

    info!("Vendor deleted: {}", vendor_id);

    Ok(no_content_response())
}

/// Current performance metrics of a vendor
#[utoipa::path(
    get,
    path = "/api/v1/vendors/{id}/performance",
    responses(
        (status = 200, description = "Performance snapshot", body = crate::services::performance::VendorPerformance),
        (status = 404, description = "Vendor not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Vendors"
)]
pub async fn get_vendor_performance(
    State(state): State<Arc<AppState>>,
    Path(vendor_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state
        .services
        .performance
        .performance_snapshot(vendor_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(snapshot))
}

/// Recorded historical performance snapshots of a vendor, newest first
#[utoipa::path(
    get,
    path = "/api/v1/vendors/{id}/history",
    params(PaginationParams),
    responses(
        (status = 200, description = "Historical snapshots"),
        (status = 404, description = "Vendor not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Vendors"
)]
pub async fn get_vendor_history(
    State(state): State<Arc<AppState>>,
    Path(vendor_id): Path<Uuid>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let per_page = pagination.per_page_clamped(state.config.api_max_page_size as u64);
    let offset = pagination.page.saturating_sub(1) * per_page;

    let history = state
        .services
        .performance
        .history(vendor_id, per_page, offset)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(history))
}

/// Creates the router for vendor endpoints
pub fn vendor_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_vendor))
        .route("/", get(list_vendors))
        .route("/:id", get(get_vendor))
        .route("/:id", put(update_vendor))
        .route("/:id", delete(delete_vendor))
        .route("/:id/performance", get(get_vendor_performance))
        .route("/:id/history", get(get_vendor_history))
}
