use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "VendorHub API",
        version = "0.1.0",
        description = r#"
# VendorHub Vendor Management API

An API for managing vendors, their purchase orders, and derived vendor
performance metrics.

## Features

- **Vendor Management**: Create, update, and track vendors
- **Purchase Order Management**: Full purchase order lifecycle tracking
- **Performance Metrics**: On-time delivery rate, quality rating average,
  average response time, and fulfillment rate, recomputed on every
  purchase-order save
- **Historical Performance**: Point-in-time snapshots for trend tracking

## Error Handling

The API uses a consistent error envelope with appropriate HTTP status codes:

```json
{
  "error": "Not Found",
  "message": "Vendor with ID ... not found",
  "request_id": "req-abc123xyz",
  "timestamp": "2026-01-01T00:00:00Z"
}
```

## Pagination

List endpoints support `page` and `per_page` query parameters.
        "#,
        contact(
            name = "VendorHub Support",
            email = "support@vendorhub.dev"
        ),
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "Vendors", description = "Vendor management and performance endpoints"),
        (name = "Purchase Orders", description = "Purchase order management endpoints")
    ),
    paths(
        // Vendors
        crate::handlers::vendors::list_vendors,
        crate::handlers::vendors::create_vendor,
        crate::handlers::vendors::get_vendor,
        crate::handlers::vendors::update_vendor,
        crate::handlers::vendors::delete_vendor,
        crate::handlers::vendors::get_vendor_performance,
        crate::handlers::vendors::get_vendor_history,

        // Purchase orders
        crate::handlers::purchase_orders::list_purchase_orders,
        crate::handlers::purchase_orders::create_purchase_order,
        crate::handlers::purchase_orders::get_purchase_order,
        crate::handlers::purchase_orders::update_purchase_order,
        crate::handlers::purchase_orders::delete_purchase_order,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::entities::purchase_order::PurchaseOrderStatus,
        crate::services::vendors::CreateVendorRequest,
        crate::services::vendors::UpdateVendorRequest,
        crate::services::vendors::VendorResponse,
        crate::services::vendors::VendorListResponse,
        crate::services::purchase_orders::CreatePurchaseOrderRequest,
        crate::services::purchase_orders::UpdatePurchaseOrderRequest,
        crate::services::purchase_orders::PurchaseOrderResponse,
        crate::services::purchase_orders::PurchaseOrderListResponse,
        crate::services::performance::VendorPerformance,
    ))
)]
pub struct ApiDoc;

/// Swagger UI router serving the OpenAPI document
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
