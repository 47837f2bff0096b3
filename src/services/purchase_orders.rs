use crate::{
    db::DbPool,
    entities::{
        purchase_order::{
            self, Entity as PurchaseOrderEntity, Model as PurchaseOrderModel, PurchaseOrderStatus,
        },
        vendor,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::performance::VendorPerformanceService,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect,
    Set, SqlErr,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePurchaseOrderRequest {
    #[validate(length(min = 1, max = 50, message = "PO number is required"))]
    pub po_number: String,
    pub vendor_id: Uuid,
    pub order_date: DateTime<Utc>,
    pub delivery_date: DateTime<Utc>,
    /// Free-form ordered-items payload
    #[schema(value_type = Object)]
    pub items: serde_json::Value,
    #[validate(range(min = 1, message = "Quantity must be positive"))]
    pub quantity: i32,
    /// Defaults to `pending` when omitted
    pub status: Option<PurchaseOrderStatus>,
    #[validate(range(min = 0.0, max = 5.0))]
    pub quality_rating: Option<f64>,
    pub issue_date: DateTime<Utc>,
    pub acknowledgment_date: Option<DateTime<Utc>>,
}

/// Partial update of a purchase order's lifecycle fields. Identity fields
/// (`po_number`, `vendor_id`) are fixed at creation.
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdatePurchaseOrderRequest {
    pub order_date: Option<DateTime<Utc>>,
    pub delivery_date: Option<DateTime<Utc>>,
    #[schema(value_type = Object)]
    pub items: Option<serde_json::Value>,
    #[validate(range(min = 1))]
    pub quantity: Option<i32>,
    pub status: Option<PurchaseOrderStatus>,
    #[validate(range(min = 0.0, max = 5.0))]
    pub quality_rating: Option<f64>,
    pub issue_date: Option<DateTime<Utc>>,
    pub acknowledgment_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PurchaseOrderResponse {
    pub id: Uuid,
    pub po_number: String,
    pub vendor_id: Uuid,
    pub order_date: DateTime<Utc>,
    pub delivery_date: DateTime<Utc>,
    #[schema(value_type = Object)]
    pub items: serde_json::Value,
    pub quantity: i32,
    pub status: PurchaseOrderStatus,
    pub quality_rating: Option<f64>,
    pub issue_date: DateTime<Utc>,
    pub acknowledgment_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<PurchaseOrderModel> for PurchaseOrderResponse {
    fn from(model: PurchaseOrderModel) -> Self {
        Self {
            id: model.id,
            po_number: model.po_number,
            vendor_id: model.vendor_id,
            order_date: model.order_date,
            delivery_date: model.delivery_date,
            items: model.items,
            quantity: model.quantity,
            status: model.status,
            quality_rating: model.quality_rating,
            issue_date: model.issue_date,
            acknowledgment_date: model.acknowledgment_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PurchaseOrderListResponse {
    pub purchase_orders: Vec<PurchaseOrderResponse>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Service for managing purchase orders.
///
/// Every successful create-or-update is followed, synchronously and before
/// the result is returned to the caller, by the vendor performance hook.
#[derive(Clone)]
pub struct PurchaseOrderService {
    db_pool: Arc<DbPool>,
    performance: Arc<VendorPerformanceService>,
    event_sender: Option<Arc<EventSender>>,
}

impl PurchaseOrderService {
    /// Creates a new purchase order service instance
    pub fn new(
        db_pool: Arc<DbPool>,
        performance: Arc<VendorPerformanceService>,
        event_sender: Option<Arc<EventSender>>,
    ) -> Self {
        Self {
            db_pool,
            performance,
            event_sender,
        }
    }

    fn map_insert_err(err: DbErr, po_number: &str) -> ServiceError {
        if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
            ServiceError::Conflict(format!("PO number '{}' already exists", po_number))
        } else {
            ServiceError::DatabaseError(err)
        }
    }

    /// Recompute the owning vendor's metrics after a save. The triggering
    /// write has already committed; a hook failure is logged, never surfaced.
    async fn fire_metrics_hook(&self, order: &PurchaseOrderModel, created: bool) {
        if let Err(err) = self.performance.purchase_order_saved(order, created).await {
            warn!(
                purchase_order_id = %order.id,
                vendor_id = %order.vendor_id,
                error = %err,
                "Vendor metrics recalculation failed after purchase order save"
            );
        }
    }

    /// Creates a new purchase order and triggers the metrics recompute.
    #[instrument(skip(self, request), fields(po_number = %request.po_number, vendor_id = %request.vendor_id))]
    pub async fn create_purchase_order(
        &self,
        request: CreatePurchaseOrderRequest,
    ) -> Result<PurchaseOrderResponse, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;

        // Referential check up front so a bad vendor id fails as input
        // validation rather than as an FK error from the database.
        let vendor_exists = vendor::Entity::find_by_id(request.vendor_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .is_some();
        if !vendor_exists {
            return Err(ServiceError::InvalidInput(format!(
                "Vendor with ID {} does not exist",
                request.vendor_id
            )));
        }

        let now = Utc::now();
        let order_id = Uuid::new_v4();
        let po_number = request.po_number.clone();

        let active_model = purchase_order::ActiveModel {
            id: Set(order_id),
            po_number: Set(request.po_number),
            vendor_id: Set(request.vendor_id),
            order_date: Set(request.order_date),
            delivery_date: Set(request.delivery_date),
            items: Set(request.items),
            quantity: Set(request.quantity),
            status: Set(request.status.unwrap_or(PurchaseOrderStatus::Pending)),
            quality_rating: Set(request.quality_rating),
            issue_date: Set(request.issue_date),
            acknowledgment_date: Set(request.acknowledgment_date),
            created_at: Set(now),
            updated_at: Set(None),
        };

        let model = active_model.insert(db).await.map_err(|e| {
            error!(error = %e, purchase_order_id = %order_id, "Failed to create purchase order");
            Self::map_insert_err(e, &po_number)
        })?;

        info!(purchase_order_id = %order_id, "Purchase order created");
        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::PurchaseOrderCreated(order_id))
                .await;
        }

        self.fire_metrics_hook(&model, true).await;

        Ok(model.into())
    }

    /// Gets a purchase order by ID
    #[instrument(skip(self))]
    pub async fn get_purchase_order(
        &self,
        order_id: Uuid,
    ) -> Result<Option<PurchaseOrderResponse>, ServiceError> {
        let db = &*self.db_pool;
        let order = PurchaseOrderEntity::find_by_id(order_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(order.map(Into::into))
    }

    /// Lists purchase orders with optional vendor and status filters
    #[instrument(skip(self))]
    pub async fn list_purchase_orders(
        &self,
        page: u64,
        per_page: u64,
        vendor_id: Option<Uuid>,
        status: Option<PurchaseOrderStatus>,
    ) -> Result<PurchaseOrderListResponse, ServiceError> {
        let db = &*self.db_pool;
        let offset = page.saturating_sub(1) * per_page;

        let mut query = PurchaseOrderEntity::find();
        if let Some(vendor_id) = vendor_id {
            query = query.filter(purchase_order::Column::VendorId.eq(vendor_id));
        }
        if let Some(status) = status {
            query = query.filter(purchase_order::Column::Status.eq(status));
        }

        let total = query
            .clone()
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let orders = query
            .limit(Some(per_page))
            .offset(offset)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(PurchaseOrderListResponse {
            purchase_orders: orders.into_iter().map(Into::into).collect(),
            total,
            page,
            per_page,
        })
    }

    /// Updates a purchase order's lifecycle fields and triggers the metrics
    /// recompute.
    #[instrument(skip(self, request))]
    pub async fn update_purchase_order(
        &self,
        order_id: Uuid,
        request: UpdatePurchaseOrderRequest,
    ) -> Result<PurchaseOrderResponse, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let order = PurchaseOrderEntity::find_by_id(order_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Purchase order with ID {} not found", order_id))
            })?;

        let mut active_model: purchase_order::ActiveModel = order.into();
        if let Some(order_date) = request.order_date {
            active_model.order_date = Set(order_date);
        }
        if let Some(delivery_date) = request.delivery_date {
            active_model.delivery_date = Set(delivery_date);
        }
        if let Some(items) = request.items {
            active_model.items = Set(items);
        }
        if let Some(quantity) = request.quantity {
            active_model.quantity = Set(quantity);
        }
        if let Some(status) = request.status {
            active_model.status = Set(status);
        }
        if let Some(quality_rating) = request.quality_rating {
            active_model.quality_rating = Set(Some(quality_rating));
        }
        if let Some(issue_date) = request.issue_date {
            active_model.issue_date = Set(issue_date);
        }
        if let Some(acknowledgment_date) = request.acknowledgment_date {
            active_model.acknowledgment_date = Set(Some(acknowledgment_date));
        }

        let model = active_model.update(db).await.map_err(|e| {
            error!(error = %e, purchase_order_id = %order_id, "Failed to update purchase order");
            ServiceError::DatabaseError(e)
        })?;

        info!(purchase_order_id = %order_id, "Purchase order updated");
        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::PurchaseOrderUpdated(order_id))
                .await;
        }

        self.fire_metrics_hook(&model, false).await;

        Ok(model.into())
    }

    /// Deletes a purchase order. Deletion does not trigger a metrics
    /// recompute; stored metrics change again at the next sibling save.
    #[instrument(skip(self))]
    pub async fn delete_purchase_order(&self, order_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let result = PurchaseOrderEntity::delete_by_id(order_id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Purchase order with ID {} not found",
                order_id
            )));
        }

        info!(purchase_order_id = %order_id, "Purchase order deleted");
        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::PurchaseOrderDeleted(order_id))
                .await;
        }

        Ok(())
    }
}
