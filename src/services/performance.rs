//! Vendor performance metrics.
//!
//! Recomputes a vendor's four rolling metrics from the vendor's full
//! purchase-order set every time one of its orders is saved. The hook is
//! invoked explicitly by `PurchaseOrderService` after each successful
//! insert or update, so the dependency is visible in the call graph rather
//! than hidden behind persistence-layer event wiring.

use crate::{
    db::DbPool,
    entities::{
        historical_performance,
        purchase_order::{self, PurchaseOrderStatus},
        vendor,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

/// Read-only projection of a vendor's current metrics.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VendorPerformance {
    pub id: Uuid,
    pub vendor_code: String,
    pub name: String,
    pub on_time_delivery_rate: f64,
    pub quality_rating_avg: f64,
    /// Mean issue-to-acknowledgment time, in hours.
    pub average_response_time: f64,
    pub fulfillment_rate: f64,
}

impl From<vendor::Model> for VendorPerformance {
    fn from(model: vendor::Model) -> Self {
        Self {
            id: model.id,
            vendor_code: model.vendor_code,
            name: model.name,
            on_time_delivery_rate: model.on_time_delivery_rate,
            quality_rating_avg: model.quality_rating_avg,
            average_response_time: model.average_response_time,
            fulfillment_rate: model.fulfillment_rate,
        }
    }
}

/// Subset of metrics produced by one recompute pass. `None` means the metric
/// was skipped this invocation and the stored value stays untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsUpdate {
    pub on_time_delivery_rate: Option<f64>,
    pub quality_rating_avg: Option<f64>,
    pub average_response_time: Option<f64>,
    pub fulfillment_rate: Option<f64>,
}

impl MetricsUpdate {
    pub fn is_empty(&self) -> bool {
        self.on_time_delivery_rate.is_none()
            && self.quality_rating_avg.is_none()
            && self.average_response_time.is_none()
            && self.fulfillment_rate.is_none()
    }
}

/// Recomputes the metric subset warranted by the just-saved `trigger` order,
/// over `orders`, the vendor's complete purchase-order set (which includes
/// the trigger itself).
///
/// Each step is gated independently; a skipped step never blocks the rest:
///
/// 1. On-time delivery rate and quality rating average run only when the
///    triggering order is completed. A non-completed trigger skips them even
///    if the vendor has other completed orders.
/// 2. Response time runs only when the triggering order carries both issue
///    and acknowledgment timestamps, and averages hours over every order of
///    the vendor that carries both.
/// 3. Fulfillment rate is always attempted.
///
/// Every divisor is guarded: an empty aggregation set skips the metric
/// instead of dividing by zero.
pub fn compute_metrics(
    trigger: &purchase_order::Model,
    orders: &[purchase_order::Model],
    now: DateTime<Utc>,
) -> MetricsUpdate {
    let mut update = MetricsUpdate::default();

    if trigger.is_completed() {
        let completed: Vec<&purchase_order::Model> =
            orders.iter().filter(|o| o.is_completed()).collect();
        if !completed.is_empty() {
            let on_time = completed.iter().filter(|o| o.delivery_date <= now).count();
            update.on_time_delivery_rate = Some(on_time as f64 / completed.len() as f64);

            // Unrated orders are excluded from numerator and denominator;
            // no rated order at all stores 0.
            let ratings: Vec<f64> = completed.iter().filter_map(|o| o.quality_rating).collect();
            update.quality_rating_avg = Some(if ratings.is_empty() {
                0.0
            } else {
                ratings.iter().sum::<f64>() / ratings.len() as f64
            });
        }
    }

    if trigger.acknowledgment_date.is_some() {
        let response_times: Vec<f64> = orders
            .iter()
            .filter_map(|o| o.response_time_hours())
            .collect();
        if !response_times.is_empty() {
            update.average_response_time =
                Some(response_times.iter().sum::<f64>() / response_times.len() as f64);
        }
    }

    if !orders.is_empty() {
        let completed_count = orders.iter().filter(|o| o.is_completed()).count();
        update.fulfillment_rate = Some(completed_count as f64 / orders.len() as f64);
    }

    update
}

/// Service owning the vendor metric columns.
#[derive(Clone)]
pub struct VendorPerformanceService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl VendorPerformanceService {
    /// Creates a new vendor performance service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Post-write hook: recompute and persist the vendor's metrics after a
    /// purchase order was saved.
    ///
    /// `created` distinguishes insert from update. The current formulas do
    /// not differentiate, but the flag is part of the hook contract.
    ///
    /// Callers treat a failure here as non-fatal: the purchase-order write
    /// that triggered the recompute has already committed and must not be
    /// rolled back or failed retroactively.
    #[instrument(
        skip(self, order),
        fields(purchase_order_id = %order.id, vendor_id = %order.vendor_id, created)
    )]
    pub async fn purchase_order_saved(
        &self,
        order: &purchase_order::Model,
        created: bool,
    ) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        // Full re-scan of the vendor's order set; no incremental counters.
        let orders = purchase_order::Entity::find()
            .filter(purchase_order::Column::VendorId.eq(order.vendor_id))
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let update = compute_metrics(order, &orders, Utc::now());
        if update.is_empty() {
            return Ok(());
        }

        let mut vendor_update = vendor::ActiveModel {
            id: Set(order.vendor_id),
            ..Default::default()
        };
        if let Some(rate) = update.on_time_delivery_rate {
            vendor_update.on_time_delivery_rate = Set(rate);
        }
        if let Some(avg) = update.quality_rating_avg {
            vendor_update.quality_rating_avg = Set(avg);
        }
        if let Some(hours) = update.average_response_time {
            vendor_update.average_response_time = Set(hours);
        }
        if let Some(rate) = update.fulfillment_rate {
            vendor_update.fulfillment_rate = Set(rate);
        }
        vendor_update.updated_at = Set(Some(Utc::now()));

        vendor_update
            .update(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::VendorMetricsRecalculated {
                    vendor_id: order.vendor_id,
                    on_time_delivery_rate: update.on_time_delivery_rate,
                    quality_rating_avg: update.quality_rating_avg,
                    average_response_time: update.average_response_time,
                    fulfillment_rate: update.fulfillment_rate,
                })
                .await;
        }

        Ok(())
    }

    /// Current metric snapshot for a vendor.
    #[instrument(skip(self))]
    pub async fn performance_snapshot(
        &self,
        vendor_id: Uuid,
    ) -> Result<VendorPerformance, ServiceError> {
        let db = &*self.db_pool;
        let vendor = vendor::Entity::find_by_id(vendor_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Vendor with ID {} not found", vendor_id))
            })?;

        Ok(vendor.into())
    }

    /// Recorded historical snapshots for a vendor, newest first.
    ///
    /// The snapshot table is populated by an external scheduled job; this
    /// service only reads it.
    #[instrument(skip(self))]
    pub async fn history(
        &self,
        vendor_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<historical_performance::Model>, ServiceError> {
        let db = &*self.db_pool;

        let vendor_exists = vendor::Entity::find_by_id(vendor_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .is_some();
        if !vendor_exists {
            warn!(vendor_id = %vendor_id, "history requested for unknown vendor");
            return Err(ServiceError::NotFound(format!(
                "Vendor with ID {} not found",
                vendor_id
            )));
        }

        let snapshots = historical_performance::Entity::find()
            .filter(historical_performance::Column::VendorId.eq(vendor_id))
            .order_by_desc(historical_performance::Column::Date)
            .limit(Some(limit))
            .offset(offset)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(snapshots)
    }
}
