pub mod common;
pub mod health;
pub mod purchase_orders;
pub mod vendors;

use crate::db::DbPool;
use crate::events::EventSender;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub vendors: Arc<crate::services::vendors::VendorService>,
    pub purchase_orders: Arc<crate::services::purchase_orders::PurchaseOrderService>,
    pub performance: Arc<crate::services::performance::VendorPerformanceService>,
}

impl AppServices {
    /// Build the AppServices container.
    ///
    /// The performance service is constructed first so the purchase-order
    /// service can hold the post-save hook it invokes after every write.
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        let performance = Arc::new(crate::services::performance::VendorPerformanceService::new(
            db_pool.clone(),
            Some(event_sender.clone()),
        ));
        let vendors = Arc::new(crate::services::vendors::VendorService::new(
            db_pool.clone(),
            Some(event_sender.clone()),
        ));
        let purchase_orders = Arc::new(
            crate::services::purchase_orders::PurchaseOrderService::new(
                db_pool,
                performance.clone(),
                Some(event_sender),
            ),
        );

        Self {
            vendors,
            purchase_orders,
            performance,
        }
    }
}
