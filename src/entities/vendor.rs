use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// The `vendors` table.
///
/// The four metric columns are derived values owned by the performance
/// recalculator; no other write path touches them.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "vendors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[validate(length(
        min = 1,
        max = 100,
        message = "Vendor name must be between 1 and 100 characters"
    ))]
    pub name: String,

    pub contact_details: String,
    pub address: String,

    /// Unique vendor reference code.
    #[sea_orm(unique)]
    #[validate(length(min = 1, max = 50))]
    pub vendor_code: String,

    /// Fraction of completed orders delivered by evaluation time, in [0, 1].
    pub on_time_delivery_rate: f64,
    /// Mean quality rating across rated completed orders.
    pub quality_rating_avg: f64,
    /// Mean issue-to-acknowledgment time, in hours.
    pub average_response_time: f64,
    /// Fraction of all orders that reached completed status, in [0, 1].
    pub fulfillment_rate: f64,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::purchase_order::Entity")]
    PurchaseOrders,
    #[sea_orm(has_many = "super::historical_performance::Entity")]
    HistoricalPerformance,
}

impl Related<super::purchase_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseOrders.def()
    }
}

impl Related<super::historical_performance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HistoricalPerformance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
