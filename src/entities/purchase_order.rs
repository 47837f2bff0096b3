use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Enum representing the possible statuses of a purchase order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    strum::Display, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "lowercase")]
pub enum PurchaseOrderStatus {
    #[sea_orm(string_value = "pending")]
    #[strum(serialize = "pending")]
    Pending,
    #[sea_orm(string_value = "completed")]
    #[strum(serialize = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    #[strum(serialize = "cancelled")]
    Cancelled,
}

/// The `purchase_orders` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "purchase_orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Unique purchase order number.
    #[sea_orm(unique)]
    #[validate(length(
        min = 1,
        max = 50,
        message = "PO number must be between 1 and 50 characters"
    ))]
    pub po_number: String,

    pub vendor_id: Uuid,

    pub order_date: DateTime<Utc>,
    pub delivery_date: DateTime<Utc>,

    /// Free-form ordered-items payload.
    pub items: Json,
    pub quantity: i32,

    pub status: PurchaseOrderStatus,

    /// Set once the delivered goods have been evaluated.
    pub quality_rating: Option<f64>,

    pub issue_date: DateTime<Utc>,
    /// Set when the vendor acknowledges the order.
    pub acknowledgment_date: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    pub fn is_completed(&self) -> bool {
        self.status == PurchaseOrderStatus::Completed
    }

    /// Issue-to-acknowledgment time in hours, when acknowledged.
    pub fn response_time_hours(&self) -> Option<f64> {
        self.acknowledgment_date
            .map(|ack| (ack - self.issue_date).num_milliseconds() as f64 / 3_600_000.0)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vendor::Entity",
        from = "Column::VendorId",
        to = "super::vendor::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Vendor,
}

impl Related<super::vendor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendor.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(
        mut self,
        _db: &C,
        insert: bool,
    ) -> Result<Self, DbErr> {
        if !insert {
            self.updated_at = sea_orm::Set(Some(Utc::now()));
        }
        Ok(self)
    }
}
