use crate::{
    db::DbPool,
    entities::vendor::{self, Entity as VendorEntity, Model as VendorModel},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, DbErr, EntityTrait, PaginatorTrait, QuerySelect, Set, SqlErr,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateVendorRequest {
    #[validate(length(min = 1, max = 100, message = "Vendor name is required"))]
    pub name: String,
    pub contact_details: String,
    pub address: String,
    #[validate(length(min = 1, max = 50, message = "Vendor code is required"))]
    pub vendor_code: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateVendorRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub contact_details: Option<String>,
    pub address: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub vendor_code: Option<String>,
}

/// Vendor representation returned by the API. The metric fields are derived
/// values; they are read-only here and owned by the performance recalculator.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VendorResponse {
    pub id: Uuid,
    pub name: String,
    pub contact_details: String,
    pub address: String,
    pub vendor_code: String,
    pub on_time_delivery_rate: f64,
    pub quality_rating_avg: f64,
    pub average_response_time: f64,
    pub fulfillment_rate: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<VendorModel> for VendorResponse {
    fn from(model: VendorModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            contact_details: model.contact_details,
            address: model.address,
            vendor_code: model.vendor_code,
            on_time_delivery_rate: model.on_time_delivery_rate,
            quality_rating_avg: model.quality_rating_avg,
            average_response_time: model.average_response_time,
            fulfillment_rate: model.fulfillment_rate,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VendorListResponse {
    pub vendors: Vec<VendorResponse>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Service for managing vendors
#[derive(Clone)]
pub struct VendorService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl VendorService {
    /// Creates a new vendor service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    fn map_insert_err(err: DbErr, vendor_code: &str) -> ServiceError {
        if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
            ServiceError::Conflict(format!("Vendor code '{}' already exists", vendor_code))
        } else {
            ServiceError::DatabaseError(err)
        }
    }

    /// Creates a new vendor. Metrics initialize to zero and are only ever
    /// written by the performance recalculator.
    #[instrument(skip(self, request), fields(vendor_code = %request.vendor_code))]
    pub async fn create_vendor(
        &self,
        request: CreateVendorRequest,
    ) -> Result<VendorResponse, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let now = Utc::now();
        let vendor_id = Uuid::new_v4();

        let vendor_code = request.vendor_code.clone();
        let active_model = vendor::ActiveModel {
            id: Set(vendor_id),
            name: Set(request.name),
            contact_details: Set(request.contact_details),
            address: Set(request.address),
            vendor_code: Set(request.vendor_code),
            on_time_delivery_rate: Set(0.0),
            quality_rating_avg: Set(0.0),
            average_response_time: Set(0.0),
            fulfillment_rate: Set(0.0),
            created_at: Set(now),
            updated_at: Set(None),
        };

        let model = active_model.insert(db).await.map_err(|e| {
            error!(error = %e, vendor_id = %vendor_id, "Failed to create vendor");
            Self::map_insert_err(e, &vendor_code)
        })?;

        info!(vendor_id = %vendor_id, "Vendor created");
        if let Some(sender) = &self.event_sender {
            sender.send_or_log(Event::VendorCreated(vendor_id)).await;
        }

        Ok(model.into())
    }

    /// Gets a vendor by ID
    #[instrument(skip(self))]
    pub async fn get_vendor(&self, vendor_id: Uuid) -> Result<Option<VendorResponse>, ServiceError> {
        let db = &*self.db_pool;
        let vendor = VendorEntity::find_by_id(vendor_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(vendor.map(Into::into))
    }

    /// Lists vendors with pagination
    #[instrument(skip(self))]
    pub async fn list_vendors(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<VendorListResponse, ServiceError> {
        let db = &*self.db_pool;
        let offset = page.saturating_sub(1) * per_page;

        let total = VendorEntity::find()
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let vendors = VendorEntity::find()
            .limit(Some(per_page))
            .offset(offset)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(VendorListResponse {
            vendors: vendors.into_iter().map(Into::into).collect(),
            total,
            page,
            per_page,
        })
    }

    /// Updates a vendor's descriptive fields. The derived metric columns are
    /// deliberately not updatable through this path.
    #[instrument(skip(self, request))]
    pub async fn update_vendor(
        &self,
        vendor_id: Uuid,
        request: UpdateVendorRequest,
    ) -> Result<VendorResponse, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let vendor = VendorEntity::find_by_id(vendor_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Vendor with ID {} not found", vendor_id))
            })?;

        let mut active_model: vendor::ActiveModel = vendor.into();
        if let Some(name) = request.name {
            active_model.name = Set(name);
        }
        if let Some(contact_details) = request.contact_details {
            active_model.contact_details = Set(contact_details);
        }
        if let Some(address) = request.address {
            active_model.address = Set(address);
        }
        let vendor_code = request.vendor_code.clone();
        if let Some(code) = request.vendor_code {
            active_model.vendor_code = Set(code);
        }
        active_model.updated_at = Set(Some(Utc::now()));

        let model = active_model.update(db).await.map_err(|e| {
            error!(error = %e, vendor_id = %vendor_id, "Failed to update vendor");
            Self::map_insert_err(e, vendor_code.as_deref().unwrap_or(""))
        })?;

        info!(vendor_id = %vendor_id, "Vendor updated");
        if let Some(sender) = &self.event_sender {
            sender.send_or_log(Event::VendorUpdated(vendor_id)).await;
        }

        Ok(model.into())
    }

    /// Deletes a vendor. Purchase orders and historical snapshots cascade at
    /// the database level.
    #[instrument(skip(self))]
    pub async fn delete_vendor(&self, vendor_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let result = VendorEntity::delete_by_id(vendor_id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Vendor with ID {} not found",
                vendor_id
            )));
        }

        info!(vendor_id = %vendor_id, "Vendor deleted");
        if let Some(sender) = &self.event_sender {
            sender.send_or_log(Event::VendorDeleted(vendor_id)).await;
        }

        Ok(())
    }
}
