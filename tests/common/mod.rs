use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use sea_orm::EntityTrait;
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;
use vendorhub_api::{
    config::AppConfig,
    db::{self, DbConfig},
    entities::historical_performance,
    events::{self, EventSender},
    handlers::{health::health_routes, AppServices},
    api_v1_routes, AppState,
};

/// Helper harness for spinning up an application state backed by an
/// in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: Arc<AppState>,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );

        // A single connection keeps every query on the same in-memory
        // database.
        let db_config = DbConfig {
            url: cfg.database_url.clone(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        };
        let pool = db::establish_connection_with_config(&db_config)
            .await
            .expect("failed to create test database");

        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let (event_tx, event_rx) = mpsc::channel(64);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let services = AppServices::new(db_arc.clone(), Arc::new(event_sender.clone()));
        let state = Arc::new(AppState {
            db: db_arc,
            config: cfg,
            event_sender,
            services,
        });

        let router = Router::new()
            .nest("/api/v1", api_v1_routes())
            .merge(health_routes())
            .with_state(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    /// Issue a request against the app and return status plus parsed JSON
    /// body (Null for empty bodies).
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let request = builder.body(body).expect("failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body was not valid JSON")
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    /// Create a vendor and return its id.
    pub async fn create_vendor(&self, vendor_code: &str) -> Uuid {
        let (status, body) = self
            .post(
                "/api/v1/vendors",
                serde_json::json!({
                    "name": format!("Vendor {}", vendor_code),
                    "contact_details": "purchasing@example.com",
                    "address": "1 Supplier Way",
                    "vendor_code": vendor_code,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "vendor create failed: {body}");
        body["id"]
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .expect("vendor id missing from response")
    }

    /// Fetch the current performance snapshot for a vendor.
    pub async fn performance(&self, vendor_id: Uuid) -> Value {
        let (status, body) = self
            .get(&format!("/api/v1/vendors/{vendor_id}/performance"))
            .await;
        assert_eq!(status, StatusCode::OK, "snapshot fetch failed: {body}");
        body
    }

    /// Insert a historical snapshot row directly, standing in for the
    /// external scheduled job that populates the table.
    pub async fn seed_history_row(
        &self,
        vendor_id: Uuid,
        date: chrono::DateTime<chrono::Utc>,
        fulfillment_rate: f64,
    ) {
        use sea_orm::Set;

        let row = historical_performance::ActiveModel {
            id: Set(Uuid::new_v4()),
            vendor_id: Set(vendor_id),
            date: Set(date),
            on_time_delivery_rate: Set(1.0),
            quality_rating_avg: Set(4.0),
            average_response_time: Set(2.0),
            fulfillment_rate: Set(fulfillment_rate),
        };
        historical_performance::Entity::insert(row)
            .exec(&*self.state.db)
            .await
            .expect("failed to seed history row");
    }
}

/// JSON payload for creating a purchase order with sensible defaults.
pub fn po_payload(vendor_id: Uuid, po_number: &str) -> Value {
    serde_json::json!({
        "po_number": po_number,
        "vendor_id": vendor_id,
        "order_date": "2024-01-01T09:00:00Z",
        "delivery_date": "2024-01-10T09:00:00Z",
        "items": [{"sku": "widget", "qty": 5}],
        "quantity": 5,
        "issue_date": "2024-01-01T09:00:00Z",
    })
}
