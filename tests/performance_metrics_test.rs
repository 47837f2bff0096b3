//! End-to-end coverage of the vendor metrics recompute rule: every save of a
//! purchase order re-derives the owning vendor's metrics before the write's
//! response is returned.

mod common;

use axum::http::StatusCode;
use common::{po_payload, TestApp};
use serde_json::{json, Value};

fn with(mut payload: Value, extra: Value) -> Value {
    for (k, v) in extra.as_object().unwrap() {
        payload[k] = v.clone();
    }
    payload
}

/// First completed order for a vendor: both gated metrics get defined values
/// even though the divisor is 1.
#[tokio::test]
async fn first_completed_order_sets_defined_metrics() {
    let app = TestApp::new().await;
    let vendor_id = app.create_vendor("ACME-01").await;

    let (status, _) = app
        .post(
            "/api/v1/purchase-orders",
            with(po_payload(vendor_id, "PO-101"), json!({"status": "completed"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let perf = app.performance(vendor_id).await;
    // Delivery date is in the past, so the single completed order is on time
    assert_eq!(perf["on_time_delivery_rate"], 1.0);
    // No rating on any completed order stores 0, not an error
    assert_eq!(perf["quality_rating_avg"], 0.0);
    assert_eq!(perf["fulfillment_rate"], 1.0);
}

/// Saving a pending order never moves the completion-gated metrics, no
/// matter what sibling orders exist.
#[tokio::test]
async fn pending_saves_leave_completion_gated_metrics_untouched() {
    let app = TestApp::new().await;
    let vendor_id = app.create_vendor("ACME-02").await;

    let (status, _) = app
        .post(
            "/api/v1/purchase-orders",
            with(
                po_payload(vendor_id, "PO-201"),
                json!({"status": "completed", "quality_rating": 3.0}),
            ),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let before = app.performance(vendor_id).await;
    assert_eq!(before["on_time_delivery_rate"], 1.0);
    assert_eq!(before["quality_rating_avg"], 3.0);

    // A pending sibling arrives
    let (status, _) = app
        .post("/api/v1/purchase-orders", po_payload(vendor_id, "PO-202"))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let after = app.performance(vendor_id).await;
    assert_eq!(after["on_time_delivery_rate"], 1.0);
    assert_eq!(after["quality_rating_avg"], 3.0);
    // Fulfillment is not gated and reflects the new pending order
    assert_eq!(after["fulfillment_rate"], 0.5);
}

/// Fulfillment rate equals completed/total regardless of save order.
#[tokio::test]
async fn fulfillment_rate_is_exact_for_any_save_order() {
    let app = TestApp::new().await;
    let vendor_id = app.create_vendor("ACME-03").await;

    // Interleave: pending, completed, pending, completed
    for (n, status) in [
        ("PO-301", "pending"),
        ("PO-302", "completed"),
        ("PO-303", "pending"),
        ("PO-304", "completed"),
    ] {
        let (code, _) = app
            .post(
                "/api/v1/purchase-orders",
                with(po_payload(vendor_id, n), json!({"status": status})),
            )
            .await;
        assert_eq!(code, StatusCode::CREATED);
    }

    let perf = app.performance(vendor_id).await;
    assert_eq!(perf["fulfillment_rate"], 0.5);

    // One more pending save: 2 completed out of 5
    let (code, _) = app
        .post("/api/v1/purchase-orders", po_payload(vendor_id, "PO-305"))
        .await;
    assert_eq!(code, StatusCode::CREATED);

    let perf = app.performance(vendor_id).await;
    let rate = perf["fulfillment_rate"].as_f64().unwrap();
    assert!((rate - 0.4).abs() < 1e-9);
}

/// Average response time only moves when the just-saved order carries both
/// issue and acknowledgment timestamps.
#[tokio::test]
async fn response_time_updates_only_on_acknowledged_saves() {
    let app = TestApp::new().await;
    let vendor_id = app.create_vendor("ACME-04").await;

    // Unacknowledged order: metric keeps its initial value
    let (status, created) = app
        .post("/api/v1/purchase-orders", po_payload(vendor_id, "PO-401"))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let order_id = created["id"].as_str().unwrap().to_string();

    let perf = app.performance(vendor_id).await;
    assert_eq!(perf["average_response_time"], 0.0);

    // Acknowledged two hours after issue: metric becomes 2 hours
    let (status, _) = app
        .put(
            &format!("/api/v1/purchase-orders/{order_id}"),
            json!({"acknowledgment_date": "2024-01-01T11:00:00Z"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let perf = app.performance(vendor_id).await;
    assert_eq!(perf["average_response_time"], 2.0);

    // A later unacknowledged sibling leaves the metric alone
    let (status, _) = app
        .post("/api/v1/purchase-orders", po_payload(vendor_id, "PO-402"))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let perf = app.performance(vendor_id).await;
    assert_eq!(perf["average_response_time"], 2.0);
}

/// Re-saving an order with identical values leaves every metric exactly
/// where it was: the recompute does not drift.
#[tokio::test]
async fn resaving_identical_values_is_idempotent() {
    let app = TestApp::new().await;
    let vendor_id = app.create_vendor("ACME-05").await;

    let (status, created) = app
        .post(
            "/api/v1/purchase-orders",
            with(
                po_payload(vendor_id, "PO-501"),
                json!({
                    "status": "completed",
                    "quality_rating": 4.0,
                    "acknowledgment_date": "2024-01-01T10:30:00Z",
                }),
            ),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let order_id = created["id"].as_str().unwrap().to_string();

    let before = app.performance(vendor_id).await;

    let (status, _) = app
        .put(
            &format!("/api/v1/purchase-orders/{order_id}"),
            json!({
                "status": "completed",
                "quality_rating": 4.0,
                "acknowledgment_date": "2024-01-01T10:30:00Z",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let after = app.performance(vendor_id).await;
    for metric in [
        "on_time_delivery_rate",
        "quality_rating_avg",
        "average_response_time",
        "fulfillment_rate",
    ] {
        assert_eq!(before[metric], after[metric], "{metric} drifted on re-save");
    }
}

/// The worked example: two completed orders delivered in the past, one rated
/// 4 and one unrated.
#[tokio::test]
async fn worked_example_two_completed_orders() {
    let app = TestApp::new().await;
    let vendor_id = app.create_vendor("ACME-06").await;

    let (status, _) = app
        .post(
            "/api/v1/purchase-orders",
            with(
                po_payload(vendor_id, "PO-EX-1"),
                json!({
                    "status": "completed",
                    "delivery_date": "2024-01-01T00:00:00Z",
                    "quality_rating": 4.0,
                }),
            ),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .post(
            "/api/v1/purchase-orders",
            with(
                po_payload(vendor_id, "PO-EX-2"),
                json!({
                    "status": "completed",
                    "delivery_date": "2024-01-05T00:00:00Z",
                }),
            ),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let perf = app.performance(vendor_id).await;
    assert_eq!(perf["on_time_delivery_rate"], 1.0);
    // The unrated order is excluded from the average entirely
    assert_eq!(perf["quality_rating_avg"], 4.0);
    assert_eq!(perf["fulfillment_rate"], 1.0);
}

/// A cancelled trigger behaves like any non-completed save: only the
/// ungated metrics move.
#[tokio::test]
async fn cancelled_saves_only_move_ungated_metrics() {
    let app = TestApp::new().await;
    let vendor_id = app.create_vendor("ACME-07").await;

    let (status, _) = app
        .post(
            "/api/v1/purchase-orders",
            with(po_payload(vendor_id, "PO-CX-1"), json!({"status": "completed"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .post(
            "/api/v1/purchase-orders",
            with(po_payload(vendor_id, "PO-CX-2"), json!({"status": "cancelled"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let perf = app.performance(vendor_id).await;
    assert_eq!(perf["on_time_delivery_rate"], 1.0);
    assert_eq!(perf["fulfillment_rate"], 0.5);
}

/// Metrics survive unrelated vendors' traffic: the recompute scopes to the
/// owning vendor only.
#[tokio::test]
async fn recompute_is_scoped_to_the_owning_vendor() {
    let app = TestApp::new().await;
    let vendor_a = app.create_vendor("SCOPE-A").await;
    let vendor_b = app.create_vendor("SCOPE-B").await;

    let (status, _) = app
        .post(
            "/api/v1/purchase-orders",
            with(po_payload(vendor_a, "PO-SA"), json!({"status": "completed"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .post("/api/v1/purchase-orders", po_payload(vendor_b, "PO-SB"))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let perf_a = app.performance(vendor_a).await;
    assert_eq!(perf_a["fulfillment_rate"], 1.0);

    let perf_b = app.performance(vendor_b).await;
    assert_eq!(perf_b["fulfillment_rate"], 0.0);
    assert_eq!(perf_b["on_time_delivery_rate"], 0.0);
}

/// Deleting an order does not itself recompute; the next sibling save does.
#[tokio::test]
async fn deletion_defers_recompute_to_the_next_save() {
    let app = TestApp::new().await;
    let vendor_id = app.create_vendor("ACME-08").await;

    let (_, completed) = app
        .post(
            "/api/v1/purchase-orders",
            with(po_payload(vendor_id, "PO-D1"), json!({"status": "completed"})),
        )
        .await;
    let completed_id = completed["id"].as_str().unwrap().to_string();

    let (_, pending) = app
        .post("/api/v1/purchase-orders", po_payload(vendor_id, "PO-D2"))
        .await;
    let pending_id = pending["id"].as_str().unwrap().to_string();

    let perf = app.performance(vendor_id).await;
    assert_eq!(perf["fulfillment_rate"], 0.5);

    // Deleting the completed order leaves the stored metrics stale
    let (status, _) = app
        .delete(&format!("/api/v1/purchase-orders/{completed_id}"))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let perf = app.performance(vendor_id).await;
    assert_eq!(perf["fulfillment_rate"], 0.5);

    // The next save of the surviving order recomputes over what remains
    let (status, _) = app
        .put(
            &format!("/api/v1/purchase-orders/{pending_id}"),
            json!({"quantity": 6}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let perf = app.performance(vendor_id).await;
    assert_eq!(perf["fulfillment_rate"], 0.0);
}
