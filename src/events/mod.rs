use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Domain events emitted by the service layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Vendor events
    VendorCreated(Uuid),
    VendorUpdated(Uuid),
    VendorDeleted(Uuid),

    // Purchase order events
    PurchaseOrderCreated(Uuid),
    PurchaseOrderUpdated(Uuid),
    PurchaseOrderDeleted(Uuid),

    // Performance events
    VendorMetricsRecalculated {
        vendor_id: Uuid,
        on_time_delivery_rate: Option<f64>,
        quality_rating_avg: Option<f64>,
        average_response_time: Option<f64>,
        fulfillment_rate: Option<f64>,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event without failing the caller; delivery problems are logged.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(err) = self.send(event).await {
            warn!("Dropping domain event: {}", err);
        }
    }
}

/// Consumes events from the channel and logs them. Spawned once at startup.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::VendorMetricsRecalculated { vendor_id, .. } => {
                info!(vendor_id = %vendor_id, event = ?event, "vendor metrics recalculated");
            }
            other => {
                info!(event = ?other, "domain event");
            }
        }
    }
    info!("Event channel closed; event processor exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_or_log_does_not_fail_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);
        // Must not panic or propagate the error
        sender
            .send_or_log(Event::VendorCreated(Uuid::new_v4()))
            .await;
    }

    #[tokio::test]
    async fn events_round_trip_through_channel() {
        let (tx, mut rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);
        let id = Uuid::new_v4();
        sender.send(Event::PurchaseOrderCreated(id)).await.unwrap();

        match rx.recv().await {
            Some(Event::PurchaseOrderCreated(got)) => assert_eq!(got, id),
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
