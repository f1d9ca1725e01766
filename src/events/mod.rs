use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

/// Sending half of the in-process event channel, handed to commands.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

// Domain events emitted after a state change has been persisted. Observers
// only ever receive ids; they re-read state if they need it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    PurchaseRequestCreated(Uuid),
    PurchaseRequestSubmitted(Uuid),
    PurchaseRequestApproved {
        purchase_request_id: Uuid,
        approved_by: Uuid,
    },
    PurchaseRequestRejected {
        purchase_request_id: Uuid,
    },
    PurchaseRequestCancelled(Uuid),

    ProductCreated(Uuid),
    UnitCreated(Uuid),

    Generic {
        message: String,
        timestamp: DateTime<Utc>,
        metadata: serde_json::Value,
    },
}

/// Processes events received on the channel until all senders are dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::PurchaseRequestCreated(id) => {
                info!(purchase_request_id = %id, "purchase request created");
            }
            Event::PurchaseRequestSubmitted(id) => {
                info!(purchase_request_id = %id, "purchase request submitted for approval");
            }
            Event::PurchaseRequestApproved {
                purchase_request_id,
                approved_by,
            } => {
                info!(
                    purchase_request_id = %purchase_request_id,
                    approved_by = %approved_by,
                    "purchase request approved"
                );
            }
            Event::PurchaseRequestRejected {
                purchase_request_id,
            } => {
                info!(purchase_request_id = %purchase_request_id, "purchase request rejected");
            }
            Event::PurchaseRequestCancelled(id) => {
                info!(purchase_request_id = %id, "purchase request cancelled");
            }
            Event::ProductCreated(id) => {
                info!(product_id = %id, "product created");
            }
            Event::UnitCreated(id) => {
                info!(unit_id = %id, "unit created");
            }
            Event::Generic { message, .. } => {
                info!(message = %message, "generic event");
            }
        }
    }

    info!("Event processing loop stopped");
}
