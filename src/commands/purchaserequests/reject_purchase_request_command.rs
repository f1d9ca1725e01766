use crate::{
    commands::Command,
    db::DbPool,
    errors::ServiceError,
    events::{Event, EventSender},
    lifecycle::{self, RequestEvent},
    models::purchase_request_entity::Entity as PurchaseRequest,
    queries::purchase_request_queries::{load_purchase_request_view, PurchaseRequestView},
};
use chrono::Utc;
use lazy_static::lazy_static;
use prometheus::{IntCounter, IntCounterVec};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

const REASON_MAX_CHARS: usize = 500;

lazy_static! {
    static ref PR_REJECTIONS: IntCounter = IntCounter::new(
        "purchase_request_rejections_total",
        "Total number of purchase requests rejected"
    )
    .expect("metric can be created");
    static ref PR_REJECTION_FAILURES: IntCounterVec = IntCounterVec::new(
        prometheus::Opts::new(
            "purchase_request_rejection_failures_total",
            "Total number of failed purchase request rejections"
        ),
        &["error_type"]
    )
    .expect("metric can be created");
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RejectPurchaseRequestCommand {
    pub id: Uuid,
    #[validate(length(
        min = 1,
        max = 500,
        message = "Rejection reason is required and must be at most 500 characters"
    ))]
    pub reason: String,
}

#[async_trait::async_trait]
impl Command for RejectPurchaseRequestCommand {
    type Result = PurchaseRequestView;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        // The reason is checked before the state machine is ever consulted; a
        // blank reason must not reach the transition.
        self.validate().map_err(|e| {
            PR_REJECTION_FAILURES
                .with_label_values(&["validation_error"])
                .inc();
            let msg = format!("Invalid input: {}", e);
            error!("{}", msg);
            ServiceError::ValidationError(msg)
        })?;
        let reason = self.normalized_reason()?;

        let db = db_pool.as_ref();

        self.reject_purchase_request(db, reason).await?;

        self.log_and_trigger_event(&event_sender).await?;

        PR_REJECTIONS.inc();

        load_purchase_request_view(db, self.id).await
    }
}

impl RejectPurchaseRequestCommand {
    fn normalized_reason(&self) -> Result<String, ServiceError> {
        let trimmed = self.reason.trim();
        if trimmed.is_empty() {
            PR_REJECTION_FAILURES
                .with_label_values(&["validation_error"])
                .inc();
            return Err(ServiceError::ValidationError(
                "Rejection reason is required".to_string(),
            ));
        }
        if trimmed.chars().count() > REASON_MAX_CHARS {
            PR_REJECTION_FAILURES
                .with_label_values(&["validation_error"])
                .inc();
            return Err(ServiceError::ValidationError(format!(
                "Rejection reason must be at most {} characters",
                REASON_MAX_CHARS
            )));
        }
        Ok(trimmed.to_string())
    }

    async fn reject_purchase_request(
        &self,
        db: &DatabaseConnection,
        reason: String,
    ) -> Result<(), ServiceError> {
        let request = PurchaseRequest::find_by_id(self.id)
            .one(db)
            .await
            .map_err(|e| {
                PR_REJECTION_FAILURES
                    .with_label_values(&["db_error"])
                    .inc();
                ServiceError::db_error(e)
            })?
            .ok_or_else(|| {
                PR_REJECTION_FAILURES
                    .with_label_values(&["not_found"])
                    .inc();
                ServiceError::NotFound(format!("Purchase request {} not found", self.id))
            })?;

        let now = Utc::now();
        let decided = lifecycle::transition(&request.status, &RequestEvent::Reject { reason }, now)
            .map_err(|e| {
                PR_REJECTION_FAILURES
                    .with_label_values(&["invalid_transition"])
                    .inc();
                e
            })?;

        lifecycle::apply_transition(request, decided, now)
            .update(db)
            .await
            .map_err(|e| {
                PR_REJECTION_FAILURES
                    .with_label_values(&["db_error"])
                    .inc();
                let msg = format!("Failed to reject purchase request {}: {}", self.id, e);
                error!("{}", msg);
                ServiceError::db_error(e)
            })?;

        Ok(())
    }

    async fn log_and_trigger_event(&self, event_sender: &EventSender) -> Result<(), ServiceError> {
        info!(
            purchase_request_id = %self.id,
            "Purchase request rejected"
        );

        event_sender
            .send(Event::PurchaseRequestRejected {
                purchase_request_id: self.id,
            })
            .await
            .map_err(|e| {
                PR_REJECTION_FAILURES
                    .with_label_values(&["event_error"])
                    .inc();
                let msg = format!("Failed to send event for rejected purchase request: {}", e);
                error!("{}", msg);
                ServiceError::EventError(msg)
            })
    }
}
