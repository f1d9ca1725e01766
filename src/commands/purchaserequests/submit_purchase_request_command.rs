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

lazy_static! {
    static ref PR_SUBMISSIONS: IntCounter = IntCounter::new(
        "purchase_request_submissions_total",
        "Total number of purchase requests submitted"
    )
    .expect("metric can be created");
    static ref PR_SUBMISSION_FAILURES: IntCounterVec = IntCounterVec::new(
        prometheus::Opts::new(
            "purchase_request_submission_failures_total",
            "Total number of failed purchase request submissions"
        ),
        &["error_type"]
    )
    .expect("metric can be created");
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitPurchaseRequestCommand {
    pub id: Uuid,
}

#[async_trait::async_trait]
impl Command for SubmitPurchaseRequestCommand {
    type Result = PurchaseRequestView;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        let db = db_pool.as_ref();

        self.submit_purchase_request(db).await?;

        self.log_and_trigger_event(&event_sender).await?;

        PR_SUBMISSIONS.inc();

        load_purchase_request_view(db, self.id).await
    }
}

impl SubmitPurchaseRequestCommand {
    async fn submit_purchase_request(&self, db: &DatabaseConnection) -> Result<(), ServiceError> {
        let request = PurchaseRequest::find_by_id(self.id)
            .one(db)
            .await
            .map_err(|e| {
                PR_SUBMISSION_FAILURES
                    .with_label_values(&["db_error"])
                    .inc();
                ServiceError::db_error(e)
            })?
            .ok_or_else(|| {
                PR_SUBMISSION_FAILURES
                    .with_label_values(&["not_found"])
                    .inc();
                ServiceError::NotFound(format!("Purchase request {} not found", self.id))
            })?;

        let now = Utc::now();
        let decided =
            lifecycle::transition(&request.status, &RequestEvent::Submit, now).map_err(|e| {
                PR_SUBMISSION_FAILURES
                    .with_label_values(&["invalid_transition"])
                    .inc();
                e
            })?;

        lifecycle::apply_transition(request, decided, now)
            .update(db)
            .await
            .map_err(|e| {
                PR_SUBMISSION_FAILURES
                    .with_label_values(&["db_error"])
                    .inc();
                let msg = format!("Failed to submit purchase request {}: {}", self.id, e);
                error!("{}", msg);
                ServiceError::db_error(e)
            })?;

        Ok(())
    }

    async fn log_and_trigger_event(&self, event_sender: &EventSender) -> Result<(), ServiceError> {
        info!(
            purchase_request_id = %self.id,
            "Purchase request submitted successfully"
        );

        event_sender
            .send(Event::PurchaseRequestSubmitted(self.id))
            .await
            .map_err(|e| {
                PR_SUBMISSION_FAILURES
                    .with_label_values(&["event_error"])
                    .inc();
                let msg = format!("Failed to send event for submitted purchase request: {}", e);
                error!("{}", msg);
                ServiceError::EventError(msg)
            })
    }
}
