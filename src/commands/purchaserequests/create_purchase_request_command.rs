use crate::{
    catalog,
    commands::Command,
    db::DbPool,
    errors::ServiceError,
    events::{Event, EventSender},
    models::{
        purchase_request_entity::{self, PurchaseRequestStatus},
        purchase_request_line_entity,
    },
    queries::purchase_request_queries::{load_purchase_request_view, PurchaseRequestView},
    request_number,
};
use chrono::{NaiveDate, Utc};
use lazy_static::lazy_static;
use prometheus::IntCounter;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, TransactionError, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

const DESCRIPTION_MAX_CHARS: usize = 500;
const LINE_NOTES_MAX_CHARS: usize = 200;

lazy_static! {
    static ref PR_CREATIONS: IntCounter = IntCounter::new(
        "purchase_request_creations_total",
        "Total number of purchase requests created"
    )
    .expect("metric can be created");
    static ref PR_CREATION_FAILURES: IntCounter = IntCounter::new(
        "purchase_request_creation_failures_total",
        "Total number of failed purchase request creations"
    )
    .expect("metric can be created");
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreatePurchaseRequestCommand {
    /// The acting user id, supplied by the caller.
    pub requested_by: Uuid,
    pub request_date: NaiveDate,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "At least one line is required"))]
    pub lines: Vec<PurchaseRequestLineInput>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PurchaseRequestLineInput {
    pub product_id: Uuid,
    pub unit_id: Uuid,
    pub quantity: Decimal,
    pub required_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Trims optional free text; empty becomes None, oversize is rejected.
fn normalized_text(
    value: Option<&str>,
    max_chars: usize,
    field: &str,
) -> Result<Option<String>, ServiceError> {
    let Some(raw) = value else { return Ok(None) };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > max_chars {
        return Err(ServiceError::ValidationError(format!(
            "{} must be at most {} characters",
            field, max_chars
        )));
    }
    Ok(Some(trimmed.to_string()))
}

#[async_trait::async_trait]
impl Command for CreatePurchaseRequestCommand {
    type Result = PurchaseRequestView;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate().map_err(|e| {
            PR_CREATION_FAILURES.inc();
            let msg = format!("Invalid input: {}", e);
            error!("{}", msg);
            ServiceError::ValidationError(msg)
        })?;

        let db = db_pool.as_ref();

        let description = normalized_text(
            self.description.as_deref(),
            DESCRIPTION_MAX_CHARS,
            "description",
        )?;
        let lines = self.normalized_lines()?;

        // Every referenced catalog row must exist before anything is written.
        self.validate_references(db, &lines).await?;

        let request_number = request_number::allocate(db).await.map_err(|e| {
            PR_CREATION_FAILURES.inc();
            e
        })?;

        let saved = self
            .insert_purchase_request(db, request_number, description, lines)
            .await?;

        self.log_and_trigger_event(&event_sender, &saved).await?;

        PR_CREATIONS.inc();

        load_purchase_request_view(db, saved.id).await
    }
}

impl CreatePurchaseRequestCommand {
    fn normalized_lines(&self) -> Result<Vec<PurchaseRequestLineInput>, ServiceError> {
        self.lines
            .iter()
            .enumerate()
            .map(|(idx, line)| {
                if line.quantity <= Decimal::ZERO {
                    PR_CREATION_FAILURES.inc();
                    return Err(ServiceError::ValidationError(format!(
                        "Line {}: quantity must be greater than zero",
                        idx + 1
                    )));
                }
                let notes = normalized_text(
                    line.notes.as_deref(),
                    LINE_NOTES_MAX_CHARS,
                    &format!("Line {} notes", idx + 1),
                )?;
                Ok(PurchaseRequestLineInput {
                    notes,
                    ..line.clone()
                })
            })
            .collect()
    }

    async fn validate_references(
        &self,
        db: &DatabaseConnection,
        lines: &[PurchaseRequestLineInput],
    ) -> Result<(), ServiceError> {
        let product_ids: Vec<Uuid> = lines.iter().map(|l| l.product_id).collect();
        let unit_ids: Vec<Uuid> = lines.iter().map(|l| l.unit_id).collect();

        catalog::ensure_products_exist(db, &product_ids)
            .await
            .map_err(|e| {
                PR_CREATION_FAILURES.inc();
                e
            })?;
        catalog::ensure_units_exist(db, &unit_ids).await.map_err(|e| {
            PR_CREATION_FAILURES.inc();
            e
        })
    }

    async fn insert_purchase_request(
        &self,
        db: &DatabaseConnection,
        request_number: String,
        description: Option<String>,
        lines: Vec<PurchaseRequestLineInput>,
    ) -> Result<purchase_request_entity::Model, ServiceError> {
        let requested_by = self.requested_by;
        let request_date = self.request_date;
        let now = Utc::now();

        // Header and lines go in as one unit; a failure on any line rolls the
        // whole request back.
        db.transaction::<_, purchase_request_entity::Model, ServiceError>(move |txn| {
            Box::pin(async move {
                let request = purchase_request_entity::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    request_number: Set(request_number.clone()),
                    requested_by: Set(requested_by),
                    request_date: Set(request_date),
                    status: Set(PurchaseRequestStatus::Draft),
                    description: Set(description),
                    submitted_at: Set(None),
                    approved_by: Set(None),
                    approved_at: Set(None),
                    rejection_reason: Set(None),
                    created_at: Set(now),
                    updated_at: Set(now),
                };

                let saved = request.insert(txn).await.map_err(|e| {
                    let msg = format!(
                        "Failed to create purchase request {}: {}",
                        request_number, e
                    );
                    error!("{}", msg);
                    ServiceError::db_error(e)
                })?;

                for (idx, line) in lines.into_iter().enumerate() {
                    let new_line = purchase_request_line_entity::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        purchase_request_id: Set(saved.id),
                        line_no: Set(idx as i32 + 1),
                        product_id: Set(line.product_id),
                        unit_id: Set(line.unit_id),
                        quantity: Set(line.quantity),
                        required_date: Set(line.required_date),
                        notes: Set(line.notes),
                        created_at: Set(now),
                    };
                    new_line.insert(txn).await.map_err(|e| {
                        let msg = format!(
                            "Failed to create line {} of purchase request {}: {}",
                            idx + 1,
                            saved.request_number,
                            e
                        );
                        error!("{}", msg);
                        ServiceError::db_error(e)
                    })?;
                }

                Ok(saved)
            })
        })
        .await
        .map_err(|e| {
            PR_CREATION_FAILURES.inc();
            match e {
                TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
                TransactionError::Transaction(service_err) => service_err,
            }
        })
    }

    async fn log_and_trigger_event(
        &self,
        event_sender: &EventSender,
        saved: &purchase_request_entity::Model,
    ) -> Result<(), ServiceError> {
        info!(
            purchase_request_id = %saved.id,
            request_number = %saved.request_number,
            requested_by = %self.requested_by,
            line_count = %self.lines.len(),
            "Purchase request created successfully"
        );

        event_sender
            .send(Event::PurchaseRequestCreated(saved.id))
            .await
            .map_err(|e| {
                PR_CREATION_FAILURES.inc();
                let msg = format!("Failed to send event for created purchase request: {}", e);
                error!("{}", msg);
                ServiceError::EventError(msg)
            })
    }
}
