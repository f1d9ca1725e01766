use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    commands::Command,
    db::DbPool,
    errors::ServiceError,
    events::{Event, EventSender},
    lifecycle::{self, RequestEvent},
    models::purchase_request_entity::Entity as PurchaseRequest,
    queries::purchase_request_queries::{load_purchase_request_view, PurchaseRequestView},
};

#[derive(Debug, Serialize, Deserialize)]
pub struct ApprovePurchaseRequestCommand {
    pub id: Uuid,
    /// The approving user, passed explicitly by the caller.
    pub approver_id: Uuid,
}

#[async_trait]
impl Command for ApprovePurchaseRequestCommand {
    type Result = PurchaseRequestView;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        let db = db_pool.as_ref();

        let request = PurchaseRequest::find_by_id(self.id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Purchase request {} not found", self.id))
            })?;

        let now = Utc::now();
        let decided = lifecycle::transition(
            &request.status,
            &RequestEvent::Approve {
                approver_id: self.approver_id,
            },
            now,
        )?;

        lifecycle::apply_transition(request, decided, now)
            .update(db)
            .await
            .map_err(ServiceError::db_error)?;

        info!(
            purchase_request_id = %self.id,
            approver = %self.approver_id,
            "Purchase request approved"
        );
        event_sender
            .send(Event::PurchaseRequestApproved {
                purchase_request_id: self.id,
                approved_by: self.approver_id,
            })
            .await
            .map_err(ServiceError::EventError)?;

        load_purchase_request_view(db, self.id).await
    }
}
