use crate::{
    commands::purchaserequests::{
        ApprovePurchaseRequestCommand, CancelPurchaseRequestCommand, CreatePurchaseRequestCommand,
        RejectPurchaseRequestCommand, SubmitPurchaseRequestCommand,
    },
    commands::Command,
    db::DbPool,
    errors::ServiceError,
    events::EventSender,
    queries::purchase_request_queries::{
        GetPurchaseRequestQuery, ListPurchaseRequestsQuery, Paged, PurchaseRequestView, Query,
    },
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Service for managing the purchase request lifecycle.
///
/// Each mutating call is one load-decide-write unit of work; an aggregate is
/// either unchanged or fully updated with its side-effect fields.
#[derive(Clone)]
pub struct PurchaseRequestService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl PurchaseRequestService {
    /// Creates a new purchase request service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates a new purchase request in Draft status
    #[instrument(skip(self, command))]
    pub async fn create(
        &self,
        command: CreatePurchaseRequestCommand,
    ) -> Result<PurchaseRequestView, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    /// Submits a Draft purchase request for approval
    #[instrument(skip(self))]
    pub async fn submit(&self, id: Uuid) -> Result<PurchaseRequestView, ServiceError> {
        SubmitPurchaseRequestCommand { id }
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    /// Approves a Submitted purchase request
    #[instrument(skip(self))]
    pub async fn approve(
        &self,
        id: Uuid,
        approver_id: Uuid,
    ) -> Result<PurchaseRequestView, ServiceError> {
        ApprovePurchaseRequestCommand { id, approver_id }
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    /// Rejects a Submitted purchase request with a mandatory reason
    #[instrument(skip(self, reason))]
    pub async fn reject(
        &self,
        id: Uuid,
        reason: String,
    ) -> Result<PurchaseRequestView, ServiceError> {
        RejectPurchaseRequestCommand { id, reason }
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    /// Cancels a Submitted purchase request
    #[instrument(skip(self))]
    pub async fn cancel(&self, id: Uuid) -> Result<PurchaseRequestView, ServiceError> {
        CancelPurchaseRequestCommand { id }
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    /// Gets a purchase request by id
    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<PurchaseRequestView, ServiceError> {
        GetPurchaseRequestQuery { id }
            .execute(self.db_pool.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase request {} not found", id)))
    }

    /// Lists purchase requests with filtering, sorting and paging
    #[instrument(skip(self, query))]
    pub async fn list(
        &self,
        query: ListPurchaseRequestsQuery,
    ) -> Result<Paged<PurchaseRequestView>, ServiceError> {
        query.execute(self.db_pool.as_ref()).await
    }
}
