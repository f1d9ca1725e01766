use crate::{
    db::DbPool,
    errors::ServiceError,
    events::{Event, EventSender},
    models::unit_entity::{self, Entity as Unit},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUnitInput {
    #[validate(length(min = 1, max = 16, message = "Code is required"))]
    pub code: String,
    #[validate(length(min = 1, max = 64, message = "Name is required"))]
    pub name: String,
}

/// Thin unit-of-measure CRUD, mirrored on the product catalog service.
#[derive(Clone)]
pub struct UnitCatalogService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl UnitCatalogService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateUnitInput) -> Result<unit_entity::Model, ServiceError> {
        input.validate()?;

        let unit = unit_entity::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(input.code.trim().to_string()),
            name: Set(input.name.trim().to_string()),
            created_at: Set(Utc::now()),
        };

        let saved = unit
            .insert(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)?;

        info!(unit_id = %saved.id, code = %saved.code, "unit created");
        self.event_sender
            .send(Event::UnitCreated(saved.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Option<unit_entity::Model>, ServiceError> {
        Unit::find_by_id(id)
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<unit_entity::Model>, u64), ServiceError> {
        let page = page.max(1);
        let per_page = per_page.clamp(1, 100);

        let total = Unit::find()
            .count(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)?;

        let items = Unit::find()
            .order_by_asc(unit_entity::Column::Code)
            .offset((page - 1) * per_page)
            .limit(per_page)
            .all(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)?;

        Ok((items, total))
    }
}
