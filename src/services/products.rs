use crate::{
    db::DbPool,
    errors::ServiceError,
    events::{Event, EventSender},
    models::product_entity::{self, Entity as Product},
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
pub struct CreateProductInput {
    #[validate(length(min = 1, max = 64, message = "SKU is required"))]
    pub sku: String,
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    pub description: Option<String>,
}

/// Thin catalog CRUD. Products carry no lifecycle; the only invariant is SKU
/// uniqueness, owned by the database index.
#[derive(Clone)]
pub struct ProductCatalogService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl ProductCatalogService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, input))]
    pub async fn create(
        &self,
        input: CreateProductInput,
    ) -> Result<product_entity::Model, ServiceError> {
        input.validate()?;

        let now = Utc::now();
        let product = product_entity::ActiveModel {
            id: Set(Uuid::new_v4()),
            sku: Set(input.sku.trim().to_string()),
            name: Set(input.name.trim().to_string()),
            description: Set(input
                .description
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let saved = product
            .insert(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)?;

        info!(product_id = %saved.id, sku = %saved.sku, "product created");
        self.event_sender
            .send(Event::ProductCreated(saved.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Option<product_entity::Model>, ServiceError> {
        Product::find_by_id(id)
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<product_entity::Model>, u64), ServiceError> {
        let page = page.max(1);
        let per_page = per_page.clamp(1, 100);

        let total = Product::find()
            .count(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)?;

        let items = Product::find()
            .order_by_asc(product_entity::Column::Sku)
            .offset((page - 1) * per_page)
            .limit(per_page)
            .all(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)?;

        Ok((items, total))
    }
}
