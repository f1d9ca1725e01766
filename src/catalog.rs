//! Batch existence checks against the product and unit catalogs.
//!
//! The contract is deliberately coarse: deduplicate the ids, count matching
//! catalog rows, and fail naming only the entity kind when the counts differ.
//! There is no per-id diagnosis; callers correct their input and resubmit.

use std::collections::HashSet;

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::models::{product_entity, unit_entity};

pub async fn ensure_products_exist(
    db: &DatabaseConnection,
    ids: &[Uuid],
) -> Result<(), ServiceError> {
    let distinct: HashSet<Uuid> = ids.iter().copied().collect();
    if distinct.is_empty() {
        return Ok(());
    }

    let found = product_entity::Entity::find()
        .filter(product_entity::Column::Id.is_in(distinct.iter().copied()))
        .count(db)
        .await
        .map_err(ServiceError::db_error)?;

    if found != distinct.len() as u64 {
        return Err(ServiceError::ReferenceNotFound { entity: "product" });
    }
    Ok(())
}

pub async fn ensure_units_exist(db: &DatabaseConnection, ids: &[Uuid]) -> Result<(), ServiceError> {
    let distinct: HashSet<Uuid> = ids.iter().copied().collect();
    if distinct.is_empty() {
        return Ok(());
    }

    let found = unit_entity::Entity::find()
        .filter(unit_entity::Column::Id.is_in(distinct.iter().copied()))
        .count(db)
        .await
        .map_err(ServiceError::db_error)?;

    if found != distinct.len() as u64 {
        return Err(ServiceError::ReferenceNotFound { entity: "unit" });
    }
    Ok(())
}
