//! Sequential request number allocation.
//!
//! Numbers look like `PR-000042`: the fixed prefix plus six zero-padded
//! digits. Allocation is an optimistic read-then-check loop rather than a
//! database sequence: read the greatest existing number, propose max + 1,
//! verify the candidate is still free, retry on collision. The loop is not
//! linearizable: two concurrent creations can observe the same maximum and
//! propose the same candidate. The unique index on
//! `purchase_requests.request_number` is what ultimately closes that window;
//! the bounded retry only narrows it. Kept isolated here so the scheme can be
//! swapped for an atomic sequence without touching the state machine or the
//! service layer.

use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use tracing::warn;

use crate::errors::ServiceError;
use crate::models::purchase_request_entity::{Column, Entity as PurchaseRequest};

pub const REQUEST_NUMBER_PREFIX: &str = "PR-";

const SEQUENCE_WIDTH: usize = 6;
const MAX_SEQUENCE: u32 = 999_999;
const MAX_ALLOCATION_ATTEMPTS: u32 = 100;

/// Parses the numeric tail of an existing request number. Missing or
/// malformed digits are treated as zero, so a stray legacy row can never
/// poison allocation.
fn parse_sequence(number: &str) -> u32 {
    number
        .strip_prefix(REQUEST_NUMBER_PREFIX)
        .and_then(|tail| tail.parse::<u32>().ok())
        .unwrap_or(0)
}

fn format_request_number(sequence: u32) -> String {
    format!("{}{:0width$}", REQUEST_NUMBER_PREFIX, sequence, width = SEQUENCE_WIDTH)
}

/// Allocates the next free request number.
///
/// Fails with `SequenceExhausted` once the six-digit space is used up
/// (permanent), or `AllocationFailed` when the retry bound is hit under
/// contention (transient).
pub async fn allocate(db: &DatabaseConnection) -> Result<String, ServiceError> {
    for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
        let current_max: Option<String> = PurchaseRequest::find()
            .select_only()
            .column(Column::RequestNumber)
            .filter(Column::RequestNumber.starts_with(REQUEST_NUMBER_PREFIX))
            .order_by_desc(Column::RequestNumber)
            .into_tuple()
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;

        let sequence = current_max.as_deref().map(parse_sequence).unwrap_or(0);
        let next = sequence + 1;
        if next > MAX_SEQUENCE {
            return Err(ServiceError::SequenceExhausted);
        }

        let candidate = format_request_number(next);

        // Re-check against a concurrently inserted duplicate before handing
        // the candidate out.
        let taken = PurchaseRequest::find()
            .filter(Column::RequestNumber.eq(candidate.as_str()))
            .count(db)
            .await
            .map_err(ServiceError::db_error)?
            > 0;

        if !taken {
            return Ok(candidate);
        }

        warn!(
            candidate = %candidate,
            attempt,
            "request number already taken, retrying allocation"
        );
    }

    Err(ServiceError::AllocationFailed(MAX_ALLOCATION_ATTEMPTS))
}
