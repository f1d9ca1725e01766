//! Pure decision logic for purchase request status changes.
//!
//! The transition table is a closed total function over `(status, event)`:
//!
//! | Current   | Event   | Next      | Side effects                       |
//! |-----------|---------|-----------|------------------------------------|
//! | Draft     | Submit  | Submitted | `submitted_at = now`               |
//! | Submitted | Approve | Approved  | `approved_by`, `approved_at = now` |
//! | Submitted | Reject  | Rejected  | `rejection_reason`                 |
//! | Submitted | Cancel  | Cancelled | none                               |
//!
//! Everything else is rejected. There is intentionally no Draft→Cancel and no
//! Draft→Reject edge: only a submitted request can be rejected or cancelled.

use chrono::{DateTime, Utc};
use sea_orm::Set;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::models::purchase_request_entity::{self, PurchaseRequestStatus};

/// A requested status change, together with the data the transition consumes.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestEvent {
    Submit,
    Approve { approver_id: Uuid },
    Reject { reason: String },
    Cancel,
}

impl RequestEvent {
    pub fn name(&self) -> &'static str {
        match self {
            RequestEvent::Submit => "Submit",
            RequestEvent::Approve { .. } => "Approve",
            RequestEvent::Reject { .. } => "Reject",
            RequestEvent::Cancel => "Cancel",
        }
    }
}

/// Field updates that must be written together with the status change.
/// Populated strictly in lock-step with the transition that sets them.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransitionEffects {
    pub submitted_at: Option<DateTime<Utc>>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub next: PurchaseRequestStatus,
    pub effects: TransitionEffects,
}

/// Decides whether `event` is legal from `current`. Returns the new status
/// plus the side-effect fields, or `InvalidTransition` carrying both the
/// current status and the attempted event. Never touches storage.
pub fn transition(
    current: &PurchaseRequestStatus,
    event: &RequestEvent,
    now: DateTime<Utc>,
) -> Result<Transition, ServiceError> {
    use PurchaseRequestStatus::*;

    match (current, event) {
        (Draft, RequestEvent::Submit) => Ok(Transition {
            next: Submitted,
            effects: TransitionEffects {
                submitted_at: Some(now),
                ..Default::default()
            },
        }),
        (Submitted, RequestEvent::Approve { approver_id }) => Ok(Transition {
            next: Approved,
            effects: TransitionEffects {
                approved_by: Some(*approver_id),
                approved_at: Some(now),
                ..Default::default()
            },
        }),
        (Submitted, RequestEvent::Reject { reason }) => Ok(Transition {
            next: Rejected,
            effects: TransitionEffects {
                rejection_reason: Some(reason.clone()),
                ..Default::default()
            },
        }),
        (Submitted, RequestEvent::Cancel) => Ok(Transition {
            next: Cancelled,
            effects: TransitionEffects::default(),
        }),
        (current, event) => Err(ServiceError::InvalidTransition {
            current: current.to_string(),
            event: event.name().to_string(),
        }),
    }
}

/// Applies a decided transition to a loaded aggregate, producing the active
/// model to persist. Side-effect fields are only ever set, never cleared.
pub fn apply_transition(
    request: purchase_request_entity::Model,
    transition: Transition,
    now: DateTime<Utc>,
) -> purchase_request_entity::ActiveModel {
    let mut active: purchase_request_entity::ActiveModel = request.into();
    active.status = Set(transition.next);
    if let Some(ts) = transition.effects.submitted_at {
        active.submitted_at = Set(Some(ts));
    }
    if let Some(approver) = transition.effects.approved_by {
        active.approved_by = Set(Some(approver));
    }
    if let Some(ts) = transition.effects.approved_at {
        active.approved_at = Set(Some(ts));
    }
    if let Some(reason) = transition.effects.rejection_reason {
        active.rejection_reason = Set(Some(reason));
    }
    active.updated_at = Set(now);
    active
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rstest::rstest;

    fn submit() -> RequestEvent {
        RequestEvent::Submit
    }

    fn approve() -> RequestEvent {
        RequestEvent::Approve {
            approver_id: Uuid::new_v4(),
        }
    }

    fn reject() -> RequestEvent {
        RequestEvent::Reject {
            reason: "over budget".to_string(),
        }
    }

    fn cancel() -> RequestEvent {
        RequestEvent::Cancel
    }

    #[test]
    fn draft_submit_sets_submitted_at() {
        let now = Utc::now();
        let t = transition(&PurchaseRequestStatus::Draft, &submit(), now).unwrap();
        assert_eq!(t.next, PurchaseRequestStatus::Submitted);
        assert_eq!(t.effects.submitted_at, Some(now));
        assert_eq!(t.effects.approved_by, None);
        assert_eq!(t.effects.approved_at, None);
        assert_eq!(t.effects.rejection_reason, None);
    }

    #[test]
    fn submitted_approve_records_approver_and_time() {
        let now = Utc::now();
        let approver = Uuid::new_v4();
        let t = transition(
            &PurchaseRequestStatus::Submitted,
            &RequestEvent::Approve {
                approver_id: approver,
            },
            now,
        )
        .unwrap();
        assert_eq!(t.next, PurchaseRequestStatus::Approved);
        assert_eq!(t.effects.approved_by, Some(approver));
        assert_eq!(t.effects.approved_at, Some(now));
        assert_eq!(t.effects.submitted_at, None);
    }

    #[test]
    fn submitted_reject_carries_reason() {
        let t = transition(&PurchaseRequestStatus::Submitted, &reject(), Utc::now()).unwrap();
        assert_eq!(t.next, PurchaseRequestStatus::Rejected);
        assert_eq!(t.effects.rejection_reason.as_deref(), Some("over budget"));
    }

    #[test]
    fn submitted_cancel_has_no_side_effects() {
        let t = transition(&PurchaseRequestStatus::Submitted, &cancel(), Utc::now()).unwrap();
        assert_eq!(t.next, PurchaseRequestStatus::Cancelled);
        assert_eq!(t.effects, TransitionEffects::default());
    }

    // Every (status, event) pair outside the table must be rejected, with the
    // current status and attempted event named in the error.
    #[rstest]
    #[case::draft_approve(PurchaseRequestStatus::Draft, approve())]
    #[case::draft_reject(PurchaseRequestStatus::Draft, reject())]
    #[case::draft_cancel(PurchaseRequestStatus::Draft, cancel())]
    #[case::submitted_submit(PurchaseRequestStatus::Submitted, submit())]
    #[case::approved_submit(PurchaseRequestStatus::Approved, submit())]
    #[case::approved_approve(PurchaseRequestStatus::Approved, approve())]
    #[case::approved_reject(PurchaseRequestStatus::Approved, reject())]
    #[case::approved_cancel(PurchaseRequestStatus::Approved, cancel())]
    #[case::rejected_submit(PurchaseRequestStatus::Rejected, submit())]
    #[case::rejected_approve(PurchaseRequestStatus::Rejected, approve())]
    #[case::rejected_reject(PurchaseRequestStatus::Rejected, reject())]
    #[case::rejected_cancel(PurchaseRequestStatus::Rejected, cancel())]
    #[case::cancelled_submit(PurchaseRequestStatus::Cancelled, submit())]
    #[case::cancelled_approve(PurchaseRequestStatus::Cancelled, approve())]
    #[case::cancelled_reject(PurchaseRequestStatus::Cancelled, reject())]
    #[case::cancelled_cancel(PurchaseRequestStatus::Cancelled, cancel())]
    fn off_table_pairs_are_rejected(
        #[case] current: PurchaseRequestStatus,
        #[case] event: RequestEvent,
    ) {
        let result = transition(&current, &event, Utc::now());
        assert_matches!(
            result,
            Err(ServiceError::InvalidTransition { current: c, event: e })
                if c == current.to_string() && e == event.name()
        );
    }
}
