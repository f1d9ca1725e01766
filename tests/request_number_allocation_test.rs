//! Allocation behavior of the sequential request number scheme against a
//! real database: monotonic growth, gap tolerance, malformed-tail handling
//! and exhaustion of the numeric space.

mod common;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use common::{assert_request_number_shape, line, TestHarness};
use procurement_api::{
    commands::purchaserequests::CreatePurchaseRequestCommand, errors::ServiceError,
    request_number,
};
use rust_decimal_macros::dec;

fn request_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()
}

#[tokio::test]
async fn sequential_creates_get_strictly_increasing_numbers() {
    let app = TestHarness::new().await;
    let requester = app.seed_user("Alice").await;
    let product = app.seed_product("WIDGET-1", "Widget").await;
    let unit = app.seed_unit("EA", "Each").await;

    let mut numbers = Vec::new();
    for _ in 0..4 {
        let view = app
            .purchase_requests
            .create(CreatePurchaseRequestCommand {
                requested_by: requester.id,
                request_date: request_date(),
                description: None,
                lines: vec![line(&product, &unit, dec!(1))],
            })
            .await
            .unwrap();
        assert_request_number_shape(&view.request_number);
        numbers.push(view.request_number);
    }

    assert_eq!(
        numbers,
        vec!["PR-000001", "PR-000002", "PR-000003", "PR-000004"]
    );
    // Strictly increasing implies pairwise distinct.
    assert!(numbers.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn allocation_starts_at_one_on_an_empty_store() {
    let app = TestHarness::new().await;
    let number = request_number::allocate(app.db.as_ref()).await.unwrap();
    assert_eq!(number, "PR-000001");
}

#[tokio::test]
async fn allocation_continues_after_a_gap() {
    let app = TestHarness::new().await;
    // Numbers are never reused, so a store that only contains PR-000007
    // (earlier rows purged or never committed) continues at 8.
    app.seed_raw_request("PR-000007").await;

    let number = request_number::allocate(app.db.as_ref()).await.unwrap();
    assert_eq!(number, "PR-000008");
}

#[tokio::test]
async fn malformed_greatest_number_is_treated_as_zero() {
    let app = TestHarness::new().await;
    // 'X' sorts above every digit, so this row is the lexicographic maximum,
    // and its unparseable tail falls back to zero.
    app.seed_raw_request("PR-XYZ").await;

    let number = request_number::allocate(app.db.as_ref()).await.unwrap();
    assert_eq!(number, "PR-000001");
}

#[tokio::test]
async fn exhausted_sequence_is_a_permanent_failure() {
    let app = TestHarness::new().await;
    app.seed_raw_request("PR-999999").await;

    let err = request_number::allocate(app.db.as_ref()).await.unwrap_err();
    assert_matches!(err, ServiceError::SequenceExhausted);

    // Still exhausted on retry; the failure is not transient.
    let err = request_number::allocate(app.db.as_ref()).await.unwrap_err();
    assert_matches!(err, ServiceError::SequenceExhausted);
}

#[tokio::test]
async fn foreign_prefixes_do_not_influence_allocation() {
    let app = TestHarness::new().await;
    app.seed_raw_request("PR-000002").await;
    // A row from some other numbering scheme is invisible to the allocator.
    app.seed_raw_request("ZZ-999999").await;

    let number = request_number::allocate(app.db.as_ref()).await.unwrap();
    assert_eq!(number, "PR-000003");
}
