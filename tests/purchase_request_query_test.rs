//! Listing behavior: filters, sorting, paging normalization and the page
//! envelope.

mod common;

use chrono::NaiveDate;
use common::{line, TestHarness};
use procurement_api::{
    commands::purchaserequests::CreatePurchaseRequestCommand,
    models::purchase_request_entity::PurchaseRequestStatus,
    queries::purchase_request_queries::ListPurchaseRequestsQuery,
};
use rust_decimal_macros::dec;
use uuid::Uuid;

struct Seeded {
    app: TestHarness,
    alice: Uuid,
    bob: Uuid,
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Seeds five requests: three for Alice (one submitted), two for Bob, with
/// spread-out request dates and distinct descriptions.
async fn seed() -> Seeded {
    let app = TestHarness::new().await;
    let alice = app.seed_user("Alice Johnson").await;
    let bob = app.seed_user("Bob Stone").await;
    let product = app.seed_product("WIDGET-1", "Widget").await;
    let unit = app.seed_unit("EA", "Each").await;

    let specs = [
        (alice.id, date(2026, 3, 1), "laptops for onboarding"),
        (alice.id, date(2026, 3, 10), "office chairs"),
        (alice.id, date(2026, 3, 20), "monitor arms"),
        (bob.id, date(2026, 4, 1), "warehouse gloves"),
        (bob.id, date(2026, 4, 15), "packing tape"),
    ];

    let mut ids = Vec::new();
    for (requester, request_date, description) in specs {
        let view = app
            .purchase_requests
            .create(CreatePurchaseRequestCommand {
                requested_by: requester,
                request_date,
                description: Some(description.to_string()),
                lines: vec![line(&product, &unit, dec!(1))],
            })
            .await
            .unwrap();
        ids.push(view.id);
    }

    // One of Alice's requests moves on to Submitted.
    app.purchase_requests.submit(ids[1]).await.unwrap();

    Seeded {
        app,
        alice: alice.id,
        bob: bob.id,
    }
}

#[tokio::test]
async fn page_zero_behaves_as_page_one() {
    let s = seed().await;

    let page = s
        .app
        .purchase_requests
        .list(ListPurchaseRequestsQuery {
            page: 0,
            page_size: 2,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.page, 1);
    assert_eq!(page.page_size, 2);
    assert_eq!(page.total, 5);
    assert_eq!(page.items.len(), 2);
}

#[tokio::test]
async fn oversize_page_size_is_clamped_to_the_ceiling() {
    let s = seed().await;

    let page = s
        .app
        .purchase_requests
        .list(ListPurchaseRequestsQuery {
            page: 1,
            page_size: 500,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.page_size, 100);
    assert_eq!(page.items.len(), 5);
}

#[tokio::test]
async fn zero_page_size_gets_the_default() {
    let s = seed().await;

    let page = s
        .app
        .purchase_requests
        .list(ListPurchaseRequestsQuery {
            page: 1,
            page_size: 0,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.page_size, 20);
}

#[tokio::test]
async fn unknown_sort_key_means_newest_first() {
    let s = seed().await;

    let bogus = s
        .app
        .purchase_requests
        .list(ListPurchaseRequestsQuery {
            sort: Some("bogus".to_string()),
            page: 1,
            page_size: 20,
            ..Default::default()
        })
        .await
        .unwrap();

    let newest_first = s
        .app
        .purchase_requests
        .list(ListPurchaseRequestsQuery {
            sort: Some("-created_at".to_string()),
            page: 1,
            page_size: 20,
            ..Default::default()
        })
        .await
        .unwrap();

    let bogus_numbers: Vec<_> = bogus.items.iter().map(|v| &v.request_number).collect();
    let explicit_numbers: Vec<_> = newest_first
        .items
        .iter()
        .map(|v| &v.request_number)
        .collect();
    assert_eq!(bogus_numbers, explicit_numbers);
    // Creation order matches allocation order, so newest-first is the
    // reverse of the request numbers.
    assert_eq!(bogus.items[0].request_number, "PR-000005");
    assert_eq!(bogus.items[4].request_number, "PR-000001");
}

#[tokio::test]
async fn sort_by_request_number_ascending() {
    let s = seed().await;

    let page = s
        .app
        .purchase_requests
        .list(ListPurchaseRequestsQuery {
            sort: Some("request_number".to_string()),
            page: 1,
            page_size: 20,
            ..Default::default()
        })
        .await
        .unwrap();

    let numbers: Vec<_> = page.items.iter().map(|v| v.request_number.clone()).collect();
    let mut sorted = numbers.clone();
    sorted.sort();
    assert_eq!(numbers, sorted);
}

#[tokio::test]
async fn status_filter_is_exact() {
    let s = seed().await;

    let page = s
        .app
        .purchase_requests
        .list(ListPurchaseRequestsQuery {
            status: Some(PurchaseRequestStatus::Submitted),
            page: 1,
            page_size: 20,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].status, PurchaseRequestStatus::Submitted);
}

#[tokio::test]
async fn free_text_matches_number_or_description() {
    let s = seed().await;

    // Matches a request number substring.
    let by_number = s
        .app
        .purchase_requests
        .list(ListPurchaseRequestsQuery {
            q: Some("PR-00000".to_string()),
            page: 1,
            page_size: 20,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_number.total, 5);

    // Matches a description substring.
    let by_description = s
        .app
        .purchase_requests
        .list(ListPurchaseRequestsQuery {
            q: Some("chairs".to_string()),
            page: 1,
            page_size: 20,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_description.total, 1);
    assert_eq!(
        by_description.items[0].description.as_deref(),
        Some("office chairs")
    );
}

#[tokio::test]
async fn requester_filters_by_id_and_by_name() {
    let s = seed().await;

    let by_id = s
        .app
        .purchase_requests
        .list(ListPurchaseRequestsQuery {
            requested_by: Some(s.bob),
            page: 1,
            page_size: 20,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_id.total, 2);
    assert!(by_id.items.iter().all(|v| v.requested_by == s.bob));

    let by_name = s
        .app
        .purchase_requests
        .list(ListPurchaseRequestsQuery {
            user_name: Some("lice".to_string()),
            page: 1,
            page_size: 20,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_name.total, 3);
    assert!(by_name.items.iter().all(|v| v.requested_by == s.alice));
}

#[tokio::test]
async fn date_range_bounds_are_inclusive() {
    let s = seed().await;

    let page = s
        .app
        .purchase_requests
        .list(ListPurchaseRequestsQuery {
            from_date: Some(date(2026, 3, 10)),
            to_date: Some(date(2026, 4, 1)),
            page: 1,
            page_size: 20,
            ..Default::default()
        })
        .await
        .unwrap();

    // 3/10, 3/20 and 4/1 fall inside; both endpoints count.
    assert_eq!(page.total, 3);
}

#[tokio::test]
async fn total_is_counted_over_the_whole_filtered_set() {
    let s = seed().await;

    let page = s
        .app
        .purchase_requests
        .list(ListPurchaseRequestsQuery {
            page: 2,
            page_size: 2,
            sort: Some("request_number".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.total, 5);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].request_number, "PR-000003");

    // Walking past the data yields an empty page with the same total.
    let past_the_end = s
        .app
        .purchase_requests
        .list(ListPurchaseRequestsQuery {
            page: 4,
            page_size: 2,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(past_the_end.total, 5);
    assert!(past_the_end.items.is_empty());
}
