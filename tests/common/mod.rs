use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};
use tokio::sync::mpsc;
use uuid::Uuid;

use procurement_api::{
    commands::purchaserequests::PurchaseRequestLineInput,
    db::{self, DbConfig, DbPool},
    events::EventSender,
    models::{
        product_entity, purchase_request_entity, purchase_request_entity::PurchaseRequestStatus,
        unit_entity, user_entity,
    },
    services::purchase_requests::PurchaseRequestService,
};

/// Test harness backed by an in-memory SQLite database with the embedded
/// migrations applied.
pub struct TestHarness {
    pub db: Arc<DbPool>,
    pub purchase_requests: PurchaseRequestService,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestHarness {
    pub async fn new() -> Self {
        // In-memory SQLite gives every pooled connection its own database, so
        // the pool is pinned to a single connection.
        let config = DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        };
        let pool = db::establish_connection_with_config(&config)
            .await
            .expect("in-memory sqlite");
        db::run_migrations(&pool).await.expect("migrations");
        let db = Arc::new(pool);

        let (tx, mut rx) = mpsc::channel(256);
        let event_sender = Arc::new(EventSender::new(tx));
        // Keep the receiving half alive and drained for the test's lifetime.
        let event_task = tokio::spawn(async move { while rx.recv().await.is_some() {} });

        let purchase_requests = PurchaseRequestService::new(db.clone(), event_sender);

        Self {
            db,
            purchase_requests,
            _event_task: event_task,
        }
    }

    pub async fn seed_user(&self, name: &str) -> user_entity::Model {
        user_entity::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            email: Set(Some(format!("{}@example.com", name.to_lowercase()))),
            created_at: Set(Utc::now()),
        }
        .insert(self.db.as_ref())
        .await
        .expect("seed user")
    }

    pub async fn seed_product(&self, sku: &str, name: &str) -> product_entity::Model {
        let now = Utc::now();
        product_entity::ActiveModel {
            id: Set(Uuid::new_v4()),
            sku: Set(sku.to_string()),
            name: Set(name.to_string()),
            description: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db.as_ref())
        .await
        .expect("seed product")
    }

    pub async fn seed_unit(&self, code: &str, name: &str) -> unit_entity::Model {
        unit_entity::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            created_at: Set(Utc::now()),
        }
        .insert(self.db.as_ref())
        .await
        .expect("seed unit")
    }

    /// Inserts a bare purchase request row with the given request number,
    /// bypassing the allocator. Used to stage allocator edge cases.
    pub async fn seed_raw_request(&self, request_number: &str) -> purchase_request_entity::Model {
        let now = Utc::now();
        purchase_request_entity::ActiveModel {
            id: Set(Uuid::new_v4()),
            request_number: Set(request_number.to_string()),
            requested_by: Set(Uuid::new_v4()),
            request_date: Set(now.date_naive()),
            status: Set(PurchaseRequestStatus::Draft),
            description: Set(None),
            submitted_at: Set(None),
            approved_by: Set(None),
            approved_at: Set(None),
            rejection_reason: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db.as_ref())
        .await
        .expect("seed raw purchase request")
    }
}

/// Builds a line input for the given catalog rows.
pub fn line(
    product: &product_entity::Model,
    unit: &unit_entity::Model,
    quantity: Decimal,
) -> PurchaseRequestLineInput {
    PurchaseRequestLineInput {
        product_id: product.id,
        unit_id: unit.id,
        quantity,
        required_date: None,
        notes: None,
    }
}

/// Asserts the `PR-` + six digits shape without pulling in a regex crate.
pub fn assert_request_number_shape(number: &str) {
    let tail = number
        .strip_prefix("PR-")
        .unwrap_or_else(|| panic!("request number {} missing PR- prefix", number));
    assert_eq!(tail.len(), 6, "request number {} tail is not 6 digits", number);
    assert!(
        tail.chars().all(|c| c.is_ascii_digit()),
        "request number {} tail is not numeric",
        number
    );
}
