pub mod common;
pub mod health;
pub mod products;
pub mod purchase_requests;
pub mod units;

use crate::db::DbPool;
use crate::events::EventSender;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub purchase_requests: Arc<crate::services::purchase_requests::PurchaseRequestService>,
    pub products: Arc<crate::services::products::ProductCatalogService>,
    pub units: Arc<crate::services::units::UnitCatalogService>,
}

impl AppServices {
    /// Build the service container shared by all handlers.
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        let purchase_requests = Arc::new(
            crate::services::purchase_requests::PurchaseRequestService::new(
                db_pool.clone(),
                event_sender.clone(),
            ),
        );
        let products = Arc::new(crate::services::products::ProductCatalogService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let units = Arc::new(crate::services::units::UnitCatalogService::new(
            db_pool,
            event_sender,
        ));

        Self {
            purchase_requests,
            products,
            units,
        }
    }
}
