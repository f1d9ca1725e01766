pub mod products;
pub mod purchase_requests;
pub mod units;
