pub mod product_entity;
pub mod purchase_request_entity;
pub mod purchase_request_line_entity;
pub mod unit_entity;
pub mod user_entity;
