pub mod purchase_request_queries;
