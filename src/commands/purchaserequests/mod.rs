pub mod approve_purchase_request_command;
pub mod cancel_purchase_request_command;
pub mod create_purchase_request_command;
pub mod reject_purchase_request_command;
pub mod submit_purchase_request_command;

pub use approve_purchase_request_command::ApprovePurchaseRequestCommand;
pub use cancel_purchase_request_command::CancelPurchaseRequestCommand;
pub use create_purchase_request_command::{
    CreatePurchaseRequestCommand, PurchaseRequestLineInput,
};
pub use reject_purchase_request_command::RejectPurchaseRequestCommand;
pub use submit_purchase_request_command::SubmitPurchaseRequestCommand;
