pub mod handlers;
pub mod models;
pub mod summary;

pub use handlers::checkout_handler;
pub use models::{CheckoutResponse, CustomerInfo};
pub use summary::{order_summary, whatsapp_link};
