use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::validate_phone;

/// Customer details collected at checkout.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CustomerInfo {
    #[validate(length(min = 1, max = 200, message = "Name must not be empty"))]
    #[schema(example = "Ana Gómez")]
    pub name: String,

    #[validate(custom = "validate_phone")]
    #[schema(example = "+57 318 801 4404")]
    pub phone: String,

    /// Optional contact email.
    #[serde(default)]
    #[validate(email(message = "Invalid email address"))]
    #[schema(example = "ana@example.com")]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 500, message = "Address must not be empty"))]
    #[schema(example = "Calle 10 #4-21, Bogotá")]
    pub address: String,
}

/// Response for a completed checkout handoff.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckoutResponse {
    /// Opaque reference for this handoff.
    pub order_ref: Uuid,

    /// Plain-text order summary, as sent to the seller.
    pub summary: String,

    /// Deep link the client opens to hand the order to WhatsApp.
    pub whatsapp_url: String,
}
