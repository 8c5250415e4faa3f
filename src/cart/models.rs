use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// A single line in the shopping cart.
///
/// `name`, `price` and `image` are display snapshots taken when the product
/// was added. `stock_limit` is the freshest known purchase ceiling for the
/// product; `None` means unknown/unbounded. It serializes as `stock`, the
/// field name the persisted cart payload has always used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartItem {
    pub id: String,
    pub name: String,
    #[schema(value_type = f64, example = 50000)]
    pub price: Decimal,
    pub image: String,
    pub quantity: u32,
    #[serde(default, rename = "stock")]
    pub stock_limit: Option<u32>,
}

/// Request body for POST /api/cart/items
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AddItemRequest {
    #[validate(length(min = 1, message = "Product id must not be empty"))]
    #[schema(example = "p1")]
    pub id: String,

    #[validate(length(min = 1, message = "Product name must not be empty"))]
    #[schema(example = "Perfume X")]
    pub name: String,

    #[schema(value_type = f64, example = 50000)]
    pub price: Decimal,

    #[serde(default)]
    #[schema(example = "img.jpg")]
    pub image: String,

    /// Freshest known stock for the product; absent means unknown.
    #[serde(default)]
    #[schema(value_type = Option<f64>, example = 3)]
    pub stock: Option<Decimal>,
}

/// Request body for PATCH /api/cart/items/{id}
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ChangeQuantityRequest {
    /// Signed quantity adjustment, e.g. 1 or -1.
    #[schema(example = -1)]
    pub delta: i64,
}

/// Full cart state returned to the UI.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartView {
    pub items: Vec<CartItem>,

    /// Badge count: sum of all line item quantities.
    pub total_quantity: u64,

    #[schema(value_type = f64, example = 150000)]
    pub total_price: Decimal,
}

/// Response for cart mutations, carrying the notification text when the
/// operation produced one.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartMutationResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub cart: CartView,
}
