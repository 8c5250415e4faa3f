// HTTP handler for checkout

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use uuid::Uuid;
use validator::Validate;

use crate::cart::handlers::session_ledger;
use crate::checkout::models::{CheckoutResponse, CustomerInfo};
use crate::checkout::summary::{order_summary, whatsapp_link};
use crate::error::ApiError;

/// Handler for POST /api/checkout
/// Renders the session's cart into a WhatsApp handoff and empties the cart
#[utoipa::path(
    post,
    path = "/api/checkout",
    request_body = CustomerInfo,
    responses(
        (status = 200, description = "Order handed off", body = CheckoutResponse),
        (status = 400, description = "Invalid customer details"),
        (status = 409, description = "Cart is empty")
    ),
    tag = "checkout"
)]
pub async fn checkout_handler(
    State(state): State<crate::AppState>,
    headers: HeaderMap,
    Json(customer): Json<CustomerInfo>,
) -> Result<Response, ApiError> {
    customer.validate()?;

    let ledger = session_ledger(state.cart_store.clone(), &headers);
    let items = ledger.load().await;
    if items.is_empty() {
        tracing::debug!("Checkout attempted with an empty cart");
        return Ok((
            StatusCode::CONFLICT,
            Json(serde_json::json!({ "message": "El carrito está vacío" })),
        )
            .into_response());
    }

    let order_ref = Uuid::new_v4();
    let summary = order_summary(&items, &customer);
    let whatsapp_url = whatsapp_link(&state.settings.whatsapp_phone, &summary);

    // The handoff is the client's to complete; the cart is considered
    // spent once the link has been produced.
    ledger.clear().await;

    tracing::info!("Checkout {} handed off {} line items", order_ref, items.len());

    Ok(Json(CheckoutResponse {
        order_ref,
        summary,
        whatsapp_url,
    })
    .into_response())
}
