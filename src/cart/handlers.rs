// HTTP handlers for cart endpoints
//
// The shopper session is identified by the `x-session-id` header; requests
// without one share the anonymous cart. Stock rejections come back as 409
// with the notification text, never as an ApiError.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use validator::Validate;

use crate::cart::models::{
    AddItemRequest, CartMutationResponse, CartView, ChangeQuantityRequest,
};
use crate::cart::ops::{CartSignal, NewItem};
use crate::cart::store::{CartLedger, KeyValueStore};
use crate::error::ApiError;

pub const SESSION_HEADER: &str = "x-session-id";

/// Session id from the request headers, defaulting to the shared
/// anonymous cart.
fn session_id(headers: &HeaderMap) -> &str {
    headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .unwrap_or("anonymous")
}

/// Ledger bound to the requesting session. Shared with checkout.
pub(crate) fn session_ledger(store: Arc<dyn KeyValueStore>, headers: &HeaderMap) -> CartLedger {
    CartLedger::for_session(store, session_id(headers))
}

/// Full cart view for the ledger's current state.
pub(crate) async fn view(ledger: &CartLedger) -> CartView {
    let items = ledger.load().await;
    CartView {
        total_quantity: crate::cart::ops::total_quantity(&items),
        total_price: crate::cart::ops::total_price(&items),
        items,
    }
}

/// 409 with the rejection message when a stock rule refused the command,
/// 200 with the (possibly updated) cart otherwise.
fn mutation_response(signal: CartSignal, cart: CartView) -> Response {
    let status = if signal.rejected() {
        StatusCode::CONFLICT
    } else {
        StatusCode::OK
    };
    let body = CartMutationResponse {
        message: signal.message(),
        cart,
    };
    (status, Json(body)).into_response()
}

/// Handler for GET /api/cart
#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Current cart for the session", body = CartView)
    ),
    tag = "cart"
)]
pub async fn get_cart_handler(
    State(state): State<crate::AppState>,
    headers: HeaderMap,
) -> Json<CartView> {
    let ledger = session_ledger(state.cart_store.clone(), &headers);
    Json(view(&ledger).await)
}

/// Handler for POST /api/cart/items
/// Adds one unit of a product to the session's cart
#[utoipa::path(
    post,
    path = "/api/cart/items",
    request_body = AddItemRequest,
    responses(
        (status = 200, description = "Item added", body = CartMutationResponse),
        (status = 400, description = "Invalid request body"),
        (status = 409, description = "Rejected by a stock rule", body = CartMutationResponse)
    ),
    tag = "cart"
)]
pub async fn add_cart_item_handler(
    State(state): State<crate::AppState>,
    headers: HeaderMap,
    Json(request): Json<AddItemRequest>,
) -> Result<Response, ApiError> {
    request.validate()?;

    let ledger = session_ledger(state.cart_store.clone(), &headers);
    let signal = ledger
        .add_item(NewItem {
            id: request.id,
            name: request.name,
            price: request.price,
            image: request.image,
            stock_hint: request.stock,
        })
        .await;

    tracing::debug!("Cart add resolved to {:?}", signal);
    Ok(mutation_response(signal, view(&ledger).await))
}

/// Handler for PATCH /api/cart/items/:id
/// Adjusts a line item's quantity by a signed delta
#[utoipa::path(
    patch,
    path = "/api/cart/items/{id}",
    params(("id" = String, Path, description = "Product id")),
    request_body = ChangeQuantityRequest,
    responses(
        (status = 200, description = "Quantity adjusted", body = CartMutationResponse),
        (status = 409, description = "Rejected by a stock rule", body = CartMutationResponse)
    ),
    tag = "cart"
)]
pub async fn change_cart_quantity_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<ChangeQuantityRequest>,
) -> Response {
    let ledger = session_ledger(state.cart_store.clone(), &headers);
    let signal = ledger.change_quantity(&id, request.delta).await;

    tracing::debug!("Quantity change for {} resolved to {:?}", id, signal);
    mutation_response(signal, view(&ledger).await)
}

/// Handler for DELETE /api/cart/items/:id
#[utoipa::path(
    delete,
    path = "/api/cart/items/{id}",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Item removed", body = CartMutationResponse)
    ),
    tag = "cart"
)]
pub async fn remove_cart_item_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let ledger = session_ledger(state.cart_store.clone(), &headers);
    let signal = ledger.remove_item(&id).await;
    mutation_response(signal, view(&ledger).await)
}

/// Handler for DELETE /api/cart
/// Empties the session's cart
#[utoipa::path(
    delete,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart emptied", body = CartView)
    ),
    tag = "cart"
)]
pub async fn clear_cart_handler(
    State(state): State<crate::AppState>,
    headers: HeaderMap,
) -> Json<CartView> {
    let ledger = session_ledger(state.cart_store.clone(), &headers);
    ledger.clear().await;
    Json(view(&ledger).await)
}
