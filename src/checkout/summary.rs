// Order summary and WhatsApp handoff
//
// Checkout does not create an order anywhere: it renders the cart into a
// plain-text message and hands it to the seller's WhatsApp via a wa.me deep
// link. The client opens the link; nothing is sent server-side.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rust_decimal::Decimal;

use crate::cart::models::CartItem;
use crate::cart::ops;
use crate::checkout::models::CustomerInfo;
use crate::money::format_price;

// Everything non-alphanumeric except the characters JS encodeURIComponent
// leaves intact, so existing sellers see byte-identical links.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Render the cart and customer details into the seller-facing message.
pub fn order_summary(items: &[CartItem], customer: &CustomerInfo) -> String {
    let lines: Vec<String> = items
        .iter()
        .map(|item| {
            let subtotal = item.price * Decimal::from(item.quantity);
            format!("- {} x{} = {}", item.name, item.quantity, format_price(subtotal))
        })
        .collect();

    format!(
        "Hola, quiero comprar los siguientes productos:\n\n{}\n\nTotal: {}\n\nCliente: {}\nTeléfono: {}\nEmail: {}\nDirección: {}",
        lines.join("\n"),
        format_price(ops::total_price(items)),
        customer.name,
        customer.phone,
        customer.email.as_deref().unwrap_or_default(),
        customer.address,
    )
}

/// wa.me deep link carrying the message to the seller's number.
pub fn whatsapp_link(seller_phone: &str, message: &str) -> String {
    format!(
        "https://wa.me/{}?text={}",
        seller_phone,
        utf8_percent_encode(message, URI_COMPONENT)
    )
}
