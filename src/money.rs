// Price display formatting
// Shared by the cart view and the checkout order summary.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Format an amount the way the storefront displays prices: `$` prefix,
/// dot thousands separators, no decimals for whole amounts, two otherwise.
///
/// Examples: `$80.000`, `$1.234,50`.
pub fn format_price(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let negative = rounded.is_sign_negative();
    let abs = rounded.abs();

    let integral = abs.trunc();
    let cents = ((abs - integral) * Decimal::from(100))
        .round()
        .to_u32()
        .unwrap_or(0);

    let digits = integral.normalize().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push('$');
    out.push_str(&grouped);
    if cents > 0 {
        out.push(',');
        out.push_str(&format!("{:02}", cents));
    }
    out
}
