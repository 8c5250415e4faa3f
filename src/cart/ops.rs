// Cart command handlers
//
// Pure state transitions over the cart's line items. Each command returns a
// `CartSignal` describing the outcome; rejected commands leave the items
// untouched. Persistence and HTTP wiring live in `store` and `handlers`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::cart::models::CartItem;

/// Outcome of a cart command.
///
/// Stock violations are reported as signals with user-facing messages, not
/// as errors; the ledger state is unchanged when a command is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartSignal {
    /// Item added, or an existing line's quantity incremented.
    Added,

    /// Quantity adjusted in place.
    Updated,

    /// The line item was removed from the cart.
    Removed,

    /// Add rejected: the product has no stock at all.
    NoStock,

    /// Rejected: the quantity already sits at the stock ceiling.
    LimitReached { limit: u32 },

    /// The referenced product id is not in the cart; nothing changed.
    NotFound,
}

impl CartSignal {
    /// Whether the command mutated the cart (and must be persisted).
    pub fn mutated(&self) -> bool {
        matches!(
            self,
            CartSignal::Added | CartSignal::Updated | CartSignal::Removed
        )
    }

    /// Whether a stock rule refused the command.
    pub fn rejected(&self) -> bool {
        matches!(self, CartSignal::NoStock | CartSignal::LimitReached { .. })
    }

    /// Notification text shown to the shopper, when there is one.
    pub fn message(&self) -> Option<String> {
        match self {
            CartSignal::Added => Some("Producto agregado al carrito".to_string()),
            CartSignal::NoStock => {
                Some("Este producto no tiene stock disponible".to_string())
            }
            CartSignal::LimitReached { limit } => {
                let units = if *limit == 1 { "unidad" } else { "unidades" };
                Some(format!(
                    "Solo hay {} {} disponibles de este producto",
                    limit, units
                ))
            }
            CartSignal::Updated | CartSignal::Removed | CartSignal::NotFound => None,
        }
    }
}

/// Parameters for adding one unit of a product to the cart.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub image: String,

    /// Raw stock hint from the catalog, not yet normalized.
    pub stock_hint: Option<Decimal>,
}

/// Normalize a raw stock hint.
///
/// Absent values mean the stock is unknown (unbounded); zero or negative
/// values mean no stock at all; anything else is floored to a whole count.
pub fn normalize_stock_limit(hint: Option<Decimal>) -> Option<u32> {
    let value = hint?;
    if value <= Decimal::ZERO {
        return Some(0);
    }
    Some(value.floor().to_u32().unwrap_or(u32::MAX))
}

/// Add one unit of a product, merging into an existing line item.
///
/// A non-null stock hint on a repeated add refreshes the stored ceiling
/// before the limit check: the latest hint is treated as the freshest truth.
pub fn add_item(items: &mut Vec<CartItem>, new_item: NewItem) -> CartSignal {
    let stock_limit = normalize_stock_limit(new_item.stock_hint);

    if stock_limit == Some(0) {
        return CartSignal::NoStock;
    }

    if let Some(existing) = items.iter_mut().find(|item| item.id == new_item.id) {
        // The fresher hint wins over the stored ceiling, but it is only
        // written back once the add is accepted.
        let effective_limit = stock_limit.or(existing.stock_limit);
        if let Some(limit) = effective_limit {
            if existing.quantity >= limit {
                return CartSignal::LimitReached { limit };
            }
        }

        if stock_limit.is_some() {
            existing.stock_limit = stock_limit;
        }
        existing.quantity += 1;
        return CartSignal::Added;
    }

    items.push(CartItem {
        id: new_item.id,
        name: new_item.name,
        price: new_item.price,
        image: new_item.image,
        quantity: 1,
        stock_limit,
    });
    CartSignal::Added
}

/// Adjust a line item's quantity by `delta`.
///
/// Increments that would land above a finite ceiling are rejected;
/// a result at or below zero removes the line item entirely.
pub fn change_quantity(items: &mut Vec<CartItem>, id: &str, delta: i64) -> CartSignal {
    let Some(index) = items.iter().position(|item| item.id == id) else {
        return CartSignal::NotFound;
    };

    let item = &mut items[index];
    let next = i64::from(item.quantity) + delta;
    if delta > 0 {
        if let Some(limit) = item.stock_limit {
            if next > i64::from(limit) {
                return CartSignal::LimitReached { limit };
            }
        }
    }

    if next <= 0 {
        items.remove(index);
        return CartSignal::Removed;
    }

    item.quantity = u32::try_from(next).unwrap_or(u32::MAX);
    CartSignal::Updated
}

/// Remove a line item by id. Removing an absent id is a no-op on the items,
/// but still reports `Removed` so the caller persists the (unchanged) list.
pub fn remove_item(items: &mut Vec<CartItem>, id: &str) -> CartSignal {
    items.retain(|item| item.id != id);
    CartSignal::Removed
}

/// Badge count: sum of all line item quantities.
pub fn total_quantity(items: &[CartItem]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity)).sum()
}

/// Sum of `price * quantity` over all line items.
pub fn total_price(items: &[CartItem]) -> Decimal {
    items
        .iter()
        .map(|item| item.price * Decimal::from(item.quantity))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn perfume(stock: Option<Decimal>) -> NewItem {
        NewItem {
            id: "p1".to_string(),
            name: "Perfume X".to_string(),
            price: dec!(50000),
            image: "img.jpg".to_string(),
            stock_hint: stock,
        }
    }

    #[test]
    fn test_add_creates_line_item_with_quantity_one() {
        let mut items = Vec::new();
        let signal = add_item(&mut items, perfume(None));

        assert_eq!(signal, CartSignal::Added);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 1);
        assert_eq!(items[0].stock_limit, None);
    }

    #[test]
    fn test_repeated_add_merges_into_one_line() {
        let mut items = Vec::new();
        add_item(&mut items, perfume(None));
        add_item(&mut items, perfume(None));

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2);
    }

    #[test]
    fn test_add_with_zero_stock_is_rejected() {
        let mut items = Vec::new();
        let signal = add_item(&mut items, perfume(Some(dec!(0))));

        assert_eq!(signal, CartSignal::NoStock);
        assert!(items.is_empty());
    }

    #[test]
    fn test_add_stops_at_stock_limit() {
        let mut items = Vec::new();
        assert_eq!(add_item(&mut items, perfume(Some(dec!(3)))), CartSignal::Added);
        assert_eq!(add_item(&mut items, perfume(Some(dec!(3)))), CartSignal::Added);
        assert_eq!(add_item(&mut items, perfume(Some(dec!(3)))), CartSignal::Added);
        assert_eq!(items[0].quantity, 3);

        let fourth = add_item(&mut items, perfume(Some(dec!(3))));
        assert_eq!(fourth, CartSignal::LimitReached { limit: 3 });
        assert_eq!(items[0].quantity, 3);
    }

    #[test]
    fn test_later_hint_refreshes_stock_limit() {
        let mut items = Vec::new();
        add_item(&mut items, perfume(Some(dec!(2))));
        add_item(&mut items, perfume(Some(dec!(2))));
        assert_eq!(
            add_item(&mut items, perfume(Some(dec!(2)))),
            CartSignal::LimitReached { limit: 2 }
        );

        // Restock observed: the fresher hint lifts the ceiling.
        assert_eq!(add_item(&mut items, perfume(Some(dec!(5)))), CartSignal::Added);
        assert_eq!(items[0].quantity, 3);
        assert_eq!(items[0].stock_limit, Some(5));
    }

    #[test]
    fn test_add_without_hint_keeps_stored_limit() {
        let mut items = Vec::new();
        add_item(&mut items, perfume(Some(dec!(2))));
        add_item(&mut items, perfume(None));
        assert_eq!(items[0].stock_limit, Some(2));

        let third = add_item(&mut items, perfume(None));
        assert_eq!(third, CartSignal::LimitReached { limit: 2 });
    }

    #[test]
    fn test_normalize_stock_limit() {
        assert_eq!(normalize_stock_limit(None), None);
        assert_eq!(normalize_stock_limit(Some(dec!(0))), Some(0));
        assert_eq!(normalize_stock_limit(Some(dec!(-4))), Some(0));
        assert_eq!(normalize_stock_limit(Some(dec!(2.9))), Some(2));
        assert_eq!(normalize_stock_limit(Some(dec!(7))), Some(7));
    }

    #[test]
    fn test_decrement_to_zero_removes_line_item() {
        let mut items = Vec::new();
        add_item(&mut items, perfume(None));

        let signal = change_quantity(&mut items, "p1", -1);
        assert_eq!(signal, CartSignal::Removed);
        assert!(items.is_empty());
    }

    #[test]
    fn test_increment_at_limit_is_rejected() {
        let mut items = Vec::new();
        add_item(&mut items, perfume(Some(dec!(1))));

        let signal = change_quantity(&mut items, "p1", 1);
        assert_eq!(signal, CartSignal::LimitReached { limit: 1 });
        assert_eq!(items[0].quantity, 1);
    }

    #[test]
    fn test_increment_past_limit_is_rejected() {
        let mut items = Vec::new();
        add_item(&mut items, perfume(Some(dec!(2))));

        // quantity 1, ceiling 2: a +2 step would land at 3.
        let signal = change_quantity(&mut items, "p1", 2);
        assert_eq!(signal, CartSignal::LimitReached { limit: 2 });
        assert_eq!(items[0].quantity, 1);
    }

    #[test]
    fn test_increment_up_to_limit_is_accepted() {
        let mut items = Vec::new();
        add_item(&mut items, perfume(Some(dec!(3))));

        let signal = change_quantity(&mut items, "p1", 2);
        assert_eq!(signal, CartSignal::Updated);
        assert_eq!(items[0].quantity, 3);
    }

    #[test]
    fn test_decrement_ignores_stock_limit() {
        let mut items = Vec::new();
        add_item(&mut items, perfume(Some(dec!(1))));

        let signal = change_quantity(&mut items, "p1", -1);
        assert_eq!(signal, CartSignal::Removed);
    }

    #[test]
    fn test_change_quantity_unknown_id_is_noop() {
        let mut items = Vec::new();
        add_item(&mut items, perfume(None));

        let signal = change_quantity(&mut items, "missing", 1);
        assert_eq!(signal, CartSignal::NotFound);
        assert_eq!(items[0].quantity, 1);
    }

    #[test]
    fn test_remove_absent_id_keeps_length() {
        let mut items = Vec::new();
        add_item(&mut items, perfume(None));

        let signal = remove_item(&mut items, "missing");
        assert_eq!(signal, CartSignal::Removed);
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_totals() {
        let mut items = Vec::new();
        add_item(&mut items, perfume(None));
        add_item(&mut items, perfume(None));
        add_item(
            &mut items,
            NewItem {
                id: "p2".to_string(),
                name: "Perfume Y".to_string(),
                price: dec!(30000),
                image: String::new(),
                stock_hint: None,
            },
        );

        assert_eq!(total_quantity(&items), 3);
        assert_eq!(total_price(&items), dec!(130000));
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut items = Vec::new();
        for id in ["b", "a", "c"] {
            add_item(
                &mut items,
                NewItem {
                    id: id.to_string(),
                    name: id.to_uppercase(),
                    price: dec!(1000),
                    image: String::new(),
                    stock_hint: None,
                },
            );
        }

        let ids: Vec<&str> = items.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_limit_reached_message_singular_and_plural() {
        assert_eq!(
            CartSignal::LimitReached { limit: 1 }.message().unwrap(),
            "Solo hay 1 unidad disponibles de este producto"
        );
        assert_eq!(
            CartSignal::LimitReached { limit: 3 }.message().unwrap(),
            "Solo hay 3 unidades disponibles de este producto"
        );
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    #[derive(Debug, Clone)]
    enum Op {
        Add { id: u8, stock: Option<u32> },
        Change { id: u8, delta: i64 },
        Remove { id: u8 },
    }

    fn any_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..6, proptest::option::of(0u32..10))
                .prop_map(|(id, stock)| Op::Add { id, stock }),
            (0u8..6, -3i64..=3).prop_map(|(id, delta)| Op::Change { id, delta }),
            (0u8..6).prop_map(|id| Op::Remove { id }),
        ]
    }

    fn apply(items: &mut Vec<CartItem>, op: &Op) {
        match op {
            Op::Add { id, stock } => {
                add_item(
                    items,
                    NewItem {
                        id: format!("p{}", id),
                        name: format!("Product {}", id),
                        price: Decimal::from(1000 * u32::from(*id) + 1000),
                        image: String::new(),
                        stock_hint: stock.map(Decimal::from),
                    },
                );
            }
            Op::Change { id, delta } => {
                change_quantity(items, &format!("p{}", id), *delta);
            }
            Op::Remove { id } => {
                remove_item(items, &format!("p{}", id));
            }
        }
    }

    /// After any operation sequence, every surviving line item has a positive
    /// quantity, respects its stock ceiling, and ids stay unique.
    #[test]
    fn prop_invariants_hold_after_any_sequence() {
        proptest!(|(ops in proptest::collection::vec(any_op(), 0..60))| {
            let mut items = Vec::new();
            for op in &ops {
                apply(&mut items, op);
            }

            for item in &items {
                prop_assert!(item.quantity >= 1);
                if let Some(limit) = item.stock_limit {
                    prop_assert!(item.quantity <= limit);
                }
            }

            let mut ids: Vec<&str> = items.iter().map(|item| item.id.as_str()).collect();
            ids.sort_unstable();
            ids.dedup();
            prop_assert_eq!(ids.len(), items.len());
        });
    }

    /// The badge total always equals the sum of line quantities, and the
    /// price total the sum of line subtotals.
    #[test]
    fn prop_totals_match_line_items() {
        proptest!(|(ops in proptest::collection::vec(any_op(), 0..60))| {
            let mut items = Vec::new();
            for op in &ops {
                apply(&mut items, op);
            }

            let expected_quantity: u64 =
                items.iter().map(|item| u64::from(item.quantity)).sum();
            let expected_price: Decimal = items
                .iter()
                .map(|item| item.price * Decimal::from(item.quantity))
                .sum();

            prop_assert_eq!(total_quantity(&items), expected_quantity);
            prop_assert_eq!(total_price(&items), expected_price);
        });
    }

    /// Rejected commands never mutate the cart.
    #[test]
    fn prop_rejected_commands_do_not_mutate() {
        proptest!(|(ops in proptest::collection::vec(any_op(), 0..40), id in 0u8..6, stock in 0u32..5)| {
            let mut items = Vec::new();
            for op in &ops {
                apply(&mut items, op);
            }

            let before = items.clone();
            let signal = add_item(
                &mut items,
                NewItem {
                    id: format!("p{}", id),
                    name: format!("Product {}", id),
                    price: Decimal::from(1000),
                    image: String::new(),
                    stock_hint: Some(Decimal::from(stock)),
                },
            );

            if signal.rejected() {
                prop_assert_eq!(&items, &before);
            }
        });
    }
}
