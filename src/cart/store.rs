// Cart persistence
//
// `CartLedger` binds the pure cart commands to a key-value store: every
// accepted mutation is re-persisted as a JSON array under the ledger's key.
// Absent or malformed stored state degrades to an empty cart.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use redis::AsyncCommands;
use rust_decimal::Decimal;

use crate::cart::models::CartItem;
use crate::cart::ops::{self, CartSignal, NewItem};

/// Key-value persistence surface for the cart.
///
/// The surface is assumed to be always available: implementations degrade a
/// failed read to "absent" and log a failed write instead of propagating, so
/// cart operations themselves never fail.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: &str);
}

/// In-process store, the default backend and the one used in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    async fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }
}

/// Redis-backed store for deployments where carts must survive restarts
/// or be shared between instances.
pub struct RedisStore {
    manager: redis::aio::ConnectionManager,
}

impl RedisStore {
    pub async fn connect(url: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(url)?;
        let manager = client.get_connection_manager().await?;
        Ok(Self { manager })
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self.manager.clone();
        match conn.get::<_, Option<String>>(key).await {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("Failed to read {} from redis: {}", key, err);
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &str) {
        let mut conn = self.manager.clone();
        if let Err(err) = conn.set::<_, _, ()>(key, value).await {
            tracing::warn!("Failed to write {} to redis: {}", key, err);
        }
    }
}

/// Persisted cart for one shopper session.
pub struct CartLedger {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl CartLedger {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Ledger bound to a shopper session's cart key.
    pub fn for_session(store: Arc<dyn KeyValueStore>, session_id: &str) -> Self {
        Self::new(store, format!("cart:{}", session_id))
    }

    /// Read the persisted line items.
    ///
    /// Absent or corrupt state yields an empty cart rather than an error;
    /// corruption is logged and silently discarded.
    pub async fn load(&self) -> Vec<CartItem> {
        let Some(raw) = self.store.get(&self.key).await else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(err) => {
                tracing::warn!("Discarding malformed cart state at {}: {}", self.key, err);
                Vec::new()
            }
        }
    }

    async fn persist(&self, items: &[CartItem]) {
        match serde_json::to_string(items) {
            Ok(raw) => self.store.set(&self.key, &raw).await,
            Err(err) => tracing::error!("Failed to serialize cart {}: {}", self.key, err),
        }
    }

    /// Add one unit of a product, persisting on acceptance.
    pub async fn add_item(&self, new_item: NewItem) -> CartSignal {
        let mut items = self.load().await;
        let signal = ops::add_item(&mut items, new_item);
        if signal.mutated() {
            self.persist(&items).await;
        }
        signal
    }

    /// Adjust a line item's quantity, persisting on acceptance.
    pub async fn change_quantity(&self, id: &str, delta: i64) -> CartSignal {
        let mut items = self.load().await;
        let signal = ops::change_quantity(&mut items, id, delta);
        if signal.mutated() {
            self.persist(&items).await;
        }
        signal
    }

    /// Remove a line item. Removing an absent id still persists the
    /// unchanged list.
    pub async fn remove_item(&self, id: &str) -> CartSignal {
        let mut items = self.load().await;
        let signal = ops::remove_item(&mut items, id);
        self.persist(&items).await;
        signal
    }

    /// Empty the ledger and persist.
    pub async fn clear(&self) {
        self.persist(&[]).await;
    }

    pub async fn total_quantity(&self) -> u64 {
        ops::total_quantity(&self.load().await)
    }

    pub async fn total_price(&self) -> Decimal {
        ops::total_price(&self.load().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ledger() -> CartLedger {
        CartLedger::for_session(Arc::new(MemoryStore::new()), "test")
    }

    fn perfume(stock: Option<Decimal>) -> NewItem {
        NewItem {
            id: "p1".to_string(),
            name: "Perfume X".to_string(),
            price: dec!(50000),
            image: "img.jpg".to_string(),
            stock_hint: stock,
        }
    }

    #[tokio::test]
    async fn test_empty_store_loads_empty_cart() {
        assert!(ledger().load().await.is_empty());
    }

    #[tokio::test]
    async fn test_mutations_survive_a_reload() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

        let cart = CartLedger::for_session(store.clone(), "s1");
        cart.add_item(perfume(Some(dec!(2)))).await;
        cart.add_item(perfume(Some(dec!(2)))).await;

        // A fresh ledger over the same store sees the persisted state.
        let reloaded = CartLedger::for_session(store, "s1");
        let items = reloaded.load().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].stock_limit, Some(2));
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

        CartLedger::for_session(store.clone(), "a")
            .add_item(perfume(None))
            .await;

        assert!(CartLedger::for_session(store, "b").load().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_state_degrades_to_empty_cart() {
        let store = Arc::new(MemoryStore::new());
        store.set("cart:test", "{not json at all").await;

        let cart = CartLedger::for_session(store, "test");
        assert!(cart.load().await.is_empty());

        // And the cart stays usable afterwards.
        assert_eq!(cart.add_item(perfume(None)).await, CartSignal::Added);
        assert_eq!(cart.total_quantity().await, 1);
    }

    #[tokio::test]
    async fn test_rejected_add_is_not_persisted() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let cart = CartLedger::for_session(store.clone(), "s1");

        cart.add_item(perfume(Some(dec!(1)))).await;
        let rejected = cart.add_item(perfume(Some(dec!(1)))).await;
        assert_eq!(rejected, CartSignal::LimitReached { limit: 1 });

        let items = CartLedger::for_session(store, "s1").load().await;
        assert_eq!(items[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_third_add_rejected_at_limit_of_two() {
        let cart = ledger();
        assert_eq!(cart.add_item(perfume(Some(dec!(2)))).await, CartSignal::Added);
        assert_eq!(cart.add_item(perfume(Some(dec!(2)))).await, CartSignal::Added);
        assert_eq!(
            cart.add_item(perfume(Some(dec!(2)))).await,
            CartSignal::LimitReached { limit: 2 }
        );

        let items = cart.load().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].stock_limit, Some(2));
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let cart = ledger();
        cart.add_item(perfume(None)).await;

        cart.remove_item("missing").await;
        assert_eq!(cart.load().await.len(), 1);

        cart.remove_item("p1").await;
        assert!(cart.load().await.is_empty());

        cart.remove_item("p1").await;
        assert!(cart.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_clear_empties_the_ledger() {
        let cart = ledger();
        cart.add_item(perfume(None)).await;
        cart.clear().await;

        assert!(cart.load().await.is_empty());
        assert_eq!(cart.total_quantity().await, 0);
        assert_eq!(cart.total_price().await, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_totals_over_mixed_items() {
        let cart = ledger();
        cart.add_item(perfume(None)).await;
        cart.add_item(perfume(None)).await;
        cart.add_item(NewItem {
            id: "p2".to_string(),
            name: "Perfume Y".to_string(),
            price: dec!(30000),
            image: String::new(),
            stock_hint: None,
        })
        .await;

        assert_eq!(cart.total_quantity().await, 3);
        assert_eq!(cart.total_price().await, dec!(130000));
    }
}
