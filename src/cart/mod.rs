pub mod handlers;
pub mod models;
pub mod ops;
pub mod store;

pub use handlers::{
    add_cart_item_handler, change_cart_quantity_handler, clear_cart_handler, get_cart_handler,
    remove_cart_item_handler,
};
pub use models::{AddItemRequest, CartItem, CartMutationResponse, CartView, ChangeQuantityRequest};
pub use ops::{CartSignal, NewItem};
pub use store::{CartLedger, KeyValueStore, MemoryStore, RedisStore};
