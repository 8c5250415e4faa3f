pub mod handlers;
pub mod models;
pub mod query;
pub mod source;

pub use handlers::{get_product_handler, list_categories_handler, list_products_handler};
pub use models::{ProductRecord, ProductSummary};
pub use query::CatalogQuery;
pub use source::{CatalogError, CatalogSource, SupabaseCatalog};
