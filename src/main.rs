pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod money;
pub mod pricing;
pub mod validation;

use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use cart::store::{KeyValueStore, MemoryStore, RedisStore};
use catalog::source::{CatalogSource, SupabaseCatalog};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        catalog::handlers::list_products_handler,
        catalog::handlers::get_product_handler,
        catalog::handlers::list_categories_handler,
        cart::handlers::get_cart_handler,
        cart::handlers::add_cart_item_handler,
        cart::handlers::change_cart_quantity_handler,
        cart::handlers::remove_cart_item_handler,
        cart::handlers::clear_cart_handler,
        checkout::handlers::checkout_handler,
    ),
    components(
        schemas(
            catalog::models::ProductSummary,
            cart::models::CartItem,
            cart::models::AddItemRequest,
            cart::models::ChangeQuantityRequest,
            cart::models::CartView,
            cart::models::CartMutationResponse,
            checkout::models::CustomerInfo,
            checkout::models::CheckoutResponse,
        )
    ),
    tags(
        (name = "catalog", description = "Product catalog endpoints"),
        (name = "cart", description = "Per-session shopping cart endpoints"),
        (name = "checkout", description = "WhatsApp order handoff")
    ),
    info(
        title = "Storefront API",
        version = "1.0.0",
        description = "Backend for the perfume storefront: catalog, pricing, cart and checkout handoff"
    )
)]
struct ApiDoc;

/// Deployment configuration read once at startup.
pub struct Settings {
    /// Seller's WhatsApp number for checkout deep links, digits only.
    pub whatsapp_phone: String,
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogSource>,
    pub cart_store: Arc<dyn KeyValueStore>,
    pub settings: Arc<Settings>,
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS middleware
pub fn create_router(state: AppState) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Catalog routes
        .route("/api/products", get(catalog::handlers::list_products_handler))
        .route("/api/products/:id", get(catalog::handlers::get_product_handler))
        .route("/api/categories", get(catalog::handlers::list_categories_handler))
        // Cart routes
        .route("/api/cart", get(cart::handlers::get_cart_handler))
        .route("/api/cart", delete(cart::handlers::clear_cart_handler))
        .route("/api/cart/items", post(cart::handlers::add_cart_item_handler))
        .route(
            "/api/cart/items/:id",
            patch(cart::handlers::change_cart_quantity_handler),
        )
        .route(
            "/api/cart/items/:id",
            delete(cart::handlers::remove_cart_item_handler),
        )
        // Checkout
        .route("/api/checkout", post(checkout::handlers::checkout_handler))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Storefront API - Starting...");

    // Get configuration from environment variables
    let supabase_url =
        std::env::var("SUPABASE_URL").expect("SUPABASE_URL must be set in environment");
    let supabase_anon_key =
        std::env::var("SUPABASE_ANON_KEY").expect("SUPABASE_ANON_KEY must be set in environment");
    let whatsapp_phone =
        std::env::var("WHATSAPP_PHONE").expect("WHATSAPP_PHONE must be set in environment");
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());

    // Carts live in redis when a URL is configured, otherwise in process
    // memory (lost on restart).
    let cart_store: Arc<dyn KeyValueStore> = match std::env::var("REDIS_URL") {
        Ok(redis_url) => {
            tracing::info!("Connecting to redis...");
            let store = RedisStore::connect(&redis_url)
                .await
                .expect("Failed to connect to redis");
            Arc::new(store)
        }
        Err(_) => {
            tracing::info!("REDIS_URL not set, using in-memory cart store");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState {
        catalog: Arc::new(SupabaseCatalog::new(supabase_url, supabase_anon_key)),
        cart_store,
        settings: Arc::new(Settings { whatsapp_phone }),
    };

    // Create the application router
    let app = create_router(state);

    // Start the Axum server
    let addr = format!("{}:{}", host, port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Storefront API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await.expect("Server error");
}
