// HTTP handlers for catalog endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::catalog::models::ProductSummary;
use crate::catalog::query::{category_names, CatalogQuery};
use crate::error::ApiError;

/// Handler for GET /api/products
/// Lists available retail products, filtered and sorted
#[utoipa::path(
    get,
    path = "/api/products",
    params(CatalogQuery),
    responses(
        (status = 200, description = "List of normalized products", body = Vec<ProductSummary>),
        (status = 502, description = "Catalog could not be loaded")
    ),
    tag = "catalog"
)]
pub async fn list_products_handler(
    State(state): State<crate::AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<ProductSummary>>, ApiError> {
    tracing::debug!("Fetching products with {:?}", query);

    let records = state.catalog.list_products().await?;
    let summaries: Vec<ProductSummary> = records.iter().map(|r| r.summarize()).collect();
    let filtered = query.apply(summaries);

    tracing::debug!("Query returned {} products", filtered.len());
    Ok(Json(filtered))
}

/// Handler for GET /api/products/:id
/// Retrieves one product for the detail view
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = ProductSummary),
        (status = 404, description = "Product not found"),
        (status = 502, description = "Catalog could not be loaded")
    ),
    tag = "catalog"
)]
pub async fn get_product_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductSummary>, ApiError> {
    tracing::debug!("Fetching product with id: {}", id);

    let record = state
        .catalog
        .fetch_product(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "Product".to_string(),
            id: id.clone(),
        })?;

    Ok(Json(record.summarize()))
}

/// Handler for GET /api/categories
/// Unique category names for the filter bar
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Sorted unique category names", body = Vec<String>),
        (status = 502, description = "Catalog could not be loaded")
    ),
    tag = "catalog"
)]
pub async fn list_categories_handler(
    State(state): State<crate::AppState>,
) -> Result<Json<Vec<String>>, ApiError> {
    let records = state.catalog.list_products().await?;
    let summaries: Vec<ProductSummary> = records.iter().map(|r| r.summarize()).collect();

    Ok(Json(category_names(&summaries)))
}
