// Catalog data source
//
// Read-only PostgREST client for the hosted catalog. Fetches are one-shot
// and awaited: a failure surfaces as `CatalogError` and retrying is left to
// the shopper, never done automatically.

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::models::ProductRecord;

/// Errors from the catalog boundary.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport or decoding failure from the HTTP client
    #[error("catalog request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The catalog answered with a non-success status
    #[error("catalog responded with status {status}")]
    BadStatus { status: u16 },
}

/// Read-only query surface over the product catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// All retail products currently marked available, ordered by name.
    async fn list_products(&self) -> Result<Vec<ProductRecord>, CatalogError>;

    /// A single product by id; `None` when it does not exist.
    async fn fetch_product(&self, id: &str) -> Result<Option<ProductRecord>, CatalogError>;
}

const LIST_SELECT: &str =
    "*,producto_imagenes!inner(url,es_principal),categorias:categoria_id(nombre)";
const DETAIL_SELECT: &str =
    "*,producto_imagenes(url,es_principal),categorias:categoria_id(nombre)";

/// PostgREST client for the hosted Supabase catalog.
pub struct SupabaseCatalog {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseCatalog {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }

    async fn query(&self, params: &[(&str, &str)]) -> Result<Vec<ProductRecord>, CatalogError> {
        let url = format!("{}/rest/v1/productos", self.base_url);
        tracing::debug!("Querying catalog: {} {:?}", url, params);

        let response = self
            .http
            .get(&url)
            .query(params)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::BadStatus {
                status: status.as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl CatalogSource for SupabaseCatalog {
    async fn list_products(&self) -> Result<Vec<ProductRecord>, CatalogError> {
        // The listing only shows retail products that are marked available
        // and have a principal image; ordering matches the storefront.
        self.query(&[
            ("select", LIST_SELECT),
            ("tipo_venta", "eq.detal"),
            ("disponible", "eq.true"),
            ("producto_imagenes.es_principal", "eq.true"),
            ("order", "nombre.asc"),
        ])
        .await
    }

    async fn fetch_product(&self, id: &str) -> Result<Option<ProductRecord>, CatalogError> {
        let id_filter = format!("eq.{}", id);
        let records = self
            .query(&[
                ("select", DETAIL_SELECT),
                ("id", id_filter.as_str()),
                ("limit", "1"),
            ])
            .await?;

        Ok(records.into_iter().next())
    }
}
