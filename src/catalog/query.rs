// In-memory catalog filtering
//
// One shared implementation of the search/category filter and the name sort,
// used by every listing view; per-view differences arrive as query-string
// configuration rather than duplicated logic.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::catalog::models::ProductSummary;

/// Query parameters for GET /api/products.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct CatalogQuery {
    /// Case-insensitive term matched against name, description and category.
    pub search: Option<String>,

    /// Exact category name; absent or "all" disables the filter.
    pub category: Option<String>,
}

impl CatalogQuery {
    fn matches(&self, product: &ProductSummary) -> bool {
        let category_ok = match self.category.as_deref() {
            None | Some("") | Some("all") => true,
            Some(wanted) => product.category == wanted,
        };
        if !category_ok {
            return false;
        }

        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                product.name.to_lowercase().contains(&term)
                    || product.description.to_lowercase().contains(&term)
                    || product.category.to_lowercase().contains(&term)
            }
        }
    }

    /// Filter and sort (by name, case-insensitive) a product list.
    pub fn apply(&self, mut products: Vec<ProductSummary>) -> Vec<ProductSummary> {
        products.retain(|product| self.matches(product));
        products.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        products
    }
}

/// Unique category names across the catalog, sorted, for the filter bar.
pub fn category_names(products: &[ProductSummary]) -> Vec<String> {
    let mut names: Vec<String> = products
        .iter()
        .map(|product| product.category.clone())
        .filter(|category| !category.is_empty())
        .collect();
    names.sort();
    names.dedup();
    names
}
