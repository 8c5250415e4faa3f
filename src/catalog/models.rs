// Catalog boundary models
//
// `ProductRecord` mirrors the raw rows the hosted catalog returns, including
// every legacy field alias the data has accumulated over time. `summarize`
// resolves the aliases once, runs the pricing engine and derives
// availability, so the rest of the crate only ever sees the typed
// `ProductSummary`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::pricing::{self, DiscountConfig, DiscountType};

/// Embedded category reference (`categorias:categoria_id (nombre)`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryRef {
    pub nombre: Option<String>,
}

/// Embedded product image row.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductImage {
    pub url: Option<String>,
    #[serde(default)]
    pub es_principal: bool,
}

/// Raw product row from the hosted catalog.
///
/// Field names are the catalog's Spanish column names; the `*_aron` and
/// English variants are older aliases still present on some rows. Alias
/// precedence is resolved in one place, here, never at call sites.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    pub nombre: Option<String>,
    pub name: Option<String>,
    pub descripcion: Option<String>,
    pub description: Option<String>,

    pub precio_aron: Option<Decimal>,
    pub precio: Option<Decimal>,
    pub price: Option<Decimal>,

    pub descuento_valor_aron: Option<Decimal>,
    pub descuento_valor: Option<Decimal>,
    pub descuento: Option<Decimal>,
    pub oferta: Option<Decimal>,
    pub descuento_tipo: Option<String>,
    pub tiene_descuento: Option<bool>,

    /// Stock count; arrives as a number, a numeric string or nothing.
    #[serde(default, deserialize_with = "lenient_number")]
    pub cantidad: Option<Decimal>,
    pub disponible: Option<bool>,
    pub agotado: Option<bool>,

    pub categoria: Option<String>,
    pub category: Option<String>,
    pub categorias: Option<CategoryRef>,

    pub tipo_venta: Option<String>,
    #[serde(default)]
    pub producto_imagenes: Vec<ProductImage>,
}

/// Normalized product shape served to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProductSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub image_url: String,

    #[schema(value_type = f64, example = 100000)]
    pub original_price: Decimal,
    #[schema(value_type = f64, example = 80000)]
    pub final_price: Decimal,
    /// Discount badge percentage, 0 when no discount applies.
    pub discount_percent: u32,
    pub has_discount: bool,

    /// Finite stock count; `None` when the catalog does not track it.
    pub stock: Option<u32>,
    pub in_stock: bool,
    pub sold_out: bool,
    /// Finite stock between 1 and 5 units.
    pub low_stock: bool,

    pub sale_type: Option<String>,
}

impl ProductRecord {
    fn display_name(&self) -> String {
        self.nombre
            .clone()
            .or_else(|| self.name.clone())
            .unwrap_or_else(|| "Producto".to_string())
    }

    fn resolved_description(&self) -> String {
        self.descripcion
            .clone()
            .or_else(|| self.description.clone())
            .unwrap_or_default()
    }

    fn resolved_price(&self) -> Decimal {
        self.precio_aron
            .or(self.precio)
            .or(self.price)
            .unwrap_or(Decimal::ZERO)
    }

    fn resolved_discount_value(&self) -> Decimal {
        self.descuento_valor_aron
            .or(self.descuento_valor)
            .or(self.descuento)
            .or(self.oferta)
            .unwrap_or(Decimal::ZERO)
    }

    fn resolved_category(&self) -> String {
        self.categorias
            .as_ref()
            .and_then(|c| c.nombre.clone())
            .or_else(|| self.categoria.clone())
            .or_else(|| self.category.clone())
            .unwrap_or_default()
    }

    /// Discount configuration for the pricing engine.
    pub fn discount_config(&self) -> DiscountConfig {
        DiscountConfig {
            original_price: self.resolved_price(),
            value: self.resolved_discount_value(),
            kind: DiscountType::parse_lenient(self.descuento_tipo.as_deref()),
            enabled: self.tiene_descuento,
        }
    }

    /// URL of the principal image, falling back to the first one.
    fn main_image_url(&self) -> String {
        self.producto_imagenes
            .iter()
            .find(|img| img.es_principal)
            .or_else(|| self.producto_imagenes.first())
            .and_then(|img| img.url.as_deref())
            .map(clean_image_url)
            .unwrap_or_default()
    }

    /// Normalize the raw record into the typed summary.
    pub fn summarize(&self) -> ProductSummary {
        let pricing = pricing::compute_discount(&self.discount_config());

        let stock = self.cantidad.map(|count| {
            if count <= Decimal::ZERO {
                0
            } else {
                count.floor().to_u32().unwrap_or(u32::MAX)
            }
        });

        let in_stock = self.disponible == Some(true) && stock.map_or(true, |s| s > 0);
        let sold_out = self.agotado == Some(true) || !in_stock;
        let low_stock = !sold_out && stock.is_some_and(|s| (1..=5).contains(&s));

        ProductSummary {
            id: self.id.clone(),
            name: self.display_name(),
            description: self.resolved_description(),
            category: self.resolved_category(),
            image_url: self.main_image_url(),
            original_price: pricing.original_price,
            final_price: pricing.final_price,
            discount_percent: pricing.percent,
            has_discount: pricing.applies,
            stock,
            in_stock,
            sold_out,
            low_stock,
            sale_type: self.tipo_venta.clone(),
        }
    }
}

/// Normalize an image path: encode spaces and strip a leading slash from
/// relative paths; full URLs keep everything but the spaces.
fn clean_image_url(path: &str) -> String {
    if path.starts_with("http") {
        return path.replace(' ', "%20");
    }
    path.trim_start_matches('/').replace(' ', "%20")
}

/// Product ids arrive as strings or bare numbers depending on the table's
/// vintage; both become strings here.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "invalid product id: {}",
            other
        ))),
    }
}

/// Stock counts arrive as numbers or numeric strings; anything else
/// (including an empty string) means "not tracked".
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => {
            n.as_f64().and_then(|f| Decimal::try_from(f).ok())
        }
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
