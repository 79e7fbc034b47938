//! Product model, DTOs and listing filters.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use storefront_core::locale::LocalizedText;
use storefront_core::types::{DbId, Timestamp};

/// A row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub subcatalog_id: DbId,
    pub name_uz: String,
    pub name_ru: String,
    pub name_eng: String,
    pub slug: String,
    pub description_uz: Option<String>,
    pub description_ru: Option<String>,
    pub description_eng: Option<String>,
    pub short_description_uz: Option<String>,
    pub short_description_ru: Option<String>,
    pub short_description_eng: Option<String>,
    pub price: Decimal,
    pub old_price: Option<Decimal>,
    pub sku: Option<String>,
    pub stock: i32,
    pub image: Option<String>,
    /// Image references, stored as a JSONB array of strings.
    pub gallery: Json<Vec<String>>,
    pub is_active: bool,
    pub is_featured: bool,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Product {
    pub fn name(&self) -> LocalizedText {
        LocalizedText::from_columns(Some(&self.name_uz), Some(&self.name_ru), Some(&self.name_eng))
    }

    pub fn description(&self) -> LocalizedText {
        LocalizedText::from_columns(
            self.description_uz.as_deref(),
            self.description_ru.as_deref(),
            self.description_eng.as_deref(),
        )
    }

    pub fn short_description(&self) -> LocalizedText {
        LocalizedText::from_columns(
            self.short_description_uz.as_deref(),
            self.short_description_ru.as_deref(),
            self.short_description_eng.as_deref(),
        )
    }
}

/// DTO for creating a product. `slug` and `sku` are generated when absent.
#[derive(Debug, Deserialize)]
pub struct CreateProduct {
    pub subcatalog_id: DbId,
    pub name_uz: String,
    pub name_ru: String,
    pub name_eng: String,
    pub slug: Option<String>,
    pub description_uz: Option<String>,
    pub description_ru: Option<String>,
    pub description_eng: Option<String>,
    pub short_description_uz: Option<String>,
    pub short_description_ru: Option<String>,
    pub short_description_eng: Option<String>,
    pub price: Decimal,
    pub old_price: Option<Decimal>,
    pub sku: Option<String>,
    pub stock: Option<i32>,
    pub image: Option<String>,
    pub gallery: Option<Vec<String>>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    pub sort_order: Option<i32>,
}

/// DTO for updating a product. All fields are optional.
///
/// `old_price`, `sku` and `image` distinguish an absent key (`None`, keep the
/// stored value) from an explicit `null` (`Some(None)`, clear it).
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProduct {
    pub subcatalog_id: Option<DbId>,
    pub name_uz: Option<String>,
    pub name_ru: Option<String>,
    pub name_eng: Option<String>,
    pub slug: Option<String>,
    pub description_uz: Option<String>,
    pub description_ru: Option<String>,
    pub description_eng: Option<String>,
    pub short_description_uz: Option<String>,
    pub short_description_ru: Option<String>,
    pub short_description_eng: Option<String>,
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "nullable")]
    pub old_price: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "nullable")]
    pub sku: Option<Option<String>>,
    pub stock: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub image: Option<Option<String>>,
    pub gallery: Option<Vec<String>>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    pub sort_order: Option<i32>,
}

/// Deserialize a present key as `Some`, keeping `null` as `Some(None)`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Ordering of product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    /// Newest first.
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    /// English name, direction from [`ProductFilter::descending`].
    Name,
}

/// Filters for the public product listing. `None` fields do not filter.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub catalog_id: Option<DbId>,
    pub subcatalog_id: Option<DbId>,
    pub featured_only: bool,
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub sort: ProductSort,
    pub descending: bool,
}
