//! Catalog and subcatalog models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storefront_core::locale::LocalizedText;
use storefront_core::types::{DbId, Timestamp};

/// A row from the `catalogs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Catalog {
    pub id: DbId,
    pub name_uz: String,
    pub name_ru: String,
    pub name_eng: String,
    pub slug: String,
    pub description_uz: Option<String>,
    pub description_ru: Option<String>,
    pub description_eng: Option<String>,
    pub image: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Catalog {
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
}

/// A catalog with the number of its active subcatalogs.
#[derive(Debug, Clone, FromRow)]
pub struct CatalogWithCount {
    #[sqlx(flatten)]
    pub catalog: Catalog,
    pub subcatalogs_count: i64,
}

/// A row from the `subcatalogs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subcatalog {
    pub id: DbId,
    pub catalog_id: DbId,
    pub name_uz: String,
    pub name_ru: String,
    pub name_eng: String,
    pub slug: String,
    pub description_uz: Option<String>,
    pub description_ru: Option<String>,
    pub description_eng: Option<String>,
    pub image: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Subcatalog {
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
}

/// A subcatalog with the number of its active products.
#[derive(Debug, Clone, FromRow)]
pub struct SubcatalogWithCount {
    #[sqlx(flatten)]
    pub subcatalog: Subcatalog,
    pub products_count: i64,
}

/// DTO for creating a catalog. `slug` is filled from the English name when absent.
#[derive(Debug, Deserialize)]
pub struct CreateCatalog {
    pub name_uz: String,
    pub name_ru: String,
    pub name_eng: String,
    pub slug: Option<String>,
    pub description_uz: Option<String>,
    pub description_ru: Option<String>,
    pub description_eng: Option<String>,
    pub image: Option<String>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

/// DTO for updating a catalog. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCatalog {
    pub name_uz: Option<String>,
    pub name_ru: Option<String>,
    pub name_eng: Option<String>,
    pub slug: Option<String>,
    pub description_uz: Option<String>,
    pub description_ru: Option<String>,
    pub description_eng: Option<String>,
    pub image: Option<String>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

/// DTO for creating a subcatalog. `slug` is filled from the English name when absent.
#[derive(Debug, Deserialize)]
pub struct CreateSubcatalog {
    pub catalog_id: DbId,
    pub name_uz: String,
    pub name_ru: String,
    pub name_eng: String,
    pub slug: Option<String>,
    pub description_uz: Option<String>,
    pub description_ru: Option<String>,
    pub description_eng: Option<String>,
    pub image: Option<String>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

/// DTO for updating a subcatalog. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSubcatalog {
    pub catalog_id: Option<DbId>,
    pub name_uz: Option<String>,
    pub name_ru: Option<String>,
    pub name_eng: Option<String>,
    pub slug: Option<String>,
    pub description_uz: Option<String>,
    pub description_ru: Option<String>,
    pub description_eng: Option<String>,
    pub image: Option<String>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}
