//! Repository for the `catalogs` table.

use sqlx::PgPool;
use storefront_core::types::DbId;

use crate::models::catalog::{Catalog, CatalogWithCount, CreateCatalog, UpdateCatalog};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name_uz, name_ru, name_eng, slug, \
                        description_uz, description_ru, description_eng, \
                        image, is_active, sort_order, created_at, updated_at";

/// The same columns qualified with the `c` alias, for joins.
const C_COLUMNS: &str = "c.id, c.name_uz, c.name_ru, c.name_eng, c.slug, \
                          c.description_uz, c.description_ru, c.description_eng, \
                          c.image, c.is_active, c.sort_order, c.created_at, c.updated_at";

/// Provides CRUD operations for top-level catalogs.
pub struct CatalogRepo;

impl CatalogRepo {
    /// Insert a new catalog. `slug` must already be resolved by the caller.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCatalog,
        slug: &str,
    ) -> Result<Catalog, sqlx::Error> {
        let query = format!(
            "INSERT INTO catalogs
                (name_uz, name_ru, name_eng, slug, description_uz, description_ru,
                 description_eng, image, is_active, sort_order)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, true), COALESCE($10, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Catalog>(&query)
            .bind(&input.name_uz)
            .bind(&input.name_ru)
            .bind(&input.name_eng)
            .bind(slug)
            .bind(&input.description_uz)
            .bind(&input.description_ru)
            .bind(&input.description_eng)
            .bind(&input.image)
            .bind(input.is_active)
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    /// Update a catalog. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCatalog,
    ) -> Result<Option<Catalog>, sqlx::Error> {
        let query = format!(
            "UPDATE catalogs SET
                name_uz = COALESCE($2, name_uz),
                name_ru = COALESCE($3, name_ru),
                name_eng = COALESCE($4, name_eng),
                slug = COALESCE($5, slug),
                description_uz = COALESCE($6, description_uz),
                description_ru = COALESCE($7, description_ru),
                description_eng = COALESCE($8, description_eng),
                image = COALESCE($9, image),
                is_active = COALESCE($10, is_active),
                sort_order = COALESCE($11, sort_order)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Catalog>(&query)
            .bind(id)
            .bind(&input.name_uz)
            .bind(&input.name_ru)
            .bind(&input.name_eng)
            .bind(&input.slug)
            .bind(&input.description_uz)
            .bind(&input.description_ru)
            .bind(&input.description_eng)
            .bind(&input.image)
            .bind(input.is_active)
            .bind(input.sort_order)
            .fetch_optional(pool)
            .await
    }

    /// Delete a catalog with its subcatalogs and products (cascade).
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM catalogs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find a catalog by ID regardless of its active flag.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Catalog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM catalogs WHERE id = $1");
        sqlx::query_as::<_, Catalog>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load several catalogs at once, for nesting into product and
    /// subcatalog responses.
    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Catalog>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM catalogs WHERE id = ANY($1)");
        sqlx::query_as::<_, Catalog>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Active catalogs ordered by `sort_order`, each with the number of its
    /// active subcatalogs.
    pub async fn list_active_with_counts(
        pool: &PgPool,
    ) -> Result<Vec<CatalogWithCount>, sqlx::Error> {
        let query = format!(
            "SELECT {C_COLUMNS},
                    (SELECT COUNT(*) FROM subcatalogs s
                      WHERE s.catalog_id = c.id AND s.is_active) AS subcatalogs_count
             FROM catalogs c
             WHERE c.is_active
             ORDER BY c.sort_order, c.id"
        );
        sqlx::query_as::<_, CatalogWithCount>(&query)
            .fetch_all(pool)
            .await
    }

    /// Find an active catalog by slug. Inactive catalogs are invisible.
    pub async fn find_active_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<Catalog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM catalogs WHERE slug = $1 AND is_active");
        sqlx::query_as::<_, Catalog>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }
}
