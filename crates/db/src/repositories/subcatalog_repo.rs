//! Repository for the `subcatalogs` table.

use sqlx::PgPool;
use storefront_core::types::DbId;

use crate::models::catalog::{
    CreateSubcatalog, Subcatalog, SubcatalogWithCount, UpdateSubcatalog,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, catalog_id, name_uz, name_ru, name_eng, slug, \
                        description_uz, description_ru, description_eng, \
                        image, is_active, sort_order, created_at, updated_at";

/// The same columns qualified with the `s` alias, for joins.
const S_COLUMNS: &str = "s.id, s.catalog_id, s.name_uz, s.name_ru, s.name_eng, s.slug, \
                          s.description_uz, s.description_ru, s.description_eng, \
                          s.image, s.is_active, s.sort_order, s.created_at, s.updated_at";

/// Provides CRUD operations for subcatalogs.
pub struct SubcatalogRepo;

impl SubcatalogRepo {
    /// Insert a new subcatalog. `slug` must already be resolved by the caller.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSubcatalog,
        slug: &str,
    ) -> Result<Subcatalog, sqlx::Error> {
        let query = format!(
            "INSERT INTO subcatalogs
                (catalog_id, name_uz, name_ru, name_eng, slug, description_uz,
                 description_ru, description_eng, image, is_active, sort_order)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, true), COALESCE($11, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subcatalog>(&query)
            .bind(input.catalog_id)
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

    /// Update a subcatalog. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSubcatalog,
    ) -> Result<Option<Subcatalog>, sqlx::Error> {
        let query = format!(
            "UPDATE subcatalogs SET
                catalog_id = COALESCE($2, catalog_id),
                name_uz = COALESCE($3, name_uz),
                name_ru = COALESCE($4, name_ru),
                name_eng = COALESCE($5, name_eng),
                slug = COALESCE($6, slug),
                description_uz = COALESCE($7, description_uz),
                description_ru = COALESCE($8, description_ru),
                description_eng = COALESCE($9, description_eng),
                image = COALESCE($10, image),
                is_active = COALESCE($11, is_active),
                sort_order = COALESCE($12, sort_order)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subcatalog>(&query)
            .bind(id)
            .bind(input.catalog_id)
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

    /// Delete a subcatalog and its products (cascade).
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM subcatalogs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Load several subcatalogs at once, for nesting into product responses.
    pub async fn find_by_ids(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<Subcatalog>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM subcatalogs WHERE id = ANY($1)");
        sqlx::query_as::<_, Subcatalog>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Active subcatalogs by `sort_order` with their active product counts,
    /// optionally limited to one catalog.
    pub async fn list_active(
        pool: &PgPool,
        catalog_id: Option<DbId>,
    ) -> Result<Vec<SubcatalogWithCount>, sqlx::Error> {
        let query = format!(
            "SELECT {S_COLUMNS},
                    (SELECT COUNT(*) FROM products p
                      WHERE p.subcatalog_id = s.id AND p.is_active) AS products_count
             FROM subcatalogs s
             WHERE s.is_active
               AND ($1::BIGINT IS NULL OR s.catalog_id = $1)
             ORDER BY s.sort_order, s.id"
        );
        sqlx::query_as::<_, SubcatalogWithCount>(&query)
            .bind(catalog_id)
            .fetch_all(pool)
            .await
    }

    /// Find an active subcatalog by slug.
    pub async fn find_active_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<Subcatalog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM subcatalogs WHERE slug = $1 AND is_active");
        sqlx::query_as::<_, Subcatalog>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }
}
