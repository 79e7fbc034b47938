//! Repository for the `products` table.

use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use storefront_core::types::DbId;

use crate::models::product::{CreateProduct, Product, ProductFilter, ProductSort, UpdateProduct};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, subcatalog_id, name_uz, name_ru, name_eng, slug, \
                        description_uz, description_ru, description_eng, \
                        short_description_uz, short_description_ru, short_description_eng, \
                        price, old_price, sku, stock, image, gallery, \
                        is_active, is_featured, sort_order, created_at, updated_at";

/// The same columns qualified with the `p` alias, for joins.
pub(crate) const P_COLUMNS: &str = "p.id, p.subcatalog_id, p.name_uz, p.name_ru, p.name_eng, p.slug, \
                          p.description_uz, p.description_ru, p.description_eng, \
                          p.short_description_uz, p.short_description_ru, p.short_description_eng, \
                          p.price, p.old_price, p.sku, p.stock, p.image, p.gallery, \
                          p.is_active, p.is_featured, p.sort_order, p.created_at, p.updated_at";

/// Shared WHERE clause of the public listing. Parameters `$1..$6` are bound
/// in the same order for both the page and count queries.
const LISTING_WHERE: &str = "p.is_active
    AND ($1::BIGINT IS NULL OR p.subcatalog_id = $1)
    AND ($2::BIGINT IS NULL OR s.catalog_id = $2)
    AND (NOT $3 OR p.is_featured)
    AND ($4::TEXT IS NULL
         OR p.name_uz ILIKE $4 ESCAPE '\\' OR p.name_ru ILIKE $4 ESCAPE '\\'
         OR p.name_eng ILIKE $4 ESCAPE '\\' OR p.description_uz ILIKE $4 ESCAPE '\\'
         OR p.description_ru ILIKE $4 ESCAPE '\\' OR p.description_eng ILIKE $4 ESCAPE '\\')
    AND ($5::NUMERIC IS NULL OR p.price >= $5)
    AND ($6::NUMERIC IS NULL OR p.price <= $6)";

/// Provides CRUD and stock operations for products.
pub struct ProductRepo;

impl ProductRepo {
    /// Insert a new product. `slug` and `sku` must already be resolved.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProduct,
        slug: &str,
        sku: &str,
    ) -> Result<Product, sqlx::Error> {
        let query = format!(
            "INSERT INTO products
                (subcatalog_id, name_uz, name_ru, name_eng, slug,
                 description_uz, description_ru, description_eng,
                 short_description_uz, short_description_ru, short_description_eng,
                 price, old_price, sku, stock, image, gallery,
                 is_active, is_featured, sort_order)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                     COALESCE($15, 0), $16, COALESCE($17, '[]'::jsonb),
                     COALESCE($18, true), COALESCE($19, false), COALESCE($20, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(input.subcatalog_id)
            .bind(&input.name_uz)
            .bind(&input.name_ru)
            .bind(&input.name_eng)
            .bind(slug)
            .bind(&input.description_uz)
            .bind(&input.description_ru)
            .bind(&input.description_eng)
            .bind(&input.short_description_uz)
            .bind(&input.short_description_ru)
            .bind(&input.short_description_eng)
            .bind(input.price)
            .bind(input.old_price)
            .bind(sku)
            .bind(input.stock)
            .bind(&input.image)
            .bind(input.gallery.as_ref().map(Json))
            .bind(input.is_active)
            .bind(input.is_featured)
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    /// Update a product. Only non-`None` fields in `input` are applied;
    /// `Some(None)` clears a nullable column.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "UPDATE products SET
                subcatalog_id = COALESCE($2, subcatalog_id),
                name_uz = COALESCE($3, name_uz),
                name_ru = COALESCE($4, name_ru),
                name_eng = COALESCE($5, name_eng),
                slug = COALESCE($6, slug),
                description_uz = COALESCE($7, description_uz),
                description_ru = COALESCE($8, description_ru),
                description_eng = COALESCE($9, description_eng),
                short_description_uz = COALESCE($10, short_description_uz),
                short_description_ru = COALESCE($11, short_description_ru),
                short_description_eng = COALESCE($12, short_description_eng),
                price = COALESCE($13, price),
                old_price = CASE WHEN $22 THEN $14 ELSE old_price END,
                sku = CASE WHEN $23 THEN $15 ELSE sku END,
                stock = COALESCE($16, stock),
                image = CASE WHEN $24 THEN $17 ELSE image END,
                gallery = COALESCE($18, gallery),
                is_active = COALESCE($19, is_active),
                is_featured = COALESCE($20, is_featured),
                sort_order = COALESCE($21, sort_order)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(input.subcatalog_id)
            .bind(&input.name_uz)
            .bind(&input.name_ru)
            .bind(&input.name_eng)
            .bind(&input.slug)
            .bind(&input.description_uz)
            .bind(&input.description_ru)
            .bind(&input.description_eng)
            .bind(&input.short_description_uz)
            .bind(&input.short_description_ru)
            .bind(&input.short_description_eng)
            .bind(input.price)
            .bind(input.old_price.flatten())
            .bind(input.sku.as_ref().and_then(Option::as_deref))
            .bind(input.stock)
            .bind(input.image.as_ref().and_then(Option::as_deref))
            .bind(input.gallery.as_ref().map(Json))
            .bind(input.is_active)
            .bind(input.is_featured)
            .bind(input.sort_order)
            .bind(input.old_price.is_some())
            .bind(input.sku.is_some())
            .bind(input.image.is_some())
            .fetch_optional(pool)
            .await
    }

    /// Delete a product. Order item snapshots keep their data with a NULL
    /// `product_id`; cart and wishlist rows cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find a product by ID regardless of its active flag.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a product by ID only if it is active.
    pub async fn find_active_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1 AND is_active");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an active product by slug.
    pub async fn find_active_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE slug = $1 AND is_active");
        sqlx::query_as::<_, Product>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// One page of the public product listing.
    pub async fn list(
        pool: &PgPool,
        filter: &ProductFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {P_COLUMNS}
             FROM products p
             JOIN subcatalogs s ON s.id = p.subcatalog_id
             WHERE {LISTING_WHERE}
             ORDER BY {order}
             LIMIT $7 OFFSET $8",
            order = order_clause(filter),
        );
        let search = search_pattern(filter);
        sqlx::query_as::<_, Product>(&query)
            .bind(filter.subcatalog_id)
            .bind(filter.catalog_id)
            .bind(filter.featured_only)
            .bind(search)
            .bind(filter.min_price)
            .bind(filter.max_price)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total number of products matching `filter`, for pagination.
    pub async fn count(pool: &PgPool, filter: &ProductFilter) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*)
             FROM products p
             JOIN subcatalogs s ON s.id = p.subcatalog_id
             WHERE {LISTING_WHERE}"
        );
        sqlx::query_scalar(&query)
            .bind(filter.subcatalog_id)
            .bind(filter.catalog_id)
            .bind(filter.featured_only)
            .bind(search_pattern(filter))
            .bind(filter.min_price)
            .bind(filter.max_price)
            .fetch_one(pool)
            .await
    }

    /// Active featured products ordered by `sort_order`.
    pub async fn featured(pool: &PgPool, limit: i64) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM products
             WHERE is_active AND is_featured
             ORDER BY sort_order, id
             LIMIT $1"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Other active products from the same subcatalog.
    pub async fn related(
        pool: &PgPool,
        product: &Product,
        limit: i64,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM products
             WHERE subcatalog_id = $1 AND id <> $2 AND is_active
             ORDER BY sort_order, id
             LIMIT $3"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(product.subcatalog_id)
            .bind(product.id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Atomically take `quantity` units out of stock.
    ///
    /// Returns `false` without touching the row when fewer than `quantity`
    /// units are left, so concurrent checkouts can never oversell.
    pub async fn try_decrement_stock(
        conn: &mut PgConnection,
        id: DbId,
        quantity: i32,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE products SET stock = stock - $2 WHERE id = $1 AND stock >= $2")
                .bind(id)
                .bind(quantity)
                .execute(conn)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Put `quantity` units back into stock. Returns `false` when the product
    /// no longer exists.
    pub async fn increment_stock(
        conn: &mut PgConnection,
        id: DbId,
        quantity: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE products SET stock = stock + $2 WHERE id = $1")
            .bind(id)
            .bind(quantity)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Current stock level, if the product exists.
    pub async fn stock(pool: &PgPool, id: DbId) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar("SELECT stock FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

fn search_pattern(filter: &ProductFilter) -> Option<String> {
    filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", escape_like(s)))
}

/// Escape LIKE wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn order_clause(filter: &ProductFilter) -> &'static str {
    match filter.sort {
        ProductSort::Newest => "p.created_at DESC, p.id DESC",
        ProductSort::PriceAsc => "p.price ASC, p.id",
        ProductSort::PriceDesc => "p.price DESC, p.id",
        ProductSort::Name if filter.descending => "p.name_eng DESC, p.id",
        ProductSort::Name => "p.name_eng ASC, p.id",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_search_is_ignored() {
        let filter = ProductFilter {
            search: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(search_pattern(&filter), None);

        let filter = ProductFilter {
            search: Some(" phone ".into()),
            ..Default::default()
        };
        assert_eq!(search_pattern(&filter).as_deref(), Some("%phone%"));
    }

    #[test]
    fn search_wildcards_are_literal() {
        let filter = ProductFilter {
            search: Some("50%_off\\".into()),
            ..Default::default()
        };
        assert_eq!(
            search_pattern(&filter).as_deref(),
            Some(r"%50\%\_off\\%")
        );
    }

    #[test]
    fn name_sort_honours_direction() {
        let mut filter = ProductFilter {
            sort: ProductSort::Name,
            ..Default::default()
        };
        assert!(order_clause(&filter).contains("ASC"));
        filter.descending = true;
        assert!(order_clause(&filter).contains("DESC"));
    }

    #[test]
    fn default_order_is_newest_first() {
        assert!(order_clause(&ProductFilter::default()).starts_with("p.created_at DESC"));
    }
}
