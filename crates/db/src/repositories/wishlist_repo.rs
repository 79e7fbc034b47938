//! Repository for the `wishlists` table.

use sqlx::PgPool;
use storefront_core::types::DbId;

use crate::models::product::Product;
use crate::repositories::product_repo::P_COLUMNS;

/// Provides wishlist membership operations.
pub struct WishlistRepo;

impl WishlistRepo {
    /// Flip membership of a product. Returns `true` when the product is in
    /// the wishlist afterwards.
    ///
    /// The insert ignores conflicts, so two concurrent toggles never fail
    /// with a unique violation.
    pub async fn toggle(pool: &PgPool, user_id: DbId, product_id: DbId) -> Result<bool, sqlx::Error> {
        if Self::remove(pool, user_id, product_id).await? {
            return Ok(false);
        }
        Self::add(pool, user_id, product_id).await?;
        Ok(true)
    }

    /// Add a product. Returns `true` if a new row was inserted.
    pub async fn add(pool: &PgPool, user_id: DbId, product_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO wishlists (user_id, product_id) VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_wishlists_user_product DO NOTHING",
        )
        .bind(user_id)
        .bind(product_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a product. Returns `true` if a row was deleted.
    pub async fn remove(pool: &PgPool, user_id: DbId, product_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM wishlists WHERE user_id = $1 AND product_id = $2")
            .bind(user_id)
            .bind(product_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn exists(pool: &PgPool, user_id: DbId, product_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM wishlists WHERE user_id = $1 AND product_id = $2)",
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_one(pool)
        .await
    }

    /// Product ids in the user's wishlist, most recently added first.
    pub async fn product_ids(pool: &PgPool, user_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT product_id FROM wishlists WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Products in the user's wishlist, most recently added first.
    pub async fn products(pool: &PgPool, user_id: DbId) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {P_COLUMNS}
             FROM wishlists w
             JOIN products p ON p.id = w.product_id
             WHERE w.user_id = $1
             ORDER BY w.created_at DESC, w.id DESC"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
