//! Repository for the `carts` and `cart_items` tables.

use sqlx::{PgConnection, PgExecutor, PgPool};
use storefront_core::types::DbId;

use crate::models::cart::{Cart, CartItem, CartLine, OwnedCartItem};
use crate::repositories::product_repo::P_COLUMNS;

/// Column list shared across queries to avoid repetition.
const CART_COLUMNS: &str = "id, user_id, created_at, updated_at";

/// Column list for `cart_items`.
const ITEM_COLUMNS: &str = "id, cart_id, product_id, quantity, created_at, updated_at";

/// Provides cart and cart line operations.
pub struct CartRepo;

impl CartRepo {
    /// Return the user's cart, creating it on first access.
    pub async fn get_or_create(pool: &PgPool, user_id: DbId) -> Result<Cart, sqlx::Error> {
        let query = format!(
            "INSERT INTO carts (user_id) VALUES ($1)
             ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
             RETURNING {CART_COLUMNS}"
        );
        sqlx::query_as::<_, Cart>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Find the user's cart without creating one.
    pub async fn find_by_user(pool: &PgPool, user_id: DbId) -> Result<Option<Cart>, sqlx::Error> {
        let query = format!("SELECT {CART_COLUMNS} FROM carts WHERE user_id = $1");
        sqlx::query_as::<_, Cart>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Lock the user's cart row for the rest of the transaction, serialising
    /// concurrent checkouts of the same cart.
    pub async fn lock_for_user(
        conn: &mut PgConnection,
        user_id: DbId,
    ) -> Result<Option<Cart>, sqlx::Error> {
        let query = format!("SELECT {CART_COLUMNS} FROM carts WHERE user_id = $1 FOR UPDATE");
        sqlx::query_as::<_, Cart>(&query)
            .bind(user_id)
            .fetch_optional(conn)
            .await
    }

    /// Cart lines joined with their live product rows, oldest line first.
    pub async fn lines<'e>(
        executor: impl PgExecutor<'e>,
        cart_id: DbId,
    ) -> Result<Vec<CartLine>, sqlx::Error> {
        let query = format!(
            "SELECT ci.id AS item_id, ci.quantity, {P_COLUMNS}
             FROM cart_items ci
             JOIN products p ON p.id = ci.product_id
             WHERE ci.cart_id = $1
             ORDER BY ci.created_at, ci.id"
        );
        sqlx::query_as::<_, CartLine>(&query)
            .bind(cart_id)
            .fetch_all(executor)
            .await
    }

    /// Number of lines in the user's cart; zero when no cart exists.
    pub async fn count_lines(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(ci.id)
             FROM carts c
             JOIN cart_items ci ON ci.cart_id = c.id
             WHERE c.user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Find a cart item together with the user owning its cart.
    pub async fn find_item_with_owner(
        pool: &PgPool,
        item_id: DbId,
    ) -> Result<Option<OwnedCartItem>, sqlx::Error> {
        sqlx::query_as::<_, OwnedCartItem>(
            "SELECT ci.id, ci.cart_id, ci.product_id, ci.quantity, ci.created_at, ci.updated_at,
                    c.user_id AS owner_id
             FROM cart_items ci
             JOIN carts c ON c.id = ci.cart_id
             WHERE ci.id = $1",
        )
        .bind(item_id)
        .fetch_optional(pool)
        .await
    }

    /// The line for `product_id` in a cart, if any.
    pub async fn find_item_for_product(
        pool: &PgPool,
        cart_id: DbId,
        product_id: DbId,
    ) -> Result<Option<CartItem>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM cart_items WHERE cart_id = $1 AND product_id = $2"
        );
        sqlx::query_as::<_, CartItem>(&query)
            .bind(cart_id)
            .bind(product_id)
            .fetch_optional(pool)
            .await
    }

    /// Add `quantity` to the product's line, creating the line if needed.
    /// A cart never holds two lines for the same product.
    pub async fn add_quantity(
        pool: &PgPool,
        cart_id: DbId,
        product_id: DbId,
        quantity: i32,
    ) -> Result<CartItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO cart_items (cart_id, product_id, quantity)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_cart_items_cart_product
             DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
             RETURNING {ITEM_COLUMNS}"
        );
        sqlx::query_as::<_, CartItem>(&query)
            .bind(cart_id)
            .bind(product_id)
            .bind(quantity)
            .fetch_one(pool)
            .await
    }

    /// Overwrite a line's quantity.
    pub async fn set_quantity(
        pool: &PgPool,
        item_id: DbId,
        quantity: i32,
    ) -> Result<Option<CartItem>, sqlx::Error> {
        let query = format!(
            "UPDATE cart_items SET quantity = $2 WHERE id = $1 RETURNING {ITEM_COLUMNS}"
        );
        sqlx::query_as::<_, CartItem>(&query)
            .bind(item_id)
            .bind(quantity)
            .fetch_optional(pool)
            .await
    }

    /// Remove one line. Returns `true` if a row was deleted.
    pub async fn remove_item(pool: &PgPool, item_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $1")
            .bind(item_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove every line of a cart, returning how many were deleted.
    pub async fn clear<'e>(
        executor: impl PgExecutor<'e>,
        cart_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
