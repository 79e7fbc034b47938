//! Cart and cart item models.

use serde::Serialize;
use sqlx::FromRow;
use storefront_core::types::{DbId, Timestamp};

use crate::models::product::Product;

/// A row from the `carts` table. One per user, created lazily.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Cart {
    pub id: DbId,
    pub user_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `cart_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CartItem {
    pub id: DbId,
    pub cart_id: DbId,
    pub product_id: DbId,
    pub quantity: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A cart item together with the id of the user owning its cart.
#[derive(Debug, Clone, FromRow)]
pub struct OwnedCartItem {
    #[sqlx(flatten)]
    pub item: CartItem,
    pub owner_id: DbId,
}

/// A cart line joined with its live product row.
#[derive(Debug, Clone, FromRow)]
pub struct CartLine {
    pub item_id: DbId,
    pub quantity: i32,
    #[sqlx(flatten)]
    pub product: Product,
}
