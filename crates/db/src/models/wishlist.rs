//! Wishlist membership model.

use serde::Serialize;
use sqlx::FromRow;
use storefront_core::types::{DbId, Timestamp};

/// A row from the `wishlists` table: one (user, product) membership.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WishlistEntry {
    pub id: DbId,
    pub user_id: DbId,
    pub product_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
