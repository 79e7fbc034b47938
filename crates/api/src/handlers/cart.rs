//! Shopping cart handlers. Every route acts on the caller's own cart.

use axum::extract::{Path, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storefront_core::cart::{ensure_stock, line_subtotal, CartTotals};
use storefront_core::error::CoreError;
use storefront_core::types::DbId;
use storefront_db::models::cart::{CartLine, OwnedCartItem};
use storefront_db::repositories::{CartRepo, ProductRepo};

use super::view_context;
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::middleware::locale::RequestLocale;
use crate::resources::{ProductView, ViewContext};
use crate::response::MessageResponse;
use crate::state::AppState;

/// Request body for `POST /cart/{product}`.
#[derive(Debug, Default, Deserialize)]
pub struct AddToCartRequest {
    pub quantity: Option<i32>,
}

/// Request body for `PUT /cart/items/{item}`.
#[derive(Debug, Deserialize)]
pub struct UpdateCartItemRequest {
    pub quantity: i32,
}

#[derive(Debug, Serialize)]
pub struct CartLineView {
    /// Cart item id, used by the update and remove routes.
    pub id: DbId,
    pub product: ProductView,
    pub quantity: i32,
    pub subtotal: Decimal,
}

/// Response of `GET /cart`.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub total: Decimal,
    pub items_count: i64,
}

/// Response of cart mutations.
#[derive(Debug, Serialize)]
pub struct CartMutation {
    pub message: &'static str,
    pub items_count: i64,
    pub total: Decimal,
}

#[derive(Debug, Serialize)]
pub struct CartCount {
    pub items_count: i64,
}

/// GET /api/v1/cart
pub async fn show_cart(
    State(state): State<AppState>,
    auth_user: AuthUser,
    RequestLocale(locale): RequestLocale,
) -> AppResult<Json<CartView>> {
    let ctx = view_context(&state, locale);
    let lines = match CartRepo::find_by_user(&state.pool, auth_user.user_id).await? {
        Some(cart) => CartRepo::lines(&state.pool, cart.id).await?,
        None => Vec::new(),
    };
    Ok(Json(cart_view(&lines, &ctx)))
}

/// GET /api/v1/cart/count
pub async fn cart_count(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<CartCount>> {
    let items_count = CartRepo::count_lines(&state.pool, auth_user.user_id).await?;
    Ok(Json(CartCount { items_count }))
}

/// POST /api/v1/cart/{product}
///
/// Add units of a product, merging into the existing line if there is one.
pub async fn add_to_cart(
    State(state): State<AppState>,
    auth_user: AuthUser,
    RequestLocale(locale): RequestLocale,
    Path(product_id): Path<DbId>,
    body: Option<AppJson<AddToCartRequest>>,
) -> AppResult<Json<CartMutation>> {
    let quantity = body.and_then(|AppJson(b)| b.quantity).unwrap_or(1);
    state.config.shop.quantity_bounds.validate(quantity)?;

    let product = ProductRepo::find_active_by_id(&state.pool, product_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Product",
            id: product_id,
        })?;

    let cart = CartRepo::get_or_create(&state.pool, auth_user.user_id).await?;
    let in_cart = CartRepo::find_item_for_product(&state.pool, cart.id, product.id)
        .await?
        .map_or(0, |item| item.quantity);
    ensure_stock(
        product.name().resolve(locale).unwrap_or_default(),
        product.stock,
        in_cart,
        quantity,
    )?;

    let item = CartRepo::add_quantity(&state.pool, cart.id, product.id, quantity).await?;
    tracing::info!(
        user_id = auth_user.user_id,
        product_id,
        quantity = item.quantity,
        "Product added to cart"
    );

    cart_mutation(&state, cart.id, "Product added to cart").await
}

/// PUT /api/v1/cart/items/{item}
///
/// Replace a line's quantity. Stock must cover the new quantity on its own.
pub async fn update_item(
    State(state): State<AppState>,
    auth_user: AuthUser,
    RequestLocale(locale): RequestLocale,
    Path(item_id): Path<DbId>,
    AppJson(input): AppJson<UpdateCartItemRequest>,
) -> AppResult<Json<CartMutation>> {
    state.config.shop.quantity_bounds.validate(input.quantity)?;
    let owned = owned_item(&state, &auth_user, item_id).await?;

    let product = ProductRepo::find_by_id(&state.pool, owned.item.product_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Product",
            id: owned.item.product_id,
        })?;
    ensure_stock(
        product.name().resolve(locale).unwrap_or_default(),
        product.stock,
        0,
        input.quantity,
    )?;

    CartRepo::set_quantity(&state.pool, item_id, input.quantity)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "CartItem",
            id: item_id,
        })?;

    cart_mutation(&state, owned.item.cart_id, "Cart updated").await
}

/// DELETE /api/v1/cart/items/{item}
pub async fn remove_item(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(item_id): Path<DbId>,
) -> AppResult<Json<CartMutation>> {
    let owned = owned_item(&state, &auth_user, item_id).await?;
    CartRepo::remove_item(&state.pool, item_id).await?;
    cart_mutation(&state, owned.item.cart_id, "Item removed from cart").await
}

/// DELETE /api/v1/cart
pub async fn clear_cart(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<MessageResponse>> {
    if let Some(cart) = CartRepo::find_by_user(&state.pool, auth_user.user_id).await? {
        let removed = CartRepo::clear(&state.pool, cart.id).await?;
        tracing::info!(user_id = auth_user.user_id, removed, "Cart cleared");
    }
    Ok(Json(MessageResponse {
        message: "Cart cleared",
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a cart item, rejecting items in someone else's cart with 403.
async fn owned_item(
    state: &AppState,
    auth_user: &AuthUser,
    item_id: DbId,
) -> AppResult<OwnedCartItem> {
    let owned = CartRepo::find_item_with_owner(&state.pool, item_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "CartItem",
            id: item_id,
        })?;
    if owned.owner_id != auth_user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "This cart item belongs to another user".into(),
        )));
    }
    Ok(owned)
}

async fn cart_mutation(
    state: &AppState,
    cart_id: DbId,
    message: &'static str,
) -> AppResult<Json<CartMutation>> {
    let lines = CartRepo::lines(&state.pool, cart_id).await?;
    let totals = totals(&lines);
    Ok(Json(CartMutation {
        message,
        items_count: totals.items_count,
        total: totals.total,
    }))
}

fn totals(lines: &[CartLine]) -> CartTotals {
    CartTotals::from_lines(lines.iter().map(|l| (l.product.price, l.quantity)))
}

fn cart_view(lines: &[CartLine], ctx: &ViewContext<'_>) -> CartView {
    let totals = totals(lines);
    CartView {
        items: lines
            .iter()
            .map(|line| CartLineView {
                id: line.item_id,
                product: ProductView::new(&line.product, ctx),
                quantity: line.quantity,
                subtotal: line_subtotal(line.product.price, line.quantity),
            })
            .collect(),
        total: totals.total,
        items_count: totals.items_count,
    }
}
