//! Wishlist handlers.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use storefront_core::error::CoreError;
use storefront_core::types::DbId;
use storefront_db::repositories::{ProductRepo, WishlistRepo};

use super::view_context;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::locale::RequestLocale;
use crate::resources::{products_with_parents, ProductView};
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct WishlistToggle {
    pub message: &'static str,
    pub in_wishlist: bool,
}

#[derive(Debug, Serialize)]
pub struct WishlistCheck {
    pub in_wishlist: bool,
}

/// GET /api/v1/wishlist
pub async fn list_wishlist(
    State(state): State<AppState>,
    auth_user: AuthUser,
    RequestLocale(locale): RequestLocale,
) -> AppResult<Json<DataResponse<Vec<ProductView>>>> {
    let ctx = view_context(&state, locale);
    let products = WishlistRepo::products(&state.pool, auth_user.user_id).await?;
    let data = products_with_parents(&state.pool, &products, &ctx).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/wishlist/ids
pub async fn wishlist_ids(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<DbId>>>> {
    let data = WishlistRepo::product_ids(&state.pool, auth_user.user_id).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/wishlist/{product}
pub async fn toggle(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(product_id): Path<DbId>,
) -> AppResult<Json<WishlistToggle>> {
    if ProductRepo::find_by_id(&state.pool, product_id).await?.is_none() {
        return Err(CoreError::NotFound {
            entity: "Product",
            id: product_id,
        }
        .into());
    }

    let in_wishlist = WishlistRepo::toggle(&state.pool, auth_user.user_id, product_id).await?;
    let message = if in_wishlist {
        "Added to wishlist"
    } else {
        "Removed from wishlist"
    };
    Ok(Json(WishlistToggle {
        message,
        in_wishlist,
    }))
}

/// GET /api/v1/wishlist/{product}/check
pub async fn check(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(product_id): Path<DbId>,
) -> AppResult<Json<WishlistCheck>> {
    let in_wishlist = WishlistRepo::exists(&state.pool, auth_user.user_id, product_id).await?;
    Ok(Json(WishlistCheck { in_wishlist }))
}

/// DELETE /api/v1/wishlist/{product}
pub async fn remove(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(product_id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    WishlistRepo::remove(&state.pool, auth_user.user_id, product_id).await?;
    Ok(Json(MessageResponse {
        message: "Removed from wishlist",
    }))
}
