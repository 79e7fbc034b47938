use axum::routing::{get, post};
use axum::Router;

use crate::handlers::wishlist;
use crate::state::AppState;

/// Routes mounted at `/wishlist`. All require auth.
///
/// ```text
/// GET    /                   -> list_wishlist
/// GET    /ids                -> wishlist_ids
/// POST   /{product}          -> toggle
/// DELETE /{product}          -> remove
/// GET    /{product}/check    -> check
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::list_wishlist))
        .route("/ids", get(wishlist::wishlist_ids))
        .route(
            "/{product}",
            post(wishlist::toggle).delete(wishlist::remove),
        )
        .route("/{product}/check", get(wishlist::check))
}
