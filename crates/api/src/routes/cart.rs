use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::cart;
use crate::state::AppState;

/// Routes mounted at `/cart`. All require auth.
///
/// ```text
/// GET    /               -> show_cart
/// DELETE /               -> clear_cart
/// GET    /count          -> cart_count
/// POST   /{product}      -> add_to_cart
/// PUT    /items/{item}   -> update_item
/// DELETE /items/{item}   -> remove_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show_cart).delete(cart::clear_cart))
        .route("/count", get(cart::cart_count))
        .route("/{product}", post(cart::add_to_cart))
        .route(
            "/items/{item}",
            put(cart::update_item).delete(cart::remove_item),
        )
}
