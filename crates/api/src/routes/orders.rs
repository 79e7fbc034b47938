use axum::routing::{get, post};
use axum::Router;

use crate::handlers::orders;
use crate::state::AppState;

/// Routes mounted at `/orders`. All require auth.
///
/// ```text
/// GET  /              -> list_orders
/// POST /              -> create_order
/// GET  /{id}          -> get_order
/// POST /{id}/cancel   -> cancel_order
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list_orders).post(orders::create_order))
        .route("/{id}", get(orders::get_order))
        .route("/{id}/cancel", post(orders::cancel_order))
}
