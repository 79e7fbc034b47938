//! Route definitions for the `/admin` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. All require the admin role.
///
/// ```text
/// POST        /catalogs                -> create_catalog
/// PUT, DELETE /catalogs/{id}           -> update_catalog, delete_catalog
/// POST        /subcatalogs             -> create_subcatalog
/// PUT, DELETE /subcatalogs/{id}        -> update_subcatalog, delete_subcatalog
/// POST        /products                -> create_product
/// PUT, DELETE /products/{id}           -> update_product, delete_product
/// GET         /orders                  -> list_orders
/// PUT         /orders/{id}/status      -> update_order_status
/// PUT         /orders/{id}/payment     -> update_order_payment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/catalogs", post(admin::create_catalog))
        .route(
            "/catalogs/{id}",
            put(admin::update_catalog).delete(admin::delete_catalog),
        )
        .route("/subcatalogs", post(admin::create_subcatalog))
        .route(
            "/subcatalogs/{id}",
            put(admin::update_subcatalog).delete(admin::delete_subcatalog),
        )
        .route("/products", post(admin::create_product))
        .route(
            "/products/{id}",
            put(admin::update_product).delete(admin::delete_product),
        )
        .route("/orders", get(admin::list_orders))
        .route("/orders/{id}/status", put(admin::update_order_status))
        .route("/orders/{id}/payment", put(admin::update_order_payment))
}
