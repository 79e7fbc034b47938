//! Route definitions for the public catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::shop;
use crate::state::AppState;

/// Public catalog routes, merged at the `/api/v1` root.
///
/// ```text
/// GET /catalogs              -> list_catalogs
/// GET /catalogs/{slug}       -> get_catalog
/// GET /subcatalogs           -> list_subcatalogs
/// GET /subcatalogs/{slug}    -> get_subcatalog
/// GET /products              -> list_products
/// GET /products/featured     -> featured_products
/// GET /products/{slug}       -> get_product
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/catalogs", get(shop::list_catalogs))
        .route("/catalogs/{slug}", get(shop::get_catalog))
        .route("/subcatalogs", get(shop::list_subcatalogs))
        .route("/subcatalogs/{slug}", get(shop::get_subcatalog))
        .route("/products", get(shop::list_products))
        .route("/products/featured", get(shop::featured_products))
        .route("/products/{slug}", get(shop::get_product))
}
