pub mod admin;
pub mod auth;
pub mod cart;
pub mod health;
pub mod orders;
pub mod shop;
pub mod user;
pub mod wishlist;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                                          liveness + database check
///
/// /register, /login, /logout                      account entry points
/// /auth/refresh                                    refresh token rotation
/// /auth/google, /auth/google/callback              Google sign-in
///
/// /user                                            current user
/// /user/profile, /user/password, /user/set-password
///
/// /catalogs[/{slug}]                               public catalog tree
/// /subcatalogs[/{slug}]
/// /products, /products/featured, /products/{slug}
///
/// /cart                                            show, clear
/// /cart/count                                      line count
/// /cart/{product}                                  add (POST)
/// /cart/items/{item}                               update, remove
///
/// /orders                                          list, place
/// /orders/{id}                                     show
/// /orders/{id}/cancel                              cancel (POST)
///
/// /wishlist, /wishlist/ids                         list
/// /wishlist/{product}                              toggle, remove
/// /wishlist/{product}/check                        membership
///
/// /admin/catalogs, /admin/subcatalogs, /admin/products   CRUD (admin only)
/// /admin/orders                                    list, status, payment
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        // Registration, login, logout and Google sign-in.
        .merge(auth::router())
        // Account self-service (auth required).
        .nest("/user", user::router())
        // Public catalog browsing.
        .merge(shop::router())
        .nest("/cart", cart::router())
        .nest("/orders", orders::router())
        .nest("/wishlist", wishlist::router())
        .nest("/admin", admin::router())
}
