//! Route definitions for authentication.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Authentication routes, merged at the `/api/v1` root.
///
/// ```text
/// POST /register               -> register
/// POST /login                  -> login
/// POST /logout                 -> logout (requires auth)
/// POST /auth/refresh           -> refresh
/// GET  /auth/google            -> google_redirect
/// GET  /auth/google/callback   -> google_callback
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/google", get(auth::google_redirect))
        .route("/auth/google/callback", get(auth::google_callback))
}
