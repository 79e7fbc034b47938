use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/user`. All require auth.
///
/// ```text
/// GET  /               -> me
/// PUT  /profile        -> update_profile
/// PUT  /password       -> change_password
/// POST /set-password   -> set_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(user::me))
        .route("/profile", put(user::update_profile))
        .route("/password", put(user::change_password))
        .route("/set-password", post(user::set_password))
}
