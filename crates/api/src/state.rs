use std::sync::Arc;

use crate::auth::google::GoogleIdentityProvider;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: storefront_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Google sign-in provider; `None` when Google credentials are not configured.
    pub google: Option<Arc<dyn GoogleIdentityProvider>>,
}
