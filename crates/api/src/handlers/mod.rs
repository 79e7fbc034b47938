//! Request handlers.
//!
//! Each submodule provides the async handler functions for one resource.
//! Handlers delegate to the repositories in `storefront_db` (and to
//! [`crate::checkout`] for order placement) and map errors via
//! [`crate::error::AppError`].

pub mod admin;
pub mod auth;
pub mod cart;
pub mod orders;
pub mod shop;
pub mod user;
pub mod wishlist;

use storefront_core::locale::Locale;

use crate::resources::ViewContext;
use crate::state::AppState;

/// View context for a request resolved in `locale`.
pub(crate) fn view_context(state: &AppState, locale: Locale) -> ViewContext<'_> {
    ViewContext {
        locale,
        app_url: &state.config.app_url,
    }
}
