//! Storefront API server library.
//!
//! Exposes the building blocks (config, state, error handling, checkout,
//! routes) so integration tests and the binary entrypoint can both use them.

pub mod auth;
pub mod checkout;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod resources;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
