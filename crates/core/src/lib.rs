//! Domain rules for the storefront backend.
//!
//! Pure logic only: no database or HTTP types. Shared by `storefront-db`
//! and `storefront-api`.

pub mod cart;
pub mod catalog;
pub mod error;
pub mod locale;
pub mod order;
pub mod roles;
pub mod status;
pub mod types;
