//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod cart;
pub mod catalog;
pub mod order;
pub mod product;
pub mod role;
pub mod session;
pub mod user;
pub mod wishlist;
