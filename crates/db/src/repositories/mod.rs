//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods that
//! accept `&PgPool` as the first argument. Methods that take part in the
//! checkout and cancellation transactions accept `&mut PgConnection` instead,
//! so callers pass `&mut *tx`.

pub mod cart_repo;
pub mod catalog_repo;
pub mod order_repo;
pub mod product_repo;
pub mod role_repo;
pub mod session_repo;
pub mod subcatalog_repo;
pub mod user_repo;
pub mod wishlist_repo;

pub use cart_repo::CartRepo;
pub use catalog_repo::CatalogRepo;
pub use order_repo::OrderRepo;
pub use product_repo::ProductRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use subcatalog_repo::SubcatalogRepo;
pub use user_repo::UserRepo;
pub use wishlist_repo::WishlistRepo;
