//! Well-known role name constants.
//!
//! These must match the seed data in `20251216000002_create_users_and_sessions.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_CUSTOMER: &str = "customer";

/// Role id assigned to self-registered and OAuth users.
pub const CUSTOMER_ROLE_ID: i64 = 2;
