//! Request extractors shared by handlers.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`locale::RequestLocale`] -- Resolves the response language for the request.

pub mod auth;
pub mod locale;
pub mod rbac;
