//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation, validation, and refresh-token helpers.
//! - [`google`] -- Google OAuth code exchange behind a swappable provider trait.

pub mod google;
pub mod jwt;
pub mod password;
