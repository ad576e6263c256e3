//! Shared cryptographic helpers for forum services.
//!
//! - `jwt`: shared-secret (HS256) access token signing and validation

pub mod jwt;

pub use jwt::{Claims, JwtError, JwtKeys};
