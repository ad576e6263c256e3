//! # Actix Middleware Library
//!
//! Middleware components shared by forum Actix services
//!
//! ## Modules
//! - `jwt_auth`: bearer token guard that binds the request to the token subject

pub mod jwt_auth;

pub use jwt_auth::{RejectionRenderer, TokenGuard, TokenRejection, UserId};
