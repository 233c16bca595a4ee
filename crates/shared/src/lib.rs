//! Shared types, configuration and token handling for Bankly.
//!
//! This crate provides common types used across all other crates:
//! - Money type with decimal precision
//! - Typed IDs for type-safe entity references
//! - Pagination types for list endpoints
//! - Configuration management
//! - JWT issuing/validation and the login token cache

pub mod auth;
pub mod config;
pub mod jwt;
pub mod token_cache;
pub mod types;

pub use auth::Claims;
pub use config::AppConfig;
pub use jwt::{IssuedToken, JwtConfig, JwtError, JwtService};
pub use token_cache::TokenCache;
