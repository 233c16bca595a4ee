//! Core banking logic for Bankly.
//!
//! This crate has ZERO web or database dependencies. Storage is reached
//! through the port traits in [`store`]; `bankly-db` implements them on
//! PostgreSQL and [`store::MemoryStore`] implements them in-process.
//!
//! # Modules
//!
//! - `ledger` - Account types, mutation planning and the ledger service
//! - `account` - Account lifecycle and ownership checks
//! - `customer` - Registration and login
//! - `history` - Transaction and transfer history
//! - `auth` - Password hashing
//! - `store` - Storage ports and the in-memory store

pub mod account;
pub mod auth;
pub mod bank;
pub mod customer;
pub mod error;
pub mod history;
pub mod ledger;
pub mod store;

pub use bank::{Bank, Stores};
pub use error::{BankError, BankResult, ResourceKind};
