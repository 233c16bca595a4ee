//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repositories implementing the `bankly-core` storage ports
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    AccountRepository, CustomerRepository, LedgerRepository, TransactionRepository,
    TransferRepository,
};

use std::sync::Arc;
use std::time::Duration;

use bankly_core::Stores;
use bankly_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a pooled connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    Database::connect(options).await
}

/// Backs every core storage port with PostgreSQL.
#[must_use]
pub fn stores(db: &DatabaseConnection) -> Stores {
    Stores {
        ledger: Arc::new(LedgerRepository::new(db.clone())),
        accounts: Arc::new(AccountRepository::new(db.clone())),
        transactions: Arc::new(TransactionRepository::new(db.clone())),
        transfers: Arc::new(TransferRepository::new(db.clone())),
        customers: Arc::new(CustomerRepository::new(db.clone())),
    }
}
