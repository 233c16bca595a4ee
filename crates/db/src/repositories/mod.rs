//! Repositories implementing the core storage ports on PostgreSQL.

mod account;
mod convert;
mod customer;
mod ledger;
mod transaction;
mod transfer;

pub use account::AccountRepository;
pub use customer::CustomerRepository;
pub use ledger::LedgerRepository;
pub use transaction::TransactionRepository;
pub use transfer::TransferRepository;
