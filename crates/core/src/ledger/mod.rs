//! Accounts, balance mutations and their audit trail.

pub mod account_number;
pub mod mutation;
pub mod service;
pub mod types;

#[cfg(test)]
mod mutation_props;

pub use mutation::{BalanceChange, MAX_NOTES_LEN, TransferPlan};
pub use service::{LedgerService, MutationReceipt, TransferReceipt};
pub use types::{
    Account, AccountType, Customer, NewAccount, NewCustomer, NewTransaction, NewTransfer,
    Transaction, TransactionType, Transfer,
};
