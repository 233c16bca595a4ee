//! Wiring of storage ports into services.

use std::sync::Arc;

use crate::account::AccountService;
use crate::auth::CredentialHasher;
use crate::customer::CustomerService;
use crate::history::HistoryService;
use crate::ledger::LedgerService;
use crate::store::{
    AccountStore, CustomerDirectory, LedgerStore, MemoryStore, TransactionLog, TransferLog,
};

/// One implementation of every storage port.
#[derive(Clone)]
pub struct Stores {
    /// Atomic balance mutations.
    pub ledger: Arc<dyn LedgerStore>,
    /// Account rows.
    pub accounts: Arc<dyn AccountStore>,
    /// Transaction history.
    pub transactions: Arc<dyn TransactionLog>,
    /// Transfer history.
    pub transfers: Arc<dyn TransferLog>,
    /// Registered customers.
    pub customers: Arc<dyn CustomerDirectory>,
}

impl Stores {
    /// Backs every port with the same in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_memory(&MemoryStore::new())
    }

    /// Backs every port with `store`. Clones share state.
    #[must_use]
    pub fn from_memory(store: &MemoryStore) -> Self {
        let shared = Arc::new(store.clone());
        Self {
            ledger: shared.clone(),
            accounts: shared.clone(),
            transactions: shared.clone(),
            transfers: shared.clone(),
            customers: shared,
        }
    }
}

/// All services of the bank, sharing one set of stores.
#[derive(Clone)]
pub struct Bank {
    /// Deposits, withdrawals, transfers.
    pub ledger: LedgerService,
    /// Account lifecycle and ownership checks.
    pub accounts: AccountService,
    /// Registration and login.
    pub customers: CustomerService,
    /// Transaction and transfer history.
    pub history: HistoryService,
}

impl Bank {
    /// Builds the services over `stores`.
    #[must_use]
    pub fn new(stores: Stores, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self {
            ledger: LedgerService::new(stores.ledger),
            accounts: AccountService::new(stores.accounts.clone(), stores.customers.clone()),
            customers: CustomerService::new(stores.customers, hasher),
            history: HistoryService::new(stores.accounts, stores.transactions, stores.transfers),
        }
    }
}
