//! Storage ports.
//!
//! The services in this crate only talk to storage through these traits.
//! `bankly-db` implements them on PostgreSQL; [`MemoryStore`] implements them
//! in-process.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use bankly_shared::types::{AccountId, CustomerId, PageRequest, TransactionId, TransferId};

use crate::error::BankResult;
use crate::ledger::{
    Account, AccountType, Customer, NewAccount, NewCustomer, NewTransaction, NewTransfer,
    Transaction, Transfer,
};

// =============================================================================
// Ledger mutations
// =============================================================================

/// Opens atomic units for balance mutations.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Starts a new unit. Nothing is visible to other callers until
    /// [`LedgerUnit::commit`] succeeds.
    async fn begin(&self) -> BankResult<Box<dyn LedgerUnit>>;
}

/// A single atomic mutation.
///
/// Dropping a unit without committing discards every write made through it.
#[async_trait]
pub trait LedgerUnit: Send {
    /// Loads an account and holds it exclusively until the unit ends.
    async fn lock_account(&mut self, account_number: &str) -> BankResult<Option<Account>>;

    /// Persists the balance of a locked account.
    async fn save_account(&mut self, account: &Account) -> BankResult<()>;

    /// Appends a single-account audit record.
    async fn append_transaction(&mut self, record: NewTransaction) -> BankResult<Transaction>;

    /// Appends a transfer record.
    async fn append_transfer(&mut self, record: NewTransfer) -> BankResult<Transfer>;

    /// Makes every write of this unit durable and visible.
    async fn commit(self: Box<Self>) -> BankResult<()>;
}

// =============================================================================
// Queries and CRUD
// =============================================================================

/// Account rows outside of balance mutations.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Inserts a new account with a zero balance.
    ///
    /// Fails with `BankError::Conflict` if the account number is taken.
    async fn insert(&self, account: NewAccount) -> BankResult<Account>;

    /// Looks up an account by its number.
    async fn find_by_number(&self, account_number: &str) -> BankResult<Option<Account>>;

    /// Looks up an account by its surrogate key.
    async fn find_by_id(&self, id: AccountId) -> BankResult<Option<Account>>;

    /// Lists a customer's accounts ordered by opening time.
    async fn list_by_customer(&self, customer_id: CustomerId) -> BankResult<Vec<Account>>;

    /// Changes the account type. Returns `None` if the account does not exist.
    async fn update(
        &self,
        account_number: &str,
        account_type: AccountType,
    ) -> BankResult<Option<Account>>;

    /// Deletes an account. Returns false if it did not exist.
    ///
    /// Fails with `BankError::Conflict` if audit records reference it.
    async fn delete(&self, account_number: &str) -> BankResult<bool>;

    /// Returns true if any transaction or transfer references the account.
    async fn has_activity(&self, account_number: &str) -> BankResult<bool>;
}

/// Read access to single-account audit records.
#[async_trait]
pub trait TransactionLog: Send + Sync {
    /// Looks up a transaction by ID.
    async fn find_by_id(&self, id: TransactionId) -> BankResult<Option<Transaction>>;

    /// Lists an account's transactions, newest first.
    async fn list_by_account(
        &self,
        account_number: &str,
        page: PageRequest,
    ) -> BankResult<Vec<Transaction>>;

    /// Counts an account's transactions.
    async fn count_by_account(&self, account_number: &str) -> BankResult<u64>;
}

/// Read access to transfer records.
#[async_trait]
pub trait TransferLog: Send + Sync {
    /// Looks up a transfer by ID.
    async fn find_by_id(&self, id: TransferId) -> BankResult<Option<Transfer>>;

    /// Lists transfers where the account is source or target, newest first.
    async fn list_by_account(&self, account_number: &str) -> BankResult<Vec<Transfer>>;
}

/// Registered customers.
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    /// Returns true if the username is registered.
    async fn exists_by_username(&self, username: &str) -> BankResult<bool>;

    /// Looks up a customer by username.
    async fn find_by_username(&self, username: &str) -> BankResult<Option<Customer>>;

    /// Looks up a customer by ID.
    async fn find_by_id(&self, id: CustomerId) -> BankResult<Option<Customer>>;

    /// Inserts a customer.
    ///
    /// Fails with `BankError::UsernameTaken` if the username exists.
    async fn insert(&self, customer: NewCustomer) -> BankResult<Customer>;
}
