//! In-process implementation of every storage port.
//!
//! All state sits behind one async mutex. A [`LedgerUnit`] holds the owned
//! guard for its whole lifetime and stages its writes, so concurrent units
//! serialize and an uncommitted unit leaves no trace.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use bankly_shared::types::{
    AccountId, CustomerId, Money, PageRequest, TransactionId, TransferId,
};
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{
    AccountStore, CustomerDirectory, LedgerStore, LedgerUnit, TransactionLog, TransferLog,
};
use crate::error::{BankError, BankResult};
use crate::ledger::{
    Account, AccountType, Customer, NewAccount, NewCustomer, NewTransaction, NewTransfer,
    Transaction, Transfer,
};

#[derive(Debug, Default)]
struct MemoryState {
    customers: Vec<Customer>,
    accounts: BTreeMap<String, Account>,
    /// Append order is commit order.
    transactions: Vec<Transaction>,
    transfers: Vec<Transfer>,
}

impl MemoryState {
    fn has_activity(&self, account_number: &str) -> bool {
        self.transactions
            .iter()
            .any(|t| t.account_number == account_number)
            || self.transfers.iter().any(|t| {
                t.source_account_number == account_number
                    || t.target_account_number == account_number
            })
    }
}

/// In-memory store. Cloning shares the underlying state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an account with a given balance. Intended for fixtures.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Conflict` if the account number is taken.
    pub async fn seed_account(
        &self,
        account_number: &str,
        customer_id: CustomerId,
        balance: Money,
    ) -> BankResult<Account> {
        let mut state = self.state.lock().await;
        if state.accounts.contains_key(account_number) {
            return Err(duplicate_account(account_number));
        }
        let now = Utc::now();
        let account = Account {
            id: AccountId::new(),
            account_number: account_number.to_string(),
            customer_id,
            account_type: AccountType::Checking,
            balance,
            created_at: now,
            updated_at: now,
        };
        state
            .accounts
            .insert(account.account_number.clone(), account.clone());
        Ok(account)
    }
}

fn duplicate_account(account_number: &str) -> BankError {
    BankError::Conflict(format!("account number {account_number} already exists"))
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn begin(&self) -> BankResult<Box<dyn LedgerUnit>> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        Ok(Box::new(MemoryUnit {
            guard,
            accounts: BTreeMap::new(),
            transactions: Vec::new(),
            transfers: Vec::new(),
        }))
    }
}

/// Staged writes of one in-memory unit.
struct MemoryUnit {
    guard: OwnedMutexGuard<MemoryState>,
    accounts: BTreeMap<String, Account>,
    transactions: Vec<Transaction>,
    transfers: Vec<Transfer>,
}

#[async_trait]
impl LedgerUnit for MemoryUnit {
    async fn lock_account(&mut self, account_number: &str) -> BankResult<Option<Account>> {
        if let Some(staged) = self.accounts.get(account_number) {
            return Ok(Some(staged.clone()));
        }
        Ok(self.guard.accounts.get(account_number).cloned())
    }

    async fn save_account(&mut self, account: &Account) -> BankResult<()> {
        if !self.guard.accounts.contains_key(&account.account_number) {
            return Err(BankError::Storage(format!(
                "account {} vanished during update",
                account.account_number
            )));
        }
        self.accounts
            .insert(account.account_number.clone(), account.clone());
        Ok(())
    }

    async fn append_transaction(&mut self, record: NewTransaction) -> BankResult<Transaction> {
        let transaction = record.with_id(TransactionId::new());
        self.transactions.push(transaction.clone());
        Ok(transaction)
    }

    async fn append_transfer(&mut self, record: NewTransfer) -> BankResult<Transfer> {
        let transfer = record.with_id(TransferId::new());
        self.transfers.push(transfer.clone());
        Ok(transfer)
    }

    async fn commit(self: Box<Self>) -> BankResult<()> {
        let Self {
            mut guard,
            accounts,
            transactions,
            transfers,
        } = *self;
        guard.accounts.extend(accounts);
        guard.transactions.extend(transactions);
        guard.transfers.extend(transfers);
        Ok(())
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn insert(&self, account: NewAccount) -> BankResult<Account> {
        let mut state = self.state.lock().await;
        if state.accounts.contains_key(&account.account_number) {
            return Err(duplicate_account(&account.account_number));
        }
        let now = Utc::now();
        let created = Account {
            id: AccountId::new(),
            account_number: account.account_number,
            customer_id: account.customer_id,
            account_type: account.account_type,
            balance: Money::ZERO,
            created_at: now,
            updated_at: now,
        };
        state
            .accounts
            .insert(created.account_number.clone(), created.clone());
        Ok(created)
    }

    async fn find_by_number(&self, account_number: &str) -> BankResult<Option<Account>> {
        Ok(self.state.lock().await.accounts.get(account_number).cloned())
    }

    async fn find_by_id(&self, id: AccountId) -> BankResult<Option<Account>> {
        let state = self.state.lock().await;
        Ok(state.accounts.values().find(|a| a.id == id).cloned())
    }

    async fn list_by_customer(&self, customer_id: CustomerId) -> BankResult<Vec<Account>> {
        let state = self.state.lock().await;
        let mut accounts: Vec<Account> = state
            .accounts
            .values()
            .filter(|a| a.customer_id == customer_id)
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(accounts)
    }

    async fn update(
        &self,
        account_number: &str,
        account_type: AccountType,
    ) -> BankResult<Option<Account>> {
        let mut state = self.state.lock().await;
        Ok(state.accounts.get_mut(account_number).map(|account| {
            account.account_type = account_type;
            account.updated_at = Utc::now();
            account.clone()
        }))
    }

    async fn delete(&self, account_number: &str) -> BankResult<bool> {
        let mut state = self.state.lock().await;
        if state.has_activity(account_number) {
            return Err(BankError::Conflict(format!(
                "account {account_number} has transaction history"
            )));
        }
        Ok(state.accounts.remove(account_number).is_some())
    }

    async fn has_activity(&self, account_number: &str) -> BankResult<bool> {
        Ok(self.state.lock().await.has_activity(account_number))
    }
}

#[async_trait]
impl TransactionLog for MemoryStore {
    async fn find_by_id(&self, id: TransactionId) -> BankResult<Option<Transaction>> {
        let state = self.state.lock().await;
        Ok(state.transactions.iter().find(|t| t.id == id).cloned())
    }

    async fn list_by_account(
        &self,
        account_number: &str,
        page: PageRequest,
    ) -> BankResult<Vec<Transaction>> {
        let state = self.state.lock().await;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        Ok(state
            .transactions
            .iter()
            .rev()
            .filter(|t| t.account_number == account_number)
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count_by_account(&self, account_number: &str) -> BankResult<u64> {
        let state = self.state.lock().await;
        let count = state
            .transactions
            .iter()
            .filter(|t| t.account_number == account_number)
            .count();
        Ok(count as u64)
    }
}

#[async_trait]
impl TransferLog for MemoryStore {
    async fn find_by_id(&self, id: TransferId) -> BankResult<Option<Transfer>> {
        let state = self.state.lock().await;
        Ok(state.transfers.iter().find(|t| t.id == id).cloned())
    }

    async fn list_by_account(&self, account_number: &str) -> BankResult<Vec<Transfer>> {
        let state = self.state.lock().await;
        Ok(state
            .transfers
            .iter()
            .rev()
            .filter(|t| {
                t.source_account_number == account_number
                    || t.target_account_number == account_number
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CustomerDirectory for MemoryStore {
    async fn exists_by_username(&self, username: &str) -> BankResult<bool> {
        let state = self.state.lock().await;
        Ok(state.customers.iter().any(|c| c.username == username))
    }

    async fn find_by_username(&self, username: &str) -> BankResult<Option<Customer>> {
        let state = self.state.lock().await;
        Ok(state
            .customers
            .iter()
            .find(|c| c.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: CustomerId) -> BankResult<Option<Customer>> {
        let state = self.state.lock().await;
        Ok(state.customers.iter().find(|c| c.id == id).cloned())
    }

    async fn insert(&self, customer: NewCustomer) -> BankResult<Customer> {
        let mut state = self.state.lock().await;
        if state.customers.iter().any(|c| c.username == customer.username) {
            return Err(BankError::UsernameTaken(customer.username));
        }
        let now = Utc::now();
        let created = Customer {
            id: CustomerId::new(),
            username: customer.username,
            password_hash: customer.password_hash,
            full_name: customer.full_name,
            email: customer.email,
            created_at: now,
            updated_at: now,
        };
        state.customers.push(created.clone());
        Ok(created)
    }
}
