use std::sync::Arc;

use bankly_shared::types::{PageRequest, PageResponse, TransactionId, TransferId};

use crate::error::{BankError, BankResult, ResourceKind};
use crate::ledger::{Transaction, Transfer};
use crate::store::{AccountStore, TransactionLog, TransferLog};

/// Transaction and transfer history.
#[derive(Clone)]
pub struct HistoryService {
    accounts: Arc<dyn AccountStore>,
    transactions: Arc<dyn TransactionLog>,
    transfers: Arc<dyn TransferLog>,
}

impl HistoryService {
    /// Creates a service over the given stores.
    #[must_use]
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        transactions: Arc<dyn TransactionLog>,
        transfers: Arc<dyn TransferLog>,
    ) -> Self {
        Self {
            accounts,
            transactions,
            transfers,
        }
    }

    /// Looks up a transaction by ID.
    ///
    /// # Errors
    ///
    /// `NotFound` if no transaction has that ID.
    pub async fn transaction(&self, id: TransactionId) -> BankResult<Transaction> {
        self.transactions
            .find_by_id(id)
            .await?
            .ok_or_else(|| BankError::not_found(ResourceKind::Transaction, id))
    }

    /// Pages through an account's transactions, newest first.
    ///
    /// # Errors
    ///
    /// `NotFound` if the account does not exist.
    pub async fn transactions_for_account(
        &self,
        account_number: &str,
        page: PageRequest,
    ) -> BankResult<PageResponse<Transaction>> {
        self.ensure_account(account_number).await?;
        let page = page.clamped();
        let total = self.transactions.count_by_account(account_number).await?;
        let data = self
            .transactions
            .list_by_account(account_number, page)
            .await?;
        Ok(PageResponse::new(data, page, total))
    }

    /// Looks up a transfer by ID.
    ///
    /// # Errors
    ///
    /// `NotFound` if no transfer has that ID.
    pub async fn transfer(&self, id: TransferId) -> BankResult<Transfer> {
        self.transfers
            .find_by_id(id)
            .await?
            .ok_or_else(|| BankError::not_found(ResourceKind::Transfer, id))
    }

    /// Lists transfers where the account is source or target, newest first.
    ///
    /// # Errors
    ///
    /// `NotFound` if the account does not exist.
    pub async fn transfers_for_account(&self, account_number: &str) -> BankResult<Vec<Transfer>> {
        self.ensure_account(account_number).await?;
        self.transfers.list_by_account(account_number).await
    }

    async fn ensure_account(&self, account_number: &str) -> BankResult<()> {
        match self.accounts.find_by_number(account_number).await? {
            Some(_) => Ok(()),
            None => Err(BankError::not_found(ResourceKind::Account, account_number)),
        }
    }
}
