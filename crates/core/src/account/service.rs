use std::sync::Arc;

use bankly_shared::types::{AccountId, CustomerId};

use crate::error::{BankError, BankResult, ResourceKind};
use crate::ledger::{Account, AccountType, NewAccount, account_number};
use crate::store::{AccountStore, CustomerDirectory};

/// Attempts at drawing an unused account number before giving up.
const OPEN_ATTEMPTS: usize = 5;

/// Account lifecycle and lookups.
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountStore>,
    customers: Arc<dyn CustomerDirectory>,
}

impl AccountService {
    /// Creates a service over the given stores.
    #[must_use]
    pub fn new(accounts: Arc<dyn AccountStore>, customers: Arc<dyn CustomerDirectory>) -> Self {
        Self {
            accounts,
            customers,
        }
    }

    /// Opens a zero-balance account with a freshly generated number.
    ///
    /// # Errors
    ///
    /// `NotFound` if the customer does not exist, `Conflict` if no unused
    /// number could be drawn.
    pub async fn open(
        &self,
        customer_id: CustomerId,
        account_type: AccountType,
    ) -> BankResult<Account> {
        if self.customers.find_by_id(customer_id).await?.is_none() {
            return Err(BankError::not_found(ResourceKind::Customer, customer_id));
        }

        let mut last_err = None;
        for _ in 0..OPEN_ATTEMPTS {
            let candidate = NewAccount {
                account_number: account_number::generate(),
                customer_id,
                account_type,
            };
            match self.accounts.insert(candidate).await {
                Ok(account) => {
                    tracing::info!(
                        account_number = %account.account_number,
                        %customer_id,
                        %account_type,
                        "account opened"
                    );
                    return Ok(account);
                }
                Err(err @ BankError::Conflict(_)) => {
                    tracing::debug!(error = %err, "account number collision, retrying");
                    last_err = Some(err);
                }
                Err(err) => return Err(err),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            BankError::Conflict("could not allocate an account number".to_string())
        }))
    }

    /// Looks up an account by number.
    ///
    /// # Errors
    ///
    /// `NotFound` if no account has that number.
    pub async fn get(&self, account_number: &str) -> BankResult<Account> {
        self.accounts
            .find_by_number(account_number)
            .await?
            .ok_or_else(|| BankError::not_found(ResourceKind::Account, account_number))
    }

    /// Looks up an account by surrogate key.
    ///
    /// # Errors
    ///
    /// `NotFound` if no account has that ID.
    pub async fn get_by_id(&self, id: AccountId) -> BankResult<Account> {
        self.accounts
            .find_by_id(id)
            .await?
            .ok_or_else(|| BankError::not_found(ResourceKind::Account, id))
    }

    /// Lists a customer's accounts. Empty when the customer has none.
    pub async fn list_for_customer(&self, customer_id: CustomerId) -> BankResult<Vec<Account>> {
        self.accounts.list_by_customer(customer_id).await
    }

    /// Lists the accounts of the customer with `username`. Empty when the
    /// username is unknown.
    pub async fn list_for_username(&self, username: &str) -> BankResult<Vec<Account>> {
        match self.customers.find_by_username(username).await? {
            Some(customer) => self.accounts.list_by_customer(customer.id).await,
            None => Ok(Vec::new()),
        }
    }

    /// Loads an account and checks that `customer_id` owns it.
    ///
    /// # Errors
    ///
    /// `NotFound` if the account does not exist, `Forbidden` if it belongs to
    /// another customer.
    pub async fn require_owned(
        &self,
        account_number: &str,
        customer_id: CustomerId,
    ) -> BankResult<Account> {
        let account = self.get(account_number).await?;
        if account.customer_id != customer_id {
            tracing::warn!(account_number, %customer_id, "access to foreign account denied");
            return Err(BankError::Forbidden(format!(
                "account {account_number} belongs to another customer"
            )));
        }
        Ok(account)
    }

    /// Changes the account type.
    ///
    /// # Errors
    ///
    /// `NotFound` if the account does not exist.
    pub async fn update_type(
        &self,
        account_number: &str,
        account_type: AccountType,
    ) -> BankResult<Account> {
        let account = self
            .accounts
            .update(account_number, account_type)
            .await?
            .ok_or_else(|| BankError::not_found(ResourceKind::Account, account_number))?;
        tracing::info!(account_number, %account_type, "account type changed");
        Ok(account)
    }

    /// Deletes an account that has no history.
    ///
    /// # Errors
    ///
    /// `NotFound` if the account does not exist, `Conflict` if any
    /// transaction or transfer references it.
    pub async fn close(&self, account_number: &str) -> BankResult<()> {
        if self.accounts.has_activity(account_number).await? {
            return Err(BankError::Conflict(format!(
                "account {account_number} has transaction history"
            )));
        }
        if !self.accounts.delete(account_number).await? {
            return Err(BankError::not_found(ResourceKind::Account, account_number));
        }
        tracing::info!(account_number, "account closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::LedgerService;
    use crate::ledger::NewCustomer;
    use crate::store::MemoryStore;
    use bankly_shared::types::Money;
    use rust_decimal_macros::dec;

    async fn setup() -> (MemoryStore, AccountService, CustomerId) {
        let store = MemoryStore::new();
        let customer = CustomerDirectory::insert(
            &store,
            NewCustomer {
                username: "alice".into(),
                password_hash: "hash".into(),
                full_name: "Alice Example".into(),
                email: None,
            },
        )
        .await
        .unwrap();
        let service = AccountService::new(Arc::new(store.clone()), Arc::new(store.clone()));
        (store, service, customer.id)
    }

    #[tokio::test]
    async fn test_open_starts_at_zero() {
        let (_, service, owner) = setup().await;

        let account = service.open(owner, AccountType::Savings).await.unwrap();

        assert!(account_number::is_well_formed(&account.account_number));
        assert_eq!(account.balance, Money::ZERO);
        assert_eq!(account.account_type, AccountType::Savings);
        assert_eq!(service.get(&account.account_number).await.unwrap(), account);
        assert_eq!(service.get_by_id(account.id).await.unwrap(), account);
    }

    #[tokio::test]
    async fn test_open_for_unknown_customer_fails() {
        let (_, service, _) = setup().await;
        let err = service
            .open(CustomerId::new(), AccountType::Checking)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BankError::NotFound {
                kind: ResourceKind::Customer,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_get_unknown_number_is_not_found() {
        let (_, service, _) = setup().await;
        assert_eq!(
            service.get("123456789012").await.unwrap_err(),
            BankError::not_found(ResourceKind::Account, "123456789012")
        );
    }

    #[tokio::test]
    async fn test_listing() {
        let (_, service, owner) = setup().await;
        service.open(owner, AccountType::Checking).await.unwrap();
        service.open(owner, AccountType::Savings).await.unwrap();

        assert_eq!(service.list_for_customer(owner).await.unwrap().len(), 2);
        assert_eq!(service.list_for_username("alice").await.unwrap().len(), 2);
        assert!(service.list_for_username("nobody").await.unwrap().is_empty());
        assert!(
            service
                .list_for_customer(CustomerId::new())
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_require_owned() {
        let (_, service, owner) = setup().await;
        let account = service.open(owner, AccountType::Checking).await.unwrap();

        assert!(service.require_owned(&account.account_number, owner).await.is_ok());
        let err = service
            .require_owned(&account.account_number, CustomerId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, BankError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_update_type() {
        let (_, service, owner) = setup().await;
        let account = service.open(owner, AccountType::Checking).await.unwrap();

        let updated = service
            .update_type(&account.account_number, AccountType::Savings)
            .await
            .unwrap();

        assert_eq!(updated.account_type, AccountType::Savings);
        assert_eq!(updated.balance, account.balance);
        assert!(
            service
                .update_type("000000000000", AccountType::Savings)
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_close_refused_with_history() {
        let (store, service, owner) = setup().await;
        let busy = service.open(owner, AccountType::Checking).await.unwrap();
        let idle = service.open(owner, AccountType::Checking).await.unwrap();
        LedgerService::new(Arc::new(store))
            .deposit(&busy.account_number, dec!(1.00), "")
            .await
            .unwrap();

        let err = service.close(&busy.account_number).await.unwrap_err();
        assert!(matches!(err, BankError::Conflict(_)));

        service.close(&idle.account_number).await.unwrap();
        assert!(service.get(&idle.account_number).await.is_err());
        assert!(matches!(
            service.close(&idle.account_number).await.unwrap_err(),
            BankError::NotFound { .. }
        ));
    }
}
