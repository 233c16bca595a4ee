//! Deposits, withdrawals and transfers.
//!
//! Every operation runs in one [`LedgerUnit`]: lock the account(s), plan the
//! mutation, persist the new balance(s), append the audit record(s), commit.
//! Any error before `commit` drops the unit and with it every staged write.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;

use super::mutation::{
    self, BalanceChange, TransferPlan, normalize_notes, validate_account_number, validate_amount,
};
use super::types::{Account, Transaction, Transfer};
use crate::error::{BankError, BankResult, ResourceKind};
use crate::store::{LedgerStore, LedgerUnit};

/// Result of a deposit or withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationReceipt {
    /// The account after the mutation.
    pub account: Account,
    /// The appended audit record.
    pub transaction: Transaction,
}

/// Result of a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferReceipt {
    /// Source account after the debit.
    pub source: Account,
    /// Target account after the credit.
    pub target: Account,
    /// Audit record on the source account.
    pub transaction: Transaction,
    /// The transfer record.
    pub transfer: Transfer,
}

/// Balance mutation service.
#[derive(Clone)]
pub struct LedgerService {
    store: Arc<dyn LedgerStore>,
}

impl LedgerService {
    /// Creates a service over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Adds `amount` to the account balance.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a bad amount or notes, `NotFound` for an unknown
    /// account, `Storage` if the store fails.
    #[tracing::instrument(skip(self, notes))]
    pub async fn deposit(
        &self,
        account_number: &str,
        amount: Decimal,
        notes: &str,
    ) -> BankResult<MutationReceipt> {
        validate_account_number("account_number", account_number)?;
        let amount = validate_amount(amount)?;
        let notes = normalize_notes(notes)?;

        let mut unit = self.store.begin().await?;
        let account = lock_existing(unit.as_mut(), account_number).await?;
        let change = mutation::plan_deposit(&account, amount, &notes, Utc::now())?;
        let receipt = apply_change(unit, change).await?;

        tracing::info!(
            account_number,
            balance = %receipt.account.balance,
            transaction_id = %receipt.transaction.id,
            "deposit committed"
        );
        Ok(receipt)
    }

    /// Removes `amount` from the account balance.
    ///
    /// # Errors
    ///
    /// `InsufficientFunds` if the balance is below `amount`; otherwise as
    /// [`Self::deposit`].
    #[tracing::instrument(skip(self, notes))]
    pub async fn withdraw(
        &self,
        account_number: &str,
        amount: Decimal,
        notes: &str,
    ) -> BankResult<MutationReceipt> {
        validate_account_number("account_number", account_number)?;
        let amount = validate_amount(amount)?;
        let notes = normalize_notes(notes)?;

        let mut unit = self.store.begin().await?;
        let account = lock_existing(unit.as_mut(), account_number).await?;
        let change = mutation::plan_withdraw(&account, amount, &notes, Utc::now())
            .inspect_err(|e| tracing::warn!(account_number, error = %e, "withdrawal rejected"))?;
        let receipt = apply_change(unit, change).await?;

        tracing::info!(
            account_number,
            balance = %receipt.account.balance,
            transaction_id = %receipt.transaction.id,
            "withdrawal committed"
        );
        Ok(receipt)
    }

    /// Moves `amount` from `source` to `target`.
    ///
    /// Both accounts are locked in ascending account-number order so two
    /// opposite transfers cannot deadlock.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `source == target`, `NotFound` if either account
    /// is unknown, `InsufficientFunds` if the source balance is below
    /// `amount`, `Storage` if the store fails.
    #[tracing::instrument(skip(self, notes))]
    pub async fn transfer(
        &self,
        source: &str,
        target: &str,
        amount: Decimal,
        notes: &str,
    ) -> BankResult<TransferReceipt> {
        validate_account_number("source_account_number", source)?;
        validate_account_number("target_account_number", target)?;
        let amount = validate_amount(amount)?;
        let notes = normalize_notes(notes)?;
        if source == target {
            return Err(BankError::InvalidArgument(
                "source and target account must differ".to_string(),
            ));
        }

        let mut unit = self.store.begin().await?;
        let (source_account, target_account) = if source < target {
            let s = lock_existing(unit.as_mut(), source).await?;
            let t = lock_existing(unit.as_mut(), target).await?;
            (s, t)
        } else {
            let t = lock_existing(unit.as_mut(), target).await?;
            let s = lock_existing(unit.as_mut(), source).await?;
            (s, t)
        };

        let plan = mutation::plan_transfer(
            &source_account,
            &target_account,
            amount,
            &notes,
            Utc::now(),
        )
        .inspect_err(|e| tracing::warn!(source, target, error = %e, "transfer rejected"))?;
        let receipt = apply_transfer(unit, plan).await?;

        tracing::info!(
            source,
            target,
            transfer_id = %receipt.transfer.id,
            "transfer committed"
        );
        Ok(receipt)
    }
}

async fn lock_existing(unit: &mut dyn LedgerUnit, account_number: &str) -> BankResult<Account> {
    unit.lock_account(account_number)
        .await?
        .ok_or_else(|| BankError::not_found(ResourceKind::Account, account_number))
}

async fn apply_change(
    mut unit: Box<dyn LedgerUnit>,
    change: BalanceChange,
) -> BankResult<MutationReceipt> {
    unit.save_account(&change.account).await?;
    let transaction = unit.append_transaction(change.audit).await?;
    unit.commit().await?;
    Ok(MutationReceipt {
        account: change.account,
        transaction,
    })
}

async fn apply_transfer(
    mut unit: Box<dyn LedgerUnit>,
    plan: TransferPlan,
) -> BankResult<TransferReceipt> {
    unit.save_account(&plan.source).await?;
    unit.save_account(&plan.target).await?;
    let transaction = unit.append_transaction(plan.audit).await?;
    let transfer = unit.append_transfer(plan.transfer).await?;
    unit.commit().await?;
    Ok(TransferReceipt {
        source: plan.source,
        target: plan.target,
        transaction,
        transfer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::TransactionType;
    use crate::store::{AccountStore, MemoryStore, TransactionLog, TransferLog};
    use bankly_shared::types::{CustomerId, Money, PageRequest};
    use rust_decimal_macros::dec;

    const A: &str = "000000000001";
    const B: &str = "000000000002";

    async fn setup(balances: &[(&str, Decimal)]) -> (MemoryStore, LedgerService) {
        let store = MemoryStore::new();
        let owner = CustomerId::new();
        for (number, balance) in balances {
            store
                .seed_account(number, owner, Money::new(*balance))
                .await
                .unwrap();
        }
        let service = LedgerService::new(Arc::new(store.clone()));
        (store, service)
    }

    async fn balance(store: &MemoryStore, number: &str) -> Money {
        AccountStore::find_by_number(store, number)
            .await
            .unwrap()
            .unwrap()
            .balance
    }

    async fn history(store: &MemoryStore, number: &str) -> Vec<Transaction> {
        TransactionLog::list_by_account(store, number, PageRequest::new(1, 100))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_deposit_adds_balance_and_one_record() {
        let (store, service) = setup(&[(A, dec!(100.00))]).await;

        let receipt = service.deposit(A, dec!(25.00), " salary ").await.unwrap();

        assert_eq!(receipt.account.balance, Money::new(dec!(125.00)));
        assert_eq!(balance(&store, A).await, Money::new(dec!(125.00)));
        let records = history(&store, A).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0], receipt.transaction);
        assert_eq!(records[0].transaction_type, TransactionType::Deposit);
        assert_eq!(records[0].amount, Money::new(dec!(25.00)));
        assert_eq!(records[0].notes, "salary");
    }

    #[tokio::test]
    async fn test_withdraw_over_balance_changes_nothing() {
        let (store, service) = setup(&[(A, dec!(100.00))]).await;

        let err = service.withdraw(A, dec!(150.00), "").await.unwrap_err();

        assert!(matches!(
            err,
            BankError::InsufficientFunds {
                operation: TransactionType::Withdraw,
                ..
            }
        ));
        assert_eq!(balance(&store, A).await, Money::new(dec!(100.00)));
        assert!(history(&store, A).await.is_empty());
    }

    #[tokio::test]
    async fn test_deposit_then_withdraw_restores_balance() {
        let (store, service) = setup(&[(A, dec!(42.10))]).await;

        service.deposit(A, dec!(7.90), "").await.unwrap();
        service.withdraw(A, dec!(7.90), "").await.unwrap();

        assert_eq!(balance(&store, A).await, Money::new(dec!(42.10)));
        let kinds: Vec<_> = history(&store, A)
            .await
            .iter()
            .map(|t| t.transaction_type)
            .collect();
        assert_eq!(kinds, vec![TransactionType::Withdraw, TransactionType::Deposit]);
    }

    #[tokio::test]
    async fn test_transfer_moves_funds_and_records_both() {
        let (store, service) = setup(&[(A, dec!(100.00)), (B, dec!(200.00))]).await;

        let receipt = service.transfer(A, B, dec!(99.00), "rent").await.unwrap();

        assert_eq!(balance(&store, A).await, Money::new(dec!(1.00)));
        assert_eq!(balance(&store, B).await, Money::new(dec!(299.00)));
        assert_eq!(receipt.transaction.account_number, A);
        assert_eq!(receipt.transaction.transaction_type, TransactionType::Transfer);
        assert_eq!(history(&store, A).await.len(), 1);
        assert!(history(&store, B).await.is_empty());
        assert_eq!(TransferLog::list_by_account(&store, B).await.unwrap(), vec![
            receipt.transfer
        ]);
    }

    #[tokio::test]
    async fn test_transfer_in_descending_order_works() {
        let (store, service) = setup(&[(A, dec!(10.00)), (B, dec!(10.00))]).await;

        service.transfer(B, A, dec!(4.00), "").await.unwrap();

        assert_eq!(balance(&store, A).await, Money::new(dec!(14.00)));
        assert_eq!(balance(&store, B).await, Money::new(dec!(6.00)));
    }

    #[tokio::test]
    async fn test_transfer_without_funds_changes_nothing() {
        let (store, service) = setup(&[(A, dec!(5.00)), (B, dec!(0))]).await;

        let err = service.transfer(A, B, dec!(5.01), "").await.unwrap_err();

        assert!(matches!(err, BankError::InsufficientFunds { .. }));
        assert_eq!(balance(&store, A).await, Money::new(dec!(5.00)));
        assert_eq!(balance(&store, B).await, Money::ZERO);
        assert!(history(&store, A).await.is_empty());
        assert!(TransferLog::list_by_account(&store, A).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_amounts_beyond_storable_range_rejected() {
        let (store, service) = setup(&[(A, dec!(999999999999990.00)), (B, dec!(20.00))]).await;

        let err = service
            .deposit(B, dec!(10000000000000000), "")
            .await
            .unwrap_err();
        assert!(matches!(err, BankError::InvalidArgument(_)), "{err}");

        let err = service.transfer(B, A, dec!(10.00), "").await.unwrap_err();
        assert!(matches!(err, BankError::InvalidArgument(_)), "{err}");

        assert_eq!(balance(&store, A).await, Money::new(dec!(999999999999990.00)));
        assert_eq!(balance(&store, B).await, Money::new(dec!(20.00)));
        assert!(history(&store, B).await.is_empty());
    }

    #[tokio::test]
    async fn test_transfer_to_self_rejected() {
        let (_, service) = setup(&[(A, dec!(5.00))]).await;
        let err = service.transfer(A, A, dec!(1.00), "").await.unwrap_err();
        assert!(matches!(err, BankError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_unknown_account_is_not_found() {
        let (store, service) = setup(&[(A, dec!(5.00))]).await;

        let err = service.deposit("999999999999", dec!(1.00), "").await.unwrap_err();
        assert_eq!(
            err,
            BankError::not_found(ResourceKind::Account, "999999999999")
        );

        let err = service
            .transfer(A, "999999999999", dec!(1.00), "")
            .await
            .unwrap_err();
        assert!(matches!(err, BankError::NotFound { .. }));
        assert_eq!(balance(&store, A).await, Money::new(dec!(5.00)));
    }

    #[tokio::test]
    async fn test_invalid_amounts_rejected_before_lookup() {
        let (_, service) = setup(&[]).await;
        for amount in [dec!(0), dec!(-3), dec!(1.005)] {
            let err = service.deposit(A, amount, "").await.unwrap_err();
            assert!(matches!(err, BankError::InvalidArgument(_)), "{amount}");
        }
        let err = service.deposit("12", dec!(1), "").await.unwrap_err();
        assert!(matches!(err, BankError::InvalidArgument(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_deposits_sum_exactly() {
        let (store, service) = setup(&[(A, dec!(0))]).await;

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.deposit(A, dec!(1.25), "").await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(balance(&store, A).await, Money::new(dec!(62.50)));
        assert_eq!(store.count_by_account(A).await.unwrap(), 50);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_opposite_transfers_conserve_total() {
        let (store, service) = setup(&[(A, dec!(100)), (B, dec!(100))]).await;

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let service = service.clone();
                let (from, to) = if i % 2 == 0 { (A, B) } else { (B, A) };
                tokio::spawn(async move { service.transfer(from, to, dec!(3), "").await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let total = balance(&store, A)
            .await
            .checked_add(balance(&store, B).await)
            .unwrap();
        assert_eq!(total, Money::new(dec!(200)));
    }
}
