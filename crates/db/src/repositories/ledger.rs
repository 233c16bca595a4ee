//! Atomic balance mutations on PostgreSQL.
//!
//! A unit is one database transaction. Accounts are read with
//! `SELECT ... FOR UPDATE`, so concurrent units touching the same account
//! serialize on the row lock. Dropping a unit without committing rolls the
//! transaction back.

use async_trait::async_trait;
use bankly_core::BankResult;
use bankly_core::ledger::{Account, NewTransaction, NewTransfer, Transaction, Transfer};
use bankly_core::store::{LedgerStore, LedgerUnit};
use bankly_shared::types::{TransactionId, TransferId};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};

use super::convert::storage_error;
use crate::entities::{accounts, transactions, transfers};

/// Opens database transactions for the ledger service.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LedgerStore for LedgerRepository {
    async fn begin(&self) -> BankResult<Box<dyn LedgerUnit>> {
        let txn = self.db.begin().await.map_err(storage_error)?;
        Ok(Box::new(DbLedgerUnit { txn }))
    }
}

struct DbLedgerUnit {
    txn: DatabaseTransaction,
}

#[async_trait]
impl LedgerUnit for DbLedgerUnit {
    async fn lock_account(&mut self, account_number: &str) -> BankResult<Option<Account>> {
        let model = accounts::Entity::find()
            .filter(accounts::Column::AccountNumber.eq(account_number))
            .lock_exclusive()
            .one(&self.txn)
            .await
            .map_err(storage_error)?;
        Ok(model.map(Account::from))
    }

    async fn save_account(&mut self, account: &Account) -> BankResult<()> {
        let updated_at: sea_orm::prelude::DateTimeWithTimeZone = account.updated_at.into();
        let result = accounts::Entity::update_many()
            .col_expr(accounts::Column::Balance, Expr::value(account.balance.amount()))
            .col_expr(accounts::Column::UpdatedAt, Expr::value(updated_at))
            .filter(accounts::Column::AccountNumber.eq(account.account_number.as_str()))
            .exec(&self.txn)
            .await
            .map_err(storage_error)?;

        if result.rows_affected != 1 {
            return Err(bankly_core::BankError::Storage(format!(
                "balance update for {} touched {} rows",
                account.account_number, result.rows_affected
            )));
        }
        Ok(())
    }

    async fn append_transaction(&mut self, record: NewTransaction) -> BankResult<Transaction> {
        let model = transactions::ActiveModel {
            id: Set(TransactionId::new().into_inner()),
            account_number: Set(record.account_number),
            transaction_type: Set(record.transaction_type.into()),
            amount: Set(record.amount.amount()),
            notes: Set(record.notes),
            created_at: Set(record.created_at.into()),
        }
        .insert(&self.txn)
        .await
        .map_err(storage_error)?;
        Ok(model.into())
    }

    async fn append_transfer(&mut self, record: NewTransfer) -> BankResult<Transfer> {
        let model = transfers::ActiveModel {
            id: Set(TransferId::new().into_inner()),
            source_account_number: Set(record.source_account_number),
            target_account_number: Set(record.target_account_number),
            amount: Set(record.amount.amount()),
            notes: Set(record.notes),
            created_at: Set(record.created_at.into()),
        }
        .insert(&self.txn)
        .await
        .map_err(storage_error)?;
        Ok(model.into())
    }

    async fn commit(self: Box<Self>) -> BankResult<()> {
        self.txn.commit().await.map_err(storage_error)
    }
}
