//! Transaction history repository.

use async_trait::async_trait;
use bankly_core::BankResult;
use bankly_core::ledger::Transaction;
use bankly_core::store::TransactionLog;
use bankly_shared::types::{PageRequest, TransactionId};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use super::convert::storage_error;
use crate::entities::transactions;

/// Single-account audit records.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TransactionLog for TransactionRepository {
    async fn find_by_id(&self, id: TransactionId) -> BankResult<Option<Transaction>> {
        let model = transactions::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(storage_error)?;
        Ok(model.map(Transaction::from))
    }

    async fn list_by_account(
        &self,
        account_number: &str,
        page: PageRequest,
    ) -> BankResult<Vec<Transaction>> {
        let models = transactions::Entity::find()
            .filter(transactions::Column::AccountNumber.eq(account_number))
            .order_by_desc(transactions::Column::CreatedAt)
            .order_by_desc(transactions::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(storage_error)?;
        Ok(models.into_iter().map(Transaction::from).collect())
    }

    async fn count_by_account(&self, account_number: &str) -> BankResult<u64> {
        transactions::Entity::find()
            .filter(transactions::Column::AccountNumber.eq(account_number))
            .count(&self.db)
            .await
            .map_err(storage_error)
    }
}
