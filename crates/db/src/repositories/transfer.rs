//! Transfer history repository.

use async_trait::async_trait;
use bankly_core::BankResult;
use bankly_core::ledger::Transfer;
use bankly_core::store::TransferLog;
use bankly_shared::types::TransferId;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

use super::convert::storage_error;
use crate::entities::transfers;

/// Two-account transfer records.
#[derive(Debug, Clone)]
pub struct TransferRepository {
    db: DatabaseConnection,
}

impl TransferRepository {
    /// Creates a new transfer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TransferLog for TransferRepository {
    async fn find_by_id(&self, id: TransferId) -> BankResult<Option<Transfer>> {
        let model = transfers::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(storage_error)?;
        Ok(model.map(Transfer::from))
    }

    async fn list_by_account(&self, account_number: &str) -> BankResult<Vec<Transfer>> {
        let models = transfers::Entity::find()
            .filter(
                Condition::any()
                    .add(transfers::Column::SourceAccountNumber.eq(account_number))
                    .add(transfers::Column::TargetAccountNumber.eq(account_number)),
            )
            .order_by_desc(transfers::Column::CreatedAt)
            .order_by_desc(transfers::Column::Id)
            .all(&self.db)
            .await
            .map_err(storage_error)?;
        Ok(models.into_iter().map(Transfer::from).collect())
    }
}
