//! Account repository.

use async_trait::async_trait;
use bankly_core::ledger::{Account, AccountType, NewAccount};
use bankly_core::store::AccountStore;
use bankly_core::{BankError, BankResult, ResourceKind};
use bankly_shared::types::{AccountId, CustomerId};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use super::convert::{referenced_or_storage, storage_error, unique_or_storage};
use crate::entities::{accounts, transactions, transfers};

/// Account rows.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, account_number: &str) -> BankResult<Option<accounts::Model>> {
        accounts::Entity::find()
            .filter(accounts::Column::AccountNumber.eq(account_number))
            .one(&self.db)
            .await
            .map_err(storage_error)
    }
}

#[async_trait]
impl AccountStore for AccountRepository {
    async fn insert(&self, account: NewAccount) -> BankResult<Account> {
        let now = Utc::now().into();
        let number = account.account_number.clone();
        let model = accounts::ActiveModel {
            id: Set(AccountId::new().into_inner()),
            account_number: Set(account.account_number),
            customer_id: Set(account.customer_id.into_inner()),
            account_type: Set(account.account_type.into()),
            balance: Set(Decimal::ZERO),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            unique_or_storage(e, || {
                BankError::Conflict(format!("account number {number} already exists"))
            })
        })?;
        Ok(model.into())
    }

    async fn find_by_number(&self, account_number: &str) -> BankResult<Option<Account>> {
        Ok(self.find_model(account_number).await?.map(Account::from))
    }

    async fn find_by_id(&self, id: AccountId) -> BankResult<Option<Account>> {
        let model = accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(storage_error)?;
        Ok(model.map(Account::from))
    }

    async fn list_by_customer(&self, customer_id: CustomerId) -> BankResult<Vec<Account>> {
        let models = accounts::Entity::find()
            .filter(accounts::Column::CustomerId.eq(customer_id.into_inner()))
            .order_by_asc(accounts::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(storage_error)?;
        Ok(models.into_iter().map(Account::from).collect())
    }

    async fn update(
        &self,
        account_number: &str,
        account_type: AccountType,
    ) -> BankResult<Option<Account>> {
        let Some(model) = self.find_model(account_number).await? else {
            return Ok(None);
        };
        // Only the changed columns are written; balance is left to the ledger.
        let mut active = model.into_active_model();
        active.account_type = Set(account_type.into());
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&self.db).await.map_err(storage_error)?;
        Ok(Some(updated.into()))
    }

    async fn delete(&self, account_number: &str) -> BankResult<bool> {
        let result = accounts::Entity::delete_many()
            .filter(accounts::Column::AccountNumber.eq(account_number))
            .exec(&self.db)
            .await
            .map_err(|e| referenced_or_storage(e, ResourceKind::Account, account_number))?;
        Ok(result.rows_affected > 0)
    }

    async fn has_activity(&self, account_number: &str) -> BankResult<bool> {
        let transaction_count = transactions::Entity::find()
            .filter(transactions::Column::AccountNumber.eq(account_number))
            .count(&self.db)
            .await
            .map_err(storage_error)?;
        if transaction_count > 0 {
            return Ok(true);
        }

        let transfer_count = transfers::Entity::find()
            .filter(
                Condition::any()
                    .add(transfers::Column::SourceAccountNumber.eq(account_number))
                    .add(transfers::Column::TargetAccountNumber.eq(account_number)),
            )
            .count(&self.db)
            .await
            .map_err(storage_error)?;
        Ok(transfer_count > 0)
    }
}
