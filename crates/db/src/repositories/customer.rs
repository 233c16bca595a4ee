//! Customer repository.

use async_trait::async_trait;
use bankly_core::ledger::{Customer, NewCustomer};
use bankly_core::store::CustomerDirectory;
use bankly_core::{BankError, BankResult};
use bankly_shared::types::CustomerId;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};

use super::convert::{storage_error, unique_or_storage};
use crate::entities::customers;

/// Registered customers.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    db: DatabaseConnection,
}

impl CustomerRepository {
    /// Creates a new customer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CustomerDirectory for CustomerRepository {
    async fn exists_by_username(&self, username: &str) -> BankResult<bool> {
        let count = customers::Entity::find()
            .filter(customers::Column::Username.eq(username))
            .count(&self.db)
            .await
            .map_err(storage_error)?;
        Ok(count > 0)
    }

    async fn find_by_username(&self, username: &str) -> BankResult<Option<Customer>> {
        let model = customers::Entity::find()
            .filter(customers::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(storage_error)?;
        Ok(model.map(Customer::from))
    }

    async fn find_by_id(&self, id: CustomerId) -> BankResult<Option<Customer>> {
        let model = customers::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(storage_error)?;
        Ok(model.map(Customer::from))
    }

    async fn insert(&self, customer: NewCustomer) -> BankResult<Customer> {
        let now = Utc::now().into();
        let username = customer.username.clone();
        let model = customers::ActiveModel {
            id: Set(CustomerId::new().into_inner()),
            username: Set(customer.username),
            password_hash: Set(customer.password_hash),
            full_name: Set(customer.full_name),
            email: Set(customer.email),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|e| unique_or_storage(e, || BankError::UsernameTaken(username)))?;
        Ok(model.into())
    }
}
