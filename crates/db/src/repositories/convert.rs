//! Conversions between `SeaORM` models and core domain types, and `DbErr`
//! classification.

use bankly_core::ledger::{self, Account, Customer, Transaction, Transfer};
use bankly_core::{BankError, ResourceKind};
use bankly_shared::types::{AccountId, CustomerId, Money, TransactionId, TransferId};
use chrono::Utc;
use sea_orm::{DbErr, SqlErr};

use crate::entities::{accounts, customers, sea_orm_active_enums, transactions, transfers};

impl From<sea_orm_active_enums::AccountType> for ledger::AccountType {
    fn from(value: sea_orm_active_enums::AccountType) -> Self {
        match value {
            sea_orm_active_enums::AccountType::Checking => Self::Checking,
            sea_orm_active_enums::AccountType::Savings => Self::Savings,
        }
    }
}

impl From<ledger::AccountType> for sea_orm_active_enums::AccountType {
    fn from(value: ledger::AccountType) -> Self {
        match value {
            ledger::AccountType::Checking => Self::Checking,
            ledger::AccountType::Savings => Self::Savings,
        }
    }
}

impl From<sea_orm_active_enums::TransactionType> for ledger::TransactionType {
    fn from(value: sea_orm_active_enums::TransactionType) -> Self {
        match value {
            sea_orm_active_enums::TransactionType::Deposit => Self::Deposit,
            sea_orm_active_enums::TransactionType::Withdraw => Self::Withdraw,
            sea_orm_active_enums::TransactionType::Transfer => Self::Transfer,
        }
    }
}

impl From<ledger::TransactionType> for sea_orm_active_enums::TransactionType {
    fn from(value: ledger::TransactionType) -> Self {
        match value {
            ledger::TransactionType::Deposit => Self::Deposit,
            ledger::TransactionType::Withdraw => Self::Withdraw,
            ledger::TransactionType::Transfer => Self::Transfer,
        }
    }
}

impl From<customers::Model> for Customer {
    fn from(model: customers::Model) -> Self {
        Self {
            id: CustomerId::from_uuid(model.id),
            username: model.username,
            password_hash: model.password_hash,
            full_name: model.full_name,
            email: model.email,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<accounts::Model> for Account {
    fn from(model: accounts::Model) -> Self {
        Self {
            id: AccountId::from_uuid(model.id),
            account_number: model.account_number,
            customer_id: CustomerId::from_uuid(model.customer_id),
            account_type: model.account_type.into(),
            balance: Money::new(model.balance),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<transactions::Model> for Transaction {
    fn from(model: transactions::Model) -> Self {
        Self {
            id: TransactionId::from_uuid(model.id),
            account_number: model.account_number,
            transaction_type: model.transaction_type.into(),
            amount: Money::new(model.amount),
            notes: model.notes,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<transfers::Model> for Transfer {
    fn from(model: transfers::Model) -> Self {
        Self {
            id: TransferId::from_uuid(model.id),
            source_account_number: model.source_account_number,
            target_account_number: model.target_account_number,
            amount: Money::new(model.amount),
            notes: model.notes,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

/// Wraps a database failure. Logged here so callers only see the variant.
pub(crate) fn storage_error(err: DbErr) -> BankError {
    tracing::error!(error = %err, "database operation failed");
    BankError::Storage(err.to_string())
}

/// Maps a unique-constraint violation to `on_unique`, anything else to
/// `BankError::Storage`.
pub(crate) fn unique_or_storage(err: DbErr, on_unique: impl FnOnce() -> BankError) -> BankError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => on_unique(),
        _ => storage_error(err),
    }
}

/// Maps a foreign-key violation on delete to `BankError::Conflict`.
pub(crate) fn referenced_or_storage(err: DbErr, kind: ResourceKind, id: &str) -> BankError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            BankError::Conflict(format!("{kind} {id} is still referenced"))
        }
        _ => storage_error(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[test]
    fn test_account_model_converts() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let created = offset.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let model = accounts::Model {
            id: Uuid::now_v7(),
            account_number: "000000000042".into(),
            customer_id: Uuid::now_v7(),
            account_type: sea_orm_active_enums::AccountType::Savings,
            balance: dec!(12.3400),
            created_at: created,
            updated_at: created,
        };

        let account = Account::from(model.clone());

        assert_eq!(account.id.into_inner(), model.id);
        assert_eq!(account.account_type, ledger::AccountType::Savings);
        assert_eq!(account.balance, Money::new(dec!(12.34)));
        assert_eq!(account.created_at, created.with_timezone(&Utc));
        assert_eq!(account.balance.to_string(), "12.3400");
    }

    #[test]
    fn test_enum_round_trips() {
        for kind in [
            ledger::TransactionType::Deposit,
            ledger::TransactionType::Withdraw,
            ledger::TransactionType::Transfer,
        ] {
            let db: sea_orm_active_enums::TransactionType = kind.into();
            assert_eq!(ledger::TransactionType::from(db), kind);
        }
        for kind in [ledger::AccountType::Checking, ledger::AccountType::Savings] {
            let db: sea_orm_active_enums::AccountType = kind.into();
            assert_eq!(ledger::AccountType::from(db), kind);
        }
    }

    #[test]
    fn test_non_constraint_errors_are_storage() {
        let err = unique_or_storage(DbErr::Custom("boom".into()), || {
            BankError::UsernameTaken("alice".into())
        });
        assert!(matches!(err, BankError::Storage(_)));

        let err = referenced_or_storage(
            DbErr::Custom("boom".into()),
            ResourceKind::Account,
            "000000000001",
        );
        assert!(matches!(err, BankError::Storage(_)));
    }
}
