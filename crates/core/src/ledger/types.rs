//! Domain types for customers, accounts and their audit trail.

use bankly_shared::types::{AccountId, CustomerId, Money, TransactionId, TransferId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of bank account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Everyday transactional account.
    Checking,
    /// Interest-bearing savings account.
    Savings,
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Checking => write!(f, "checking"),
            Self::Savings => write!(f, "savings"),
        }
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "checking" => Ok(Self::Checking),
            "savings" => Ok(Self::Savings),
            _ => Err(format!("Unknown account type: {s}")),
        }
    }
}

/// Kind of balance mutation recorded by a [`Transaction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Money paid into an account.
    Deposit,
    /// Money taken out of an account.
    Withdraw,
    /// Outgoing leg of a transfer, recorded on the source account.
    Transfer,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deposit => write!(f, "DEPOSIT"),
            Self::Withdraw => write!(f, "WITHDRAW"),
            Self::Transfer => write!(f, "TRANSFER"),
        }
    }
}

/// A registered customer.
#[derive(Clone, PartialEq, Eq)]
pub struct Customer {
    /// Customer ID.
    pub id: CustomerId,
    /// Unique login name.
    pub username: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// Full name.
    pub full_name: String,
    /// Optional email address.
    pub email: Option<String>,
    /// Registration time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for Customer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Customer")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"[hidden]")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Input for persisting a new customer.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    /// Unique login name.
    pub username: String,
    /// Already-hashed password.
    pub password_hash: String,
    /// Full name.
    pub full_name: String,
    /// Optional email address.
    pub email: Option<String>,
}

/// A balance-bearing account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Internal surrogate key.
    pub id: AccountId,
    /// Externally visible account number.
    pub account_number: String,
    /// Owning customer.
    pub customer_id: CustomerId,
    /// Checking or savings.
    pub account_type: AccountType,
    /// Current balance. Never negative.
    pub balance: Money,
    /// Opening time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Input for opening a new account. Opening balance is zero.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Pre-generated account number.
    pub account_number: String,
    /// Owning customer.
    pub customer_id: CustomerId,
    /// Checking or savings.
    pub account_type: AccountType,
}

/// Immutable audit record of a single-account balance mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Record ID.
    pub id: TransactionId,
    /// Account the mutation applied to.
    pub account_number: String,
    /// Kind of mutation.
    pub transaction_type: TransactionType,
    /// Positive magnitude of the mutation.
    pub amount: Money,
    /// Free-text notes.
    pub notes: String,
    /// When the mutation was committed.
    pub created_at: DateTime<Utc>,
}

/// A transaction record before the store assigns its ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    /// Account the mutation applied to.
    pub account_number: String,
    /// Kind of mutation.
    pub transaction_type: TransactionType,
    /// Positive magnitude of the mutation.
    pub amount: Money,
    /// Free-text notes.
    pub notes: String,
    /// Mutation time.
    pub created_at: DateTime<Utc>,
}

impl NewTransaction {
    /// Attaches a store-assigned ID.
    #[must_use]
    pub fn with_id(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            account_number: self.account_number,
            transaction_type: self.transaction_type,
            amount: self.amount,
            notes: self.notes,
            created_at: self.created_at,
        }
    }
}

/// Immutable record of money moved between two accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Record ID.
    pub id: TransferId,
    /// Debited account.
    pub source_account_number: String,
    /// Credited account.
    pub target_account_number: String,
    /// Amount moved.
    pub amount: Money,
    /// Free-text notes.
    pub notes: String,
    /// When the transfer was committed.
    pub created_at: DateTime<Utc>,
}

/// A transfer record before the store assigns its ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransfer {
    /// Debited account.
    pub source_account_number: String,
    /// Credited account.
    pub target_account_number: String,
    /// Amount moved.
    pub amount: Money,
    /// Free-text notes.
    pub notes: String,
    /// Transfer time.
    pub created_at: DateTime<Utc>,
}

impl NewTransfer {
    /// Attaches a store-assigned ID.
    #[must_use]
    pub fn with_id(self, id: TransferId) -> Transfer {
        Transfer {
            id,
            source_account_number: self.source_account_number,
            target_account_number: self.target_account_number,
            amount: self.amount,
            notes: self.notes,
            created_at: self.created_at,
        }
    }
}
