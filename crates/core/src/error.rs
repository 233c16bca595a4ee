//! Error taxonomy for banking operations.
//!
//! Callers must be able to tell "not found", "precondition violated" and
//! "backend failure" apart, so storage failures get their own variant and are
//! never folded into an empty result.

use bankly_shared::types::{Money, MoneyError};
use thiserror::Error;

use crate::ledger::TransactionType;

/// Result type alias using `BankError`.
pub type BankResult<T> = Result<T, BankError>;

/// Kind of resource a lookup was performed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// A registered customer.
    Customer,
    /// A bank account.
    Account,
    /// A single-account audit record.
    Transaction,
    /// A two-account transfer record.
    Transfer,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "Customer"),
            Self::Account => write!(f, "Account"),
            Self::Transaction => write!(f, "Transaction"),
            Self::Transfer => write!(f, "Transfer"),
        }
    }
}

/// Errors that can occur during banking operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BankError {
    /// A lookup by identifier found nothing.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// The kind of resource requested.
        kind: ResourceKind,
        /// The identifier that was looked up.
        id: String,
    },

    /// The account balance does not cover the requested debit.
    #[error(
        "Insufficient funds in account {account_number} for {operation}: balance {balance}, requested {requested}"
    )]
    InsufficientFunds {
        /// The account that would have been debited.
        account_number: String,
        /// The operation that was attempted.
        operation: TransactionType,
        /// Balance at the time of the check.
        balance: Money,
        /// Amount requested.
        requested: Money,
    },

    /// Registration with a username that already exists.
    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    /// Malformed or missing input.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Unknown username or wrong password.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// The caller does not own the resource.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// The operation conflicts with current state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The backing store failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BankError {
    /// Builds a `NotFound` error.
    pub fn not_found(kind: ResourceKind, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::UsernameTaken(_) => "USERNAME_TAKEN",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Conflict(_) => "CONFLICT",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidArgument(_) => 400,
            Self::InvalidCredentials => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound { .. } => 404,
            Self::UsernameTaken(_) | Self::Conflict(_) => 409,
            Self::InsufficientFunds { .. } => 422,
            Self::Storage(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns true if this error came from the backend rather than the request.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Internal(_))
    }
}

impl From<MoneyError> for BankError {
    fn from(err: MoneyError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

impl From<validator::ValidationErrors> for BankError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::InvalidArgument(errors.to_string())
    }
}
