//! Password hashing behind the [`CredentialHasher`] port.

mod password;

pub use password::{PasswordError, hash_password, verify_password};

use crate::error::{BankError, BankResult};

/// Hashes and verifies customer passwords.
pub trait CredentialHasher: Send + Sync {
    /// Produces a salted hash of `password`.
    fn hash(&self, password: &str) -> BankResult<String>;

    /// Returns true if `password` matches `hash`.
    fn verify(&self, password: &str, hash: &str) -> BankResult<bool>;
}

/// Argon2id with the crate's default parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> BankResult<String> {
        hash_password(password).map_err(|e| BankError::Internal(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> BankResult<bool> {
        match verify_password(password, hash) {
            Ok(matches) => Ok(matches),
            // A corrupt stored hash can never match.
            Err(PasswordError::InvalidHash) => Ok(false),
            Err(e) => Err(BankError::Internal(e.to_string())),
        }
    }
}
