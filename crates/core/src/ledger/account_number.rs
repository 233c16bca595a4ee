//! Account number allocation.

use rand::Rng;

/// Number of decimal digits in an account number.
pub const ACCOUNT_NUMBER_LEN: usize = 12;

/// Generates a random account number. Uniqueness is enforced by the store.
#[must_use]
pub fn generate() -> String {
    let mut rng = rand::rng();
    (0..ACCOUNT_NUMBER_LEN)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

/// Returns true if `candidate` has the shape of an account number.
#[must_use]
pub fn is_well_formed(candidate: &str) -> bool {
    candidate.len() == ACCOUNT_NUMBER_LEN && candidate.bytes().all(|b| b.is_ascii_digit())
}
