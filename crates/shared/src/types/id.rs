//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `CustomerId` where an `AccountId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(CustomerId, "Unique identifier for a customer.");
typed_id!(
    AccountId,
    "Internal surrogate key of an account (distinct from its account number)."
);
typed_id!(TransactionId, "Unique identifier for a transaction audit record.");
typed_id!(TransferId, "Unique identifier for a transfer record.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(CustomerId::new(), CustomerId::new());
    }

    #[test]
    fn test_id_round_trips_through_string() {
        let id = TransactionId::new();
        let parsed = TransactionId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
        assert_eq!(parsed.into_inner(), id.0);
    }

    #[test]
    fn test_id_serializes_transparently() {
        let uuid = Uuid::nil();
        let json = serde_json::to_string(&AccountId::from_uuid(uuid)).unwrap();
        assert_eq!(json, format!("\"{uuid}\""));
    }

    #[test]
    fn test_invalid_id_rejected() {
        assert!(TransferId::from_str("not-a-uuid").is_err());
    }
}
