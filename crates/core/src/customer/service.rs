use std::sync::Arc;

use bankly_shared::types::CustomerId;
use tokio::sync::OnceCell;
use validator::{Validate, ValidationError};

use crate::auth::CredentialHasher;
use crate::error::{BankError, BankResult, ResourceKind};
use crate::ledger::{Customer, NewCustomer};
use crate::store::CustomerDirectory;

const DECOY_PASSWORD: &str = "decoy-password-never-issued";

/// Input for registering a customer.
#[derive(Clone, Validate)]
pub struct Registration {
    /// Desired login name.
    #[validate(
        length(min = 3, max = 50, message = "username must be 3-50 characters"),
        custom(function = "username_charset")
    )]
    pub username: String,
    /// Plaintext password. Only its hash is stored.
    #[validate(length(min = 8, max = 128, message = "password must be 8-128 characters"))]
    pub password: String,
    /// Full name.
    #[validate(
        length(max = 100, message = "full_name must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    pub full_name: String,
    /// Optional email address.
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

fn username_charset(username: &str) -> Result<(), ValidationError> {
    if username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        Ok(())
    } else {
        Err(ValidationError::new("username_charset")
            .with_message("username may only contain letters, digits, '_', '.' and '-'".into()))
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank").with_message("full_name must be 1-100 characters".into()))
    } else {
        Ok(())
    }
}

/// Registration, login and customer lookups.
#[derive(Clone)]
pub struct CustomerService {
    customers: Arc<dyn CustomerDirectory>,
    hasher: Arc<dyn CredentialHasher>,
    /// Verified against when the username is unknown, so a miss costs as
    /// much as a wrong password.
    decoy_hash: Arc<OnceCell<String>>,
}

impl CustomerService {
    /// Creates a service over `customers`, hashing with `hasher`.
    #[must_use]
    pub fn new(customers: Arc<dyn CustomerDirectory>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self {
            customers,
            hasher,
            decoy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Registers a new customer.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for malformed input, `UsernameTaken` if the username
    /// is registered already.
    pub async fn register(&self, registration: Registration) -> BankResult<Customer> {
        registration.validate()?;
        if self
            .customers
            .exists_by_username(&registration.username)
            .await?
        {
            tracing::warn!(username = %registration.username, "username already taken");
            return Err(BankError::UsernameTaken(registration.username));
        }

        let password_hash = self.hasher.hash(&registration.password)?;
        // A concurrent registration can still win the race; the directory
        // reports that as UsernameTaken too.
        let customer = self
            .customers
            .insert(NewCustomer {
                username: registration.username,
                password_hash,
                full_name: registration.full_name.trim().to_string(),
                email: registration.email,
            })
            .await?;

        tracing::info!(customer_id = %customer.id, username = %customer.username, "customer registered");
        Ok(customer)
    }

    /// Checks a username/password pair.
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` for an unknown username or a wrong password.
    pub async fn authenticate(&self, username: &str, password: &str) -> BankResult<Customer> {
        let Some(customer) = self.customers.find_by_username(username).await? else {
            let decoy = self
                .decoy_hash
                .get_or_try_init(|| async { self.hasher.hash(DECOY_PASSWORD) })
                .await?;
            self.hasher.verify(password, decoy)?;
            tracing::warn!(username, "login for unknown username");
            return Err(BankError::InvalidCredentials);
        };
        if !self.hasher.verify(password, &customer.password_hash)? {
            tracing::warn!(username, "login with wrong password");
            return Err(BankError::InvalidCredentials);
        }
        Ok(customer)
    }

    /// Looks up a customer by ID.
    ///
    /// # Errors
    ///
    /// `NotFound` if the customer does not exist.
    pub async fn get(&self, id: CustomerId) -> BankResult<Customer> {
        self.customers
            .find_by_id(id)
            .await?
            .ok_or_else(|| BankError::not_found(ResourceKind::Customer, id))
    }

    /// Looks up a customer by username.
    ///
    /// # Errors
    ///
    /// `NotFound` if the username is not registered.
    pub async fn get_by_username(&self, username: &str) -> BankResult<Customer> {
        self.customers
            .find_by_username(username)
            .await?
            .ok_or_else(|| BankError::not_found(ResourceKind::Customer, username))
    }

    /// Returns true if `username` is registered.
    pub async fn exists_by_username(&self, username: &str) -> BankResult<bool> {
        self.customers.exists_by_username(username).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use rstest::rstest;

    /// Reversible stand-in so tests do not pay for Argon2.
    struct PlainHasher;

    impl CredentialHasher for PlainHasher {
        fn hash(&self, password: &str) -> BankResult<String> {
            Ok(format!("plain:{password}"))
        }

        fn verify(&self, password: &str, hash: &str) -> BankResult<bool> {
            Ok(hash == format!("plain:{password}"))
        }
    }

    fn service() -> CustomerService {
        CustomerService::new(Arc::new(MemoryStore::new()), Arc::new(PlainHasher))
    }

    fn alice() -> Registration {
        Registration {
            username: "alice".into(),
            password: "correct horse".into(),
            full_name: " Alice Example ".into(),
            email: Some("alice@example.com".into()),
        }
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_password() {
        let service = service();

        let customer = service.register(alice()).await.unwrap();

        assert_eq!(customer.username, "alice");
        assert_eq!(customer.full_name, "Alice Example");
        assert_eq!(customer.password_hash, "plain:correct horse");
        assert_eq!(service.get(customer.id).await.unwrap(), customer);
        assert!(service.exists_by_username("alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_register_twice_is_username_taken() {
        let service = service();
        service.register(alice()).await.unwrap();

        let err = service.register(alice()).await.unwrap_err();

        assert_eq!(err, BankError::UsernameTaken("alice".into()));
    }

    #[rstest]
    #[case("al", "correct horse", "Alice", None)]
    #[case("al ice", "correct horse", "Alice", None)]
    #[case("alice", "short", "Alice", None)]
    #[case("alice", "correct horse", "   ", None)]
    #[case("alice", "correct horse", "Alice", Some("not-an-email"))]
    #[case("alice", "correct horse", "Alice", Some("a@."))]
    #[tokio::test]
    async fn test_register_rejects_malformed_input(
        #[case] username: &str,
        #[case] password: &str,
        #[case] full_name: &str,
        #[case] email: Option<&str>,
    ) {
        let err = service()
            .register(Registration {
                username: username.into(),
                password: password.into(),
                full_name: full_name.into(),
                email: email.map(Into::into),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, BankError::InvalidArgument(_)), "{err}");
    }

    #[rstest]
    #[case("al", "correct horse", "Alice", None)]
    #[case("alice", "short", "Alice", None)]
    #[case("alice", "correct horse", "", None)]
    #[case("alice", "correct horse", "Alice", Some("a@."))]
    #[case("alice", "correct horse", "Alice", Some("alice@"))]
    fn test_registration_agrees_with_register_request(
        #[case] username: &str,
        #[case] password: &str,
        #[case] full_name: &str,
        #[case] email: Option<&str>,
    ) {
        let request = bankly_shared::auth::RegisterRequest {
            username: username.into(),
            password: password.into(),
            full_name: full_name.into(),
            email: email.map(Into::into),
        };
        let registration = Registration {
            username: username.into(),
            password: password.into(),
            full_name: full_name.into(),
            email: email.map(Into::into),
        };

        assert!(request.validate().is_err());
        assert!(matches!(
            BankError::from(registration.validate().unwrap_err()),
            BankError::InvalidArgument(_)
        ));
    }

    #[tokio::test]
    async fn test_authenticate() {
        let service = service();
        let registered = service.register(alice()).await.unwrap();

        let customer = service.authenticate("alice", "correct horse").await.unwrap();
        assert_eq!(customer.id, registered.id);

        assert_eq!(
            service.authenticate("alice", "wrong horse").await.unwrap_err(),
            BankError::InvalidCredentials
        );
        assert_eq!(
            service.authenticate("bob", "correct horse").await.unwrap_err(),
            BankError::InvalidCredentials
        );
    }

    #[derive(Default)]
    struct CountingHasher {
        verifies: std::sync::atomic::AtomicUsize,
    }

    impl CredentialHasher for CountingHasher {
        fn hash(&self, password: &str) -> BankResult<String> {
            PlainHasher.hash(password)
        }

        fn verify(&self, password: &str, hash: &str) -> BankResult<bool> {
            self.verifies
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            PlainHasher.verify(password, hash)
        }
    }

    #[tokio::test]
    async fn test_unknown_username_still_verifies() {
        let hasher = Arc::new(CountingHasher::default());
        let service = CustomerService::new(Arc::new(MemoryStore::new()), hasher.clone());

        for _ in 0..2 {
            assert_eq!(
                service
                    .authenticate("ghost", "decoy-password-never-issued")
                    .await
                    .unwrap_err(),
                BankError::InvalidCredentials
            );
        }
        assert_eq!(
            hasher.verifies.load(std::sync::atomic::Ordering::SeqCst),
            2
        );
    }

    #[tokio::test]
    async fn test_unknown_lookups_are_not_found() {
        let service = service();
        assert!(matches!(
            service.get_by_username("nobody").await.unwrap_err(),
            BankError::NotFound {
                kind: ResourceKind::Customer,
                ..
            }
        ));
        assert!(service.get(CustomerId::new()).await.is_err());
    }

    #[test]
    fn test_registration_debug_hides_password() {
        assert!(!format!("{:?}", alice()).contains("correct horse"));
    }
}
