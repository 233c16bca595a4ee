//! JWT token generation and validation.
//!
//! Tokens are HS256-signed access tokens whose subject is the customer's
//! username.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::Claims;

/// JWT configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token lifetime in seconds.
    pub access_token_expires_secs: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            access_token_expires_secs: 900,
        }
    }
}

/// Errors that can occur during JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Token decoding failed.
    #[error("failed to decode token: {0}")]
    DecodingError(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,
}

/// A freshly signed token and the moment it stops being valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Encoded JWT.
    pub token: String,
    /// Expiration time.
    pub expires_at: DateTime<Utc>,
}

impl IssuedToken {
    /// Seconds remaining until expiry, never negative.
    #[must_use]
    pub fn expires_in(&self) -> i64 {
        (self.expires_at - Utc::now()).num_seconds().max(0)
    }
}

/// JWT service for token operations.
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_token_expires_secs", &self.config.access_token_expires_secs)
            .field("secret", &"[hidden]")
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// Creates a new JWT service with the given configuration.
    #[must_use]
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issues an access token for the given subject.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn issue_token(&self, subject: &str, customer_id: Uuid) -> Result<IssuedToken, JwtError> {
        let expires_at = Utc::now() + Duration::seconds(self.config.access_token_expires_secs);
        let claims = Claims::new(subject, customer_id, expires_at);

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Validates and decodes a token.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` if the token has expired.
    /// Returns `JwtError::DecodingError` if the token is malformed or forged.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let validation = Validation::default();

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::DecodingError(e.to_string()),
            })
    }

    /// Extracts the subject from a valid token.
    ///
    /// # Errors
    ///
    /// Same as [`JwtService::validate_token`].
    pub fn extract_subject(&self, token: &str) -> Result<String, JwtError> {
        self.validate_token(token).map(|claims| claims.sub)
    }

    /// Returns true if the token is well-formed, correctly signed and unexpired.
    #[must_use]
    pub fn is_valid(&self, token: &str) -> bool {
        self.validate_token(token).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "test-secret-key-for-testing".to_string(),
            access_token_expires_secs: 900,
        })
    }

    #[test]
    fn test_issue_token() {
        let service = create_test_service();
        let issued = service.issue_token("alice", Uuid::new_v4()).unwrap();

        assert!(!issued.token.is_empty());
        assert!(issued.expires_at > Utc::now());
        assert!(issued.expires_in() <= 15 * 60);
    }

    #[test]
    fn test_extract_subject_round_trip() {
        let service = create_test_service();
        let customer_id = Uuid::new_v4();
        let issued = service.issue_token("alice", customer_id).unwrap();

        assert_eq!(service.extract_subject(&issued.token).unwrap(), "alice");
        let claims = service.validate_token(&issued.token).unwrap();
        assert_eq!(claims.customer_id(), customer_id);
        assert!(service.is_valid(&issued.token));
    }

    #[test]
    fn test_invalid_token() {
        let service = create_test_service();
        assert!(service.validate_token("invalid.token.here").is_err());
        assert!(!service.is_valid("invalid.token.here"));
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let service = create_test_service();
        let other = JwtService::new(JwtConfig {
            secret: "another-secret".to_string(),
            access_token_expires_secs: 900,
        });
        let issued = other.issue_token("mallory", Uuid::new_v4()).unwrap();

        assert!(matches!(
            service.validate_token(&issued.token),
            Err(JwtError::DecodingError(_))
        ));
    }

    #[test]
    fn test_expired_token() {
        let service = JwtService::new(JwtConfig {
            secret: "test-secret-key-for-testing".to_string(),
            // Past the default 60s leeway.
            access_token_expires_secs: -300,
        });
        let issued = service.issue_token("alice", Uuid::new_v4()).unwrap();

        assert!(matches!(
            service.validate_token(&issued.token),
            Err(JwtError::Expired)
        ));
        assert_eq!(issued.expires_in(), 0);
    }
}
