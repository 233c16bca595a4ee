//! Authentication types for JWT and tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (customer username).
    pub sub: String,
    /// Customer ID.
    pub cid: Uuid,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a customer.
    #[must_use]
    pub fn new(subject: &str, customer_id: Uuid, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: subject.to_string(),
            cid: customer_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the subject (username) from claims.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.sub
    }

    /// Returns the customer ID from claims.
    #[must_use]
    pub const fn customer_id(&self) -> Uuid {
        self.cid
    }
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    /// Plaintext password.
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Registration request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Desired username.
    #[validate(length(min = 3, max = 50, message = "username must be 3-50 characters"))]
    pub username: String,
    /// Plaintext password.
    #[validate(length(min = 8, max = 128, message = "password must be 8-128 characters"))]
    pub password: String,
    /// Full name.
    #[validate(length(min = 1, max = 100, message = "full_name must be 1-100 characters"))]
    pub full_name: String,
    /// Optional email address.
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
}

/// Customer info returned in auth responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerInfo {
    /// Customer ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Full name.
    pub full_name: String,
    /// Email address.
    pub email: Option<String>,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

/// Response returned after registration or login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Authenticated customer.
    pub customer: CustomerInfo,
    /// Bearer access token.
    pub access_token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
}

impl AuthResponse {
    /// Creates a bearer token response.
    #[must_use]
    pub fn bearer(customer: CustomerInfo, access_token: String, expires_in: i64) -> Self {
        Self {
            customer,
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}
