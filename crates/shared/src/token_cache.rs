//! Reuse of recently issued access tokens on repeated logins.

use std::time::Duration;

use moka::sync::Cache;
use uuid::Uuid;

use crate::jwt::{IssuedToken, JwtError, JwtService};

/// Tokens with less remaining lifetime than this are reissued instead of reused.
const MIN_REMAINING_SECS: i64 = 30;

/// Per-username cache of issued access tokens.
///
/// Entries live for `ttl`, which should be well below the token lifetime so
/// a reused token still has most of its validity left.
#[derive(Clone)]
pub struct TokenCache {
    cache: Cache<String, (Uuid, IssuedToken)>,
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCache")
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

impl TokenCache {
    /// Creates a cache whose entries expire after `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(10_000)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Returns a cached token for `subject`, or issues and caches a new one.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if a new token must be issued and
    /// signing fails.
    pub fn get_or_issue(
        &self,
        jwt: &JwtService,
        subject: &str,
        customer_id: Uuid,
    ) -> Result<IssuedToken, JwtError> {
        if let Some((cached_id, token)) = self.cache.get(subject) {
            if cached_id == customer_id && token.expires_in() > MIN_REMAINING_SECS {
                return Ok(token);
            }
        }

        let token = jwt.issue_token(subject, customer_id)?;
        self.cache
            .insert(subject.to_string(), (customer_id, token.clone()));
        Ok(token)
    }
}
