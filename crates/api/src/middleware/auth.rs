//! Authentication middleware for protected routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use bankly_shared::Claims;
use bankly_shared::types::CustomerId;

use crate::{ApiError, AppState};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Validates the bearer token and stores its claims in the request
/// extensions for [`AuthCustomer`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return ApiError::unauthorized(
            "missing_token",
            "Authorization header with Bearer token is required",
        )
        .into_response();
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(error = %e, "rejected bearer token");
            ApiError::from(e).into_response()
        }
    }
}

/// The authenticated customer, taken from validated token claims.
///
/// ```ignore
/// async fn handler(auth: AuthCustomer) -> impl IntoResponse {
///     let customer_id = auth.customer_id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthCustomer(pub Claims);

impl AuthCustomer {
    /// Returns the customer ID from the claims.
    #[must_use]
    pub fn customer_id(&self) -> CustomerId {
        CustomerId::from_uuid(self.0.customer_id())
    }

    /// Returns the username the token was issued to.
    #[must_use]
    pub fn username(&self) -> &str {
        self.0.subject()
    }
}

impl<S> FromRequestParts<S> for AuthCustomer
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthCustomer)
            .ok_or_else(|| ApiError::unauthorized("unauthorized", "Authentication required"))
    }
}
