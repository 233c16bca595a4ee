//! JSON error responses.
//!
//! Every failure leaves the API as `{"error": CODE, "message": text}` with
//! the matching status. Storage and internal failures are logged and their
//! details replaced by a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bankly_core::BankError;
use bankly_shared::JwtError;
use serde_json::json;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// An error ready to be rendered as an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Creates an error with an explicit status and code.
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// 401 with the given code.
    pub fn unauthorized(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, code, message)
    }

    /// 500 without details.
    #[must_use]
    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            INTERNAL_MESSAGE,
        )
    }

    /// The response status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// The stable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }
}

impl From<BankError> for ApiError {
    fn from(err: BankError) -> Self {
        if err.is_server_error() {
            tracing::error!(error = %err, "request failed");
            return Self::internal();
        }
        let status =
            StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::BAD_REQUEST);
        Self::new(status, err.error_code(), err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", errors.to_string())
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => Self::unauthorized("token_expired", "Token has expired"),
            JwtError::DecodingError(_) => {
                Self::unauthorized("invalid_token", "Invalid or malformed token")
            }
            JwtError::EncodingError(_) => {
                tracing::error!(error = %err, "failed to sign token");
                Self::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({ "error": self.code, "message": self.message })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bankly_core::ResourceKind;
    use rstest::rstest;

    #[rstest]
    #[case(BankError::not_found(ResourceKind::Account, "1"), StatusCode::NOT_FOUND)]
    #[case(BankError::UsernameTaken("a".into()), StatusCode::CONFLICT)]
    #[case(BankError::InvalidCredentials, StatusCode::UNAUTHORIZED)]
    #[case(BankError::Forbidden("x".into()), StatusCode::FORBIDDEN)]
    #[case(BankError::InvalidArgument("x".into()), StatusCode::BAD_REQUEST)]
    fn test_bank_error_status(#[case] err: BankError, #[case] status: StatusCode) {
        assert_eq!(ApiError::from(err).status(), status);
    }

    #[test]
    fn test_storage_details_are_hidden() {
        let err = ApiError::from(BankError::Storage("relation \"accounts\" does not exist".into()));
        assert_eq!(err, ApiError::internal());
    }

    #[test]
    fn test_validation_errors_are_bad_requests() {
        use validator::Validate;

        let request = bankly_shared::auth::LoginRequest {
            username: String::new(),
            password: "secret".into(),
        };
        let err = ApiError::from(request.validate().unwrap_err());

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_jwt_errors() {
        assert_eq!(ApiError::from(JwtError::Expired).code(), "token_expired");
        assert_eq!(
            ApiError::from(JwtError::DecodingError("bad".into())).code(),
            "invalid_token"
        );
        assert_eq!(
            ApiError::from(JwtError::EncodingError("bad".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
