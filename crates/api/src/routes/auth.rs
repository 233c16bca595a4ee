//! Registration and login.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use bankly_core::customer::Registration;
use bankly_core::ledger::Customer;
use bankly_shared::auth::{AuthResponse, CustomerInfo, LoginRequest, RegisterRequest};
use tracing::info;
use validator::Validate;

use crate::{ApiError, AppState};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
}

/// Public view of a customer. Never includes the password hash.
pub(crate) fn customer_info(customer: &Customer) -> CustomerInfo {
    CustomerInfo {
        id: customer.id.into_inner(),
        username: customer.username.clone(),
        full_name: customer.full_name.clone(),
        email: customer.email.clone(),
        created_at: customer.created_at,
    }
}

fn issue(state: &AppState, customer: &Customer) -> Result<AuthResponse, ApiError> {
    let token = state.token_cache.get_or_issue(
        &state.jwt_service,
        &customer.username,
        customer.id.into_inner(),
    )?;
    let expires_in = token.expires_in();
    Ok(AuthResponse::bearer(
        customer_info(customer),
        token.token,
        expires_in,
    ))
}

/// POST /auth/register - Create a customer and return a token.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    payload.validate()?;

    let customer = state
        .bank
        .customers
        .register(Registration {
            username: payload.username,
            password: payload.password,
            full_name: payload.full_name,
            email: payload.email,
        })
        .await?;

    let response = issue(&state, &customer)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /auth/login - Check credentials and return a token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.validate()?;

    let customer = state
        .bank
        .customers
        .authenticate(&payload.username, &payload.password)
        .await?;

    info!(customer_id = %customer.id, "customer logged in");
    Ok(Json(issue(&state, &customer)?))
}
