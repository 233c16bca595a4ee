//! Routes about the authenticated customer.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use bankly_core::BankError;
use bankly_shared::auth::CustomerInfo;

use super::accounts::AccountList;
use super::auth::customer_info;
use crate::{ApiError, AppState, middleware::auth::AuthCustomer};

/// Creates the customer routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers/me", get(me))
        .route("/customers/{username}/accounts", get(accounts_by_username))
}

/// GET /customers/me
async fn me(
    State(state): State<AppState>,
    auth: AuthCustomer,
) -> Result<Json<CustomerInfo>, ApiError> {
    let customer = state.bank.customers.get(auth.customer_id()).await?;
    Ok(Json(customer_info(&customer)))
}

/// GET /customers/{username}/accounts - Only the caller's own username.
async fn accounts_by_username(
    State(state): State<AppState>,
    auth: AuthCustomer,
    Path(username): Path<String>,
) -> Result<Json<AccountList>, ApiError> {
    if username != auth.username() {
        return Err(BankError::Forbidden(format!(
            "cannot list accounts of customer {username}"
        ))
        .into());
    }
    let accounts = state.bank.accounts.list_for_username(&username).await?;
    Ok(Json(AccountList { accounts }))
}
