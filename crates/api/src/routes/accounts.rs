//! Account management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use bankly_core::ledger::{Account, AccountType};
use serde::{Deserialize, Serialize};

use crate::{ApiError, AppState, middleware::auth::AuthCustomer};

/// Creates the account routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts).post(open_account))
        .route(
            "/accounts/{number}",
            get(get_account).put(update_account).delete(close_account),
        )
}

/// Request body for opening or retyping an account.
#[derive(Debug, Deserialize)]
pub struct AccountTypeRequest {
    /// `checking` or `savings`.
    pub account_type: AccountType,
}

/// List wrapper for account responses.
#[derive(Debug, Serialize)]
pub struct AccountList {
    /// The accounts, oldest first.
    pub accounts: Vec<Account>,
}

/// GET /accounts
async fn list_accounts(
    State(state): State<AppState>,
    auth: AuthCustomer,
) -> Result<Json<AccountList>, ApiError> {
    let accounts = state
        .bank
        .accounts
        .list_for_customer(auth.customer_id())
        .await?;
    Ok(Json(AccountList { accounts }))
}

/// POST /accounts
async fn open_account(
    State(state): State<AppState>,
    auth: AuthCustomer,
    Json(payload): Json<AccountTypeRequest>,
) -> Result<(StatusCode, Json<Account>), ApiError> {
    let account = state
        .bank
        .accounts
        .open(auth.customer_id(), payload.account_type)
        .await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// GET /accounts/{number}
async fn get_account(
    State(state): State<AppState>,
    auth: AuthCustomer,
    Path(number): Path<String>,
) -> Result<Json<Account>, ApiError> {
    let account = state
        .bank
        .accounts
        .require_owned(&number, auth.customer_id())
        .await?;
    Ok(Json(account))
}

/// PUT /accounts/{number}
async fn update_account(
    State(state): State<AppState>,
    auth: AuthCustomer,
    Path(number): Path<String>,
    Json(payload): Json<AccountTypeRequest>,
) -> Result<Json<Account>, ApiError> {
    state
        .bank
        .accounts
        .require_owned(&number, auth.customer_id())
        .await?;
    let account = state
        .bank
        .accounts
        .update_type(&number, payload.account_type)
        .await?;
    Ok(Json(account))
}

/// DELETE /accounts/{number} - Refused once the account has history.
async fn close_account(
    State(state): State<AppState>,
    auth: AuthCustomer,
    Path(number): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .bank
        .accounts
        .require_owned(&number, auth.customer_id())
        .await?;
    state.bank.accounts.close(&number).await?;
    Ok(StatusCode::NO_CONTENT)
}
