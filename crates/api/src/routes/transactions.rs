//! Deposits, withdrawals and transaction history.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use bankly_core::ledger::{MutationReceipt, Transaction, mutation::validate_account_number};
use bankly_shared::types::{PageRequest, PageResponse, TransactionId};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{ApiError, AppState, middleware::auth::AuthCustomer};

/// Creates the transaction routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts/{number}/deposit", post(deposit))
        .route("/accounts/{number}/withdraw", post(withdraw))
        .route("/accounts/{number}/transactions", get(list_transactions))
        .route("/transactions/{id}", get(get_transaction))
}

/// Request body for a deposit or withdrawal.
#[derive(Debug, Deserialize)]
pub struct AmountRequest {
    /// Positive amount with at most two decimal places.
    pub amount: Decimal,
    /// Optional free-text notes.
    #[serde(default)]
    pub notes: String,
}

/// POST /accounts/{number}/deposit
async fn deposit(
    State(state): State<AppState>,
    auth: AuthCustomer,
    Path(number): Path<String>,
    Json(payload): Json<AmountRequest>,
) -> Result<Json<MutationReceipt>, ApiError> {
    validate_account_number("account_number", &number)?;
    state
        .bank
        .accounts
        .require_owned(&number, auth.customer_id())
        .await?;
    let receipt = state
        .bank
        .ledger
        .deposit(&number, payload.amount, &payload.notes)
        .await?;
    Ok(Json(receipt))
}

/// POST /accounts/{number}/withdraw
async fn withdraw(
    State(state): State<AppState>,
    auth: AuthCustomer,
    Path(number): Path<String>,
    Json(payload): Json<AmountRequest>,
) -> Result<Json<MutationReceipt>, ApiError> {
    validate_account_number("account_number", &number)?;
    state
        .bank
        .accounts
        .require_owned(&number, auth.customer_id())
        .await?;
    let receipt = state
        .bank
        .ledger
        .withdraw(&number, payload.amount, &payload.notes)
        .await?;
    Ok(Json(receipt))
}

/// GET /accounts/{number}/transactions?page&per_page - Newest first.
async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthCustomer,
    Path(number): Path<String>,
    Query(page): Query<PageRequest>,
) -> Result<Json<PageResponse<Transaction>>, ApiError> {
    state
        .bank
        .accounts
        .require_owned(&number, auth.customer_id())
        .await?;
    let page = state
        .bank
        .history
        .transactions_for_account(&number, page)
        .await?;
    Ok(Json(page))
}

/// GET /transactions/{id}
async fn get_transaction(
    State(state): State<AppState>,
    auth: AuthCustomer,
    Path(id): Path<TransactionId>,
) -> Result<Json<Transaction>, ApiError> {
    let transaction = state.bank.history.transaction(id).await?;
    state
        .bank
        .accounts
        .require_owned(&transaction.account_number, auth.customer_id())
        .await?;
    Ok(Json(transaction))
}
