//! Transfers between accounts.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use bankly_core::BankError;
use bankly_core::ledger::{Transfer, TransferReceipt, mutation::validate_account_number};
use bankly_shared::types::TransferId;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{ApiError, AppState, middleware::auth::AuthCustomer};

/// Creates the transfer routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transfers", post(create_transfer))
        .route("/transfers/{id}", get(get_transfer))
        .route("/accounts/{number}/transfers", get(list_transfers))
}

/// Request body for a transfer.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    /// Account to debit. Must belong to the caller.
    pub source_account_number: String,
    /// Account to credit. May belong to anyone.
    pub target_account_number: String,
    /// Positive amount with at most two decimal places.
    pub amount: Decimal,
    /// Optional free-text notes.
    #[serde(default)]
    pub notes: String,
}

/// POST /transfers
async fn create_transfer(
    State(state): State<AppState>,
    auth: AuthCustomer,
    Json(payload): Json<TransferRequest>,
) -> Result<(StatusCode, Json<TransferReceipt>), ApiError> {
    validate_account_number("source_account_number", &payload.source_account_number)?;
    validate_account_number("target_account_number", &payload.target_account_number)?;
    state
        .bank
        .accounts
        .require_owned(&payload.source_account_number, auth.customer_id())
        .await?;
    let receipt = state
        .bank
        .ledger
        .transfer(
            &payload.source_account_number,
            &payload.target_account_number,
            payload.amount,
            &payload.notes,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// GET /transfers/{id} - Visible to the owner of either side.
async fn get_transfer(
    State(state): State<AppState>,
    auth: AuthCustomer,
    Path(id): Path<TransferId>,
) -> Result<Json<Transfer>, ApiError> {
    let transfer = state.bank.history.transfer(id).await?;
    let customer_id = auth.customer_id();
    for number in [
        transfer.source_account_number.clone(),
        transfer.target_account_number.clone(),
    ] {
        if state.bank.accounts.get(&number).await?.customer_id == customer_id {
            return Ok(Json(transfer));
        }
    }
    Err(BankError::Forbidden(format!("transfer {id} does not involve your accounts")).into())
}

/// GET /accounts/{number}/transfers - Incoming and outgoing, newest first.
async fn list_transfers(
    State(state): State<AppState>,
    auth: AuthCustomer,
    Path(number): Path<String>,
) -> Result<Json<Vec<Transfer>>, ApiError> {
    state
        .bank
        .accounts
        .require_owned(&number, auth.customer_id())
        .await?;
    let transfers = state.bank.history.transfers_for_account(&number).await?;
    Ok(Json(transfers))
}
