//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod accounts;
pub mod auth;
pub mod customers;
pub mod health;
pub mod transactions;
pub mod transfers;

/// Creates the API router: public health and auth routes, everything else
/// behind the bearer-token middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(customers::routes())
        .merge(accounts::routes())
        .merge(transactions::routes())
        .merge(transfers::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}
