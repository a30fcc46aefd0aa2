use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::{LedgerState, UserState};

/// Create the account ledger router
pub fn create_ledger_app(state: LedgerState) -> Router {
    Router::new()
        // Health and info
        .route("/health", get(handlers::health))
        .route("/v1/status", get(handlers::ledger_status))

        // Accounts
        .route("/v1/accounts", post(handlers::create_account))
        .route(
            "/v1/accounts/:id",
            get(handlers::get_account).delete(handlers::delete_account),
        )
        .route("/v1/users/:user_id/accounts", get(handlers::list_accounts))

        // Balance changes
        .route("/v1/accounts/:id/deposit", post(handlers::deposit))
        .route("/v1/accounts/:id/withdraw", post(handlers::withdraw))

        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Create the user directory router
pub fn create_user_app(state: UserState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/v1/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            "/v1/users/:id",
            get(handlers::get_user)
                .patch(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
