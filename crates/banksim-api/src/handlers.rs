use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use banksim_ledger::{
    CreateAccountRequest, CreateAccountResponse, DeleteAccountRequest, DeleteAccountResponse,
    DepositRequest, DepositResponse, GetAccountRequest, GetAccountResponse, ListAccountsRequest,
    ListAccountsResponse, WithdrawRequest, WithdrawResponse,
};
use banksim_types::{AccountId, BankError, RequestContext, UserId, UserInfo};
use banksim_users::UserUpdate;
use std::future::Future;
use std::time::Duration;

use crate::dto::{
    CreateUserRequest, CreateUserResponse, DeleteUserResponse, HealthResponse,
    LedgerStatusResponse, ListUsersResponse, MoneyMovement, UpdateUserResponse,
};
use crate::errors::ApiError;
use crate::state::{LedgerState, UserState};

/// Optional per-request budget, in milliseconds
pub const TIMEOUT_HEADER: &str = "x-request-timeout-ms";

type ApiResult<T> = Result<Json<T>, ApiError>;

fn request_context(headers: &HeaderMap) -> Result<RequestContext, ApiError> {
    let Some(value) = headers.get(TIMEOUT_HEADER) else {
        return Ok(RequestContext::new());
    };
    let millis = value
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .ok_or_else(|| {
            BankError::invalid_argument(format!(
                "{} must be a whole number of milliseconds",
                TIMEOUT_HEADER
            ))
        })?;
    Ok(RequestContext::with_timeout(Duration::from_millis(millis)))
}

/// Run a service call on its own task so it completes even when the client
/// hangs up half way through.
async fn run_detached<T, F>(call: F) -> Result<T, ApiError>
where
    F: Future<Output = banksim_types::Result<T>> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::spawn(call)
        .await
        .map_err(|e| BankError::internal(format!("request task failed: {}", e)))?;
    Ok(result?)
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// Ledger service

pub async fn ledger_status(State(state): State<LedgerState>) -> impl IntoResponse {
    Json(LedgerStatusResponse {
        accounts: state.ledger.account_count().await,
        cached_responses: state.ledger.cached_responses().await,
    })
}

pub async fn create_account(
    State(state): State<LedgerState>,
    headers: HeaderMap,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> ApiResult<CreateAccountResponse> {
    let ctx = request_context(&headers)?;
    let Json(req) = payload?;
    let ledger = state.ledger.clone();
    let resp = run_detached(async move { ledger.create_account(&ctx, req).await }).await?;
    Ok(Json(resp))
}

pub async fn get_account(
    State(state): State<LedgerState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<GetAccountResponse> {
    let ctx = request_context(&headers)?;
    let req = GetAccountRequest {
        id: AccountId::new(id),
    };
    Ok(Json(state.ledger.get_account(&ctx, req).await?))
}

pub async fn list_accounts(
    State(state): State<LedgerState>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
) -> ApiResult<ListAccountsResponse> {
    let ctx = request_context(&headers)?;
    let req = ListAccountsRequest {
        user_id: UserId::new(user_id),
    };
    Ok(Json(state.ledger.list_accounts(&ctx, req).await?))
}

pub async fn delete_account(
    State(state): State<LedgerState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<DeleteAccountResponse> {
    let ctx = request_context(&headers)?;
    let req = DeleteAccountRequest {
        account_id: AccountId::new(id),
    };
    let ledger = state.ledger.clone();
    let resp = run_detached(async move { ledger.delete_account(&ctx, req).await }).await?;
    Ok(Json(resp))
}

pub async fn deposit(
    State(state): State<LedgerState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    payload: Result<Json<MoneyMovement>, JsonRejection>,
) -> ApiResult<DepositResponse> {
    let ctx = request_context(&headers)?;
    let Json(body) = payload?;
    let req = DepositRequest {
        account_id: AccountId::new(id),
        amount: body.amount,
        request_id: body.request_id,
    };
    let ledger = state.ledger.clone();
    let resp = run_detached(async move { ledger.deposit(&ctx, req).await }).await?;
    Ok(Json(resp))
}

pub async fn withdraw(
    State(state): State<LedgerState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    payload: Result<Json<MoneyMovement>, JsonRejection>,
) -> ApiResult<WithdrawResponse> {
    let ctx = request_context(&headers)?;
    let Json(body) = payload?;
    let req = WithdrawRequest {
        account_id: AccountId::new(id),
        amount: body.amount,
        request_id: body.request_id,
    };
    let ledger = state.ledger.clone();
    let resp = run_detached(async move { ledger.withdraw(&ctx, req).await }).await?;
    Ok(Json(resp))
}

// User directory

pub async fn create_user(
    State(state): State<UserState>,
    headers: HeaderMap,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<CreateUserResponse> {
    let ctx = request_context(&headers)?;
    let Json(req) = payload?;
    let id = state.users.create_user(&ctx, &req.login, &req.email).await?;
    Ok(Json(CreateUserResponse { id }))
}

pub async fn get_user(
    State(state): State<UserState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<UserInfo> {
    let ctx = request_context(&headers)?;
    Ok(Json(state.users.get_user(&ctx, &UserId::new(id)).await?))
}

pub async fn list_users(
    State(state): State<UserState>,
    headers: HeaderMap,
) -> ApiResult<ListUsersResponse> {
    let ctx = request_context(&headers)?;
    let users = state.users.list_users(&ctx).await?;
    Ok(Json(ListUsersResponse { users }))
}

pub async fn update_user(
    State(state): State<UserState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    payload: Result<Json<UserUpdate>, JsonRejection>,
) -> ApiResult<UpdateUserResponse> {
    let ctx = request_context(&headers)?;
    let Json(update) = payload?;
    let user = state
        .users
        .update_user(&ctx, &UserId::new(id), update)
        .await?;
    Ok(Json(UpdateUserResponse { user }))
}

pub async fn delete_user(
    State(state): State<UserState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<DeleteUserResponse> {
    let ctx = request_context(&headers)?;
    state.users.delete_user(&ctx, &UserId::new(id)).await?;
    Ok(Json(DeleteUserResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_context_without_header_has_no_deadline() {
        let ctx = request_context(&HeaderMap::new()).unwrap();
        assert!(ctx.deadline().is_none());
    }

    #[test]
    fn test_context_with_timeout_header() {
        let mut headers = HeaderMap::new();
        headers.insert(TIMEOUT_HEADER, HeaderValue::from_static("250"));
        let ctx = request_context(&headers).unwrap();
        assert!(ctx.deadline().is_some());
        assert!(!ctx.is_done());
    }

    #[test]
    fn test_context_rejects_garbage_header() {
        let mut headers = HeaderMap::new();
        headers.insert(TIMEOUT_HEADER, HeaderValue::from_static("soon"));
        let err = request_context(&headers).unwrap_err();
        assert_eq!(err.0.kind(), banksim_types::ErrorKind::InvalidArgument);
    }
}
