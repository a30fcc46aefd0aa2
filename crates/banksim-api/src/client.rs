//! Typed HTTP clients for the ledger and user services.
//!
//! Error bodies returned by a service are decoded back into the same
//! [`BankError`] kind and message, so callers see exactly what an
//! in-process call would have returned.

use banksim_ledger::{
    CreateAccountRequest, CreateAccountResponse, DeleteAccountRequest, DeleteAccountResponse,
    DepositRequest, DepositResponse, GetAccountRequest, GetAccountResponse, ListAccountsRequest,
    ListAccountsResponse, WithdrawRequest, WithdrawResponse,
};
use banksim_types::{BankError, RequestContext, Result, UserId, UserInfo};
use banksim_users::{LookupError, UserUpdate};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Instant;

use crate::dto::{
    CreateUserRequest, CreateUserResponse, DeleteUserResponse, HealthResponse, ListUsersResponse,
    MoneyMovement, UpdateUserResponse,
};
use crate::errors::ErrorBody;
use crate::handlers::TIMEOUT_HEADER;

/// Collapse a transport-level failure into a plain error for callers
pub fn into_status(err: LookupError) -> BankError {
    match err {
        LookupError::Status(status) => status,
        LookupError::Transport(msg) => BankError::internal(msg),
    }
}

fn transport(err: impl std::fmt::Display) -> LookupError {
    LookupError::Transport(err.to_string())
}

fn require<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    if value.is_empty() {
        return Err(BankError::invalid_argument(format!("{} is required", what)));
    }
    Ok(value)
}

#[derive(Debug, Clone)]
struct Endpoint {
    http: reqwest::Client,
    base: Url,
}

impl Endpoint {
    fn parse(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url).map_err(|e| {
            BankError::invalid_argument(format!("invalid base url {}: {}", base_url, e))
        })?;
        if base.cannot_be_a_base() {
            return Err(BankError::invalid_argument(format!(
                "invalid base url {}",
                base_url
            )));
        }
        Ok(Endpoint {
            http: reqwest::Client::new(),
            base,
        })
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn call<B, T>(
        &self,
        ctx: &RequestContext,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> std::result::Result<T, LookupError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        ctx.ensure_active()?;

        let mut req = self.http.request(method, self.url(segments));
        if let Some(deadline) = ctx.deadline() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            req = req
                .timeout(remaining)
                .header(TIMEOUT_HEADER, remaining.as_millis().to_string());
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await.map_err(transport)?;
        let status = resp.status();
        if status.is_success() {
            return resp.json::<T>().await.map_err(transport);
        }

        let text = resp.text().await.map_err(transport)?;
        match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => Err(LookupError::Status(BankError::new(body.code, body.message))),
            Err(_) => Err(LookupError::Transport(format!(
                "unexpected response {}: {}",
                status, text
            ))),
        }
    }

    async fn health(&self) -> Result<HealthResponse> {
        self.call::<(), _>(&RequestContext::new(), Method::GET, &["health"], None)
            .await
            .map_err(into_status)
    }
}

/// Client of the user directory service
#[derive(Debug, Clone)]
pub struct UserClient {
    endpoint: Endpoint,
}

impl UserClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(UserClient {
            endpoint: Endpoint::parse(base_url)?,
        })
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        self.endpoint.health().await
    }

    pub async fn create_user(
        &self,
        ctx: &RequestContext,
        login: &str,
        email: &str,
    ) -> Result<UserId> {
        let body = CreateUserRequest {
            login: login.to_string(),
            email: email.to_string(),
        };
        let resp: CreateUserResponse = self
            .endpoint
            .call(ctx, Method::POST, &["v1", "users"], Some(&body))
            .await
            .map_err(into_status)?;
        Ok(resp.id)
    }

    pub async fn get_user(&self, ctx: &RequestContext, id: &UserId) -> Result<UserInfo> {
        self.fetch_user(ctx, id).await.map_err(into_status)
    }

    /// Like [`get_user`](Self::get_user) but keeps transport failures apart
    pub(crate) async fn fetch_user(
        &self,
        ctx: &RequestContext,
        id: &UserId,
    ) -> std::result::Result<UserInfo, LookupError> {
        let id = require(id.as_str(), "user id")?;
        self.endpoint
            .call::<(), _>(ctx, Method::GET, &["v1", "users", id], None)
            .await
    }

    pub async fn list_users(&self, ctx: &RequestContext) -> Result<Vec<UserInfo>> {
        let resp: ListUsersResponse = self
            .endpoint
            .call::<(), _>(ctx, Method::GET, &["v1", "users"], None)
            .await
            .map_err(into_status)?;
        Ok(resp.users)
    }

    pub async fn update_user(
        &self,
        ctx: &RequestContext,
        id: &UserId,
        update: &UserUpdate,
    ) -> Result<UserInfo> {
        let id = require(id.as_str(), "user id")?;
        let resp: UpdateUserResponse = self
            .endpoint
            .call(ctx, Method::PATCH, &["v1", "users", id], Some(update))
            .await
            .map_err(into_status)?;
        Ok(resp.user)
    }

    pub async fn delete_user(&self, ctx: &RequestContext, id: &UserId) -> Result<()> {
        let id = require(id.as_str(), "user id")?;
        let _: DeleteUserResponse = self
            .endpoint
            .call::<(), _>(ctx, Method::DELETE, &["v1", "users", id], None)
            .await
            .map_err(into_status)?;
        Ok(())
    }
}

/// Client of the account ledger service
#[derive(Debug, Clone)]
pub struct LedgerClient {
    endpoint: Endpoint,
}

impl LedgerClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(LedgerClient {
            endpoint: Endpoint::parse(base_url)?,
        })
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        self.endpoint.health().await
    }

    pub async fn create_account(
        &self,
        ctx: &RequestContext,
        req: &CreateAccountRequest,
    ) -> Result<CreateAccountResponse> {
        self.endpoint
            .call(ctx, Method::POST, &["v1", "accounts"], Some(req))
            .await
            .map_err(into_status)
    }

    pub async fn get_account(
        &self,
        ctx: &RequestContext,
        req: &GetAccountRequest,
    ) -> Result<GetAccountResponse> {
        let id = require(req.id.as_str(), "account id")?;
        self.endpoint
            .call::<(), _>(ctx, Method::GET, &["v1", "accounts", id], None)
            .await
            .map_err(into_status)
    }

    pub async fn list_accounts(
        &self,
        ctx: &RequestContext,
        req: &ListAccountsRequest,
    ) -> Result<ListAccountsResponse> {
        let user_id = require(req.user_id.as_str(), "user id")?;
        self.endpoint
            .call::<(), _>(ctx, Method::GET, &["v1", "users", user_id, "accounts"], None)
            .await
            .map_err(into_status)
    }

    pub async fn delete_account(
        &self,
        ctx: &RequestContext,
        req: &DeleteAccountRequest,
    ) -> Result<DeleteAccountResponse> {
        let id = require(req.account_id.as_str(), "account id")?;
        self.endpoint
            .call::<(), _>(ctx, Method::DELETE, &["v1", "accounts", id], None)
            .await
            .map_err(into_status)
    }

    pub async fn deposit(
        &self,
        ctx: &RequestContext,
        req: &DepositRequest,
    ) -> Result<DepositResponse> {
        let id = require(req.account_id.as_str(), "account id")?;
        let body = MoneyMovement {
            amount: req.amount.clone(),
            request_id: req.request_id.clone(),
        };
        self.endpoint
            .call(ctx, Method::POST, &["v1", "accounts", id, "deposit"], Some(&body))
            .await
            .map_err(into_status)
    }

    pub async fn withdraw(
        &self,
        ctx: &RequestContext,
        req: &WithdrawRequest,
    ) -> Result<WithdrawResponse> {
        let id = require(req.account_id.as_str(), "account id")?;
        let body = MoneyMovement {
            amount: req.amount.clone(),
            request_id: req.request_id.clone(),
        };
        self.endpoint
            .call(ctx, Method::POST, &["v1", "accounts", id, "withdraw"], Some(&body))
            .await
            .map_err(into_status)
    }
}

/// Both service clients behind one handle
#[derive(Debug, Clone)]
pub struct BankClient {
    pub users: UserClient,
    pub ledger: LedgerClient,
}

impl BankClient {
    pub fn new(user_service_url: &str, ledger_service_url: &str) -> Result<Self> {
        Ok(BankClient {
            users: UserClient::new(user_service_url)?,
            ledger: LedgerClient::new(ledger_service_url)?,
        })
    }
}
