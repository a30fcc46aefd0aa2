//! The account ledger service.
//!
//! Every operation checks the caller's context once on entry, validates its
//! input, and then works on the [`AccountStore`] under one readers-writer
//! lock. Mutations hold the write half for their whole duration, so a
//! deposit on one account serializes with a withdrawal on any other.
//!
//! Account creation keeps the write lock across the user lookup. A slow user
//! service therefore stalls every other mutation, but two concurrent creates
//! with the same request id can never both reach the lookup and insert.

use banksim_types::{
    add, subtract, Account, AccountId, BankError, Money, MoneyError, RequestContext, Result,
};
use banksim_users::{LookupError, UserLookup};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::messages::{
    CreateAccountRequest, CreateAccountResponse, DeleteAccountRequest, DeleteAccountResponse,
    DepositRequest, DepositResponse, GetAccountRequest, GetAccountResponse, ListAccountsRequest,
    ListAccountsResponse, WithdrawRequest, WithdrawResponse,
};
use crate::store::AccountStore;

pub struct LedgerService {
    store: RwLock<AccountStore>,
    users: Arc<dyn UserLookup>,
}

impl LedgerService {
    pub fn new(users: Arc<dyn UserLookup>) -> Self {
        LedgerService {
            store: RwLock::new(AccountStore::new()),
            users,
        }
    }

    /// Open an account for an existing user
    pub async fn create_account(
        &self,
        ctx: &RequestContext,
        req: CreateAccountRequest,
    ) -> Result<CreateAccountResponse> {
        ctx.ensure_active()?;

        if req.user_id.is_empty() {
            return Err(BankError::invalid_argument("user id is required"));
        }
        if req.request_id.is_empty() {
            return Err(BankError::invalid_argument("request id is required"));
        }

        let mut store = self.store.write().await;

        if let Some(resp) = store.creations.replay(&req.request_id) {
            debug!(request_id = %req.request_id, "create_account replayed");
            return Ok(resp);
        }

        let owner = self
            .users
            .get_user(ctx, &req.user_id)
            .await
            .map_err(|err| {
                warn!(user_id = %req.user_id, error = %err, "user lookup failed");
                lookup_error(err)
            })?;

        let id = AccountId::new(Uuid::new_v4().to_string());
        if store.contains(&id) {
            return Err(BankError::internal(format!(
                "error while generating account id: {} already taken",
                id
            )));
        }

        let account = Account {
            id,
            owner,
            balance: req.initial_balance,
        };
        store.insert(account.clone());

        info!(
            account_id = %account.id,
            user_id = %account.owner.id,
            request_id = %req.request_id,
            "account created"
        );

        let resp = CreateAccountResponse { account };
        store.creations.record(req.request_id, resp.clone());
        Ok(resp)
    }

    pub async fn get_account(
        &self,
        ctx: &RequestContext,
        req: GetAccountRequest,
    ) -> Result<GetAccountResponse> {
        ctx.ensure_active()?;

        if req.id.is_empty() {
            return Err(BankError::invalid_argument("account id is required"));
        }

        let store = self.store.read().await;
        let account = store
            .get(&req.id)
            .cloned()
            .ok_or_else(|| BankError::not_found("account not found"))?;
        Ok(GetAccountResponse { account })
    }

    /// Accounts of one user, in no particular order
    pub async fn list_accounts(
        &self,
        ctx: &RequestContext,
        req: ListAccountsRequest,
    ) -> Result<ListAccountsResponse> {
        ctx.ensure_active()?;

        if req.user_id.is_empty() {
            return Err(BankError::invalid_argument("user id is required"));
        }

        self.users
            .get_user(ctx, &req.user_id)
            .await
            .map_err(|err| {
                warn!(user_id = %req.user_id, error = %err, "user lookup failed");
                lookup_error(err)
            })?;

        let store = self.store.read().await;
        Ok(ListAccountsResponse {
            accounts: store.owned_by(&req.user_id),
        })
    }

    /// Close an account; only allowed once its balance is exactly zero
    pub async fn delete_account(
        &self,
        ctx: &RequestContext,
        req: DeleteAccountRequest,
    ) -> Result<DeleteAccountResponse> {
        ctx.ensure_active()?;

        if req.account_id.is_empty() {
            return Err(BankError::invalid_argument("account id is required"));
        }

        let mut store = self.store.write().await;
        let account = store
            .get(&req.account_id)
            .ok_or_else(|| BankError::not_found("account not found"))?;

        if !account.has_zero_balance() {
            return Err(BankError::failed_precondition(
                "cannot delete account with non-zero balance",
            ));
        }

        store.remove(&req.account_id);
        info!(account_id = %req.account_id, "account deleted");

        Ok(DeleteAccountResponse {
            account_id: req.account_id,
        })
    }

    pub async fn deposit(
        &self,
        ctx: &RequestContext,
        req: DepositRequest,
    ) -> Result<DepositResponse> {
        ctx.ensure_active()?;

        if req.account_id.is_empty() {
            return Err(BankError::invalid_argument("account id is required"));
        }
        let amount = match req.amount {
            Some(amount) if !amount.is_zero() => amount,
            _ => return Err(BankError::invalid_argument("deposit must be greater than zero")),
        };
        if req.request_id.is_empty() {
            return Err(BankError::invalid_argument("request id is required"));
        }

        let mut store = self.store.write().await;

        if let Some(resp) = store.deposits.replay(&req.request_id) {
            debug!(request_id = %req.request_id, "deposit replayed");
            return Ok(resp);
        }

        let account = store
            .get_mut(&req.account_id)
            .ok_or_else(|| BankError::not_found("account not found"))?;

        let new_balance = add(account.balance.as_ref(), Some(&amount)).map_err(money_error)?;
        ensure_non_negative(new_balance.as_ref())?;
        account.balance = new_balance;

        info!(
            account_id = %req.account_id,
            request_id = %req.request_id,
            amount = %amount,
            new_balance = ?account.balance,
            "deposit"
        );

        let resp = DepositResponse {
            account: account.clone(),
        };
        store.deposits.record(req.request_id, resp.clone());
        Ok(resp)
    }

    /// Take money out of an account.
    ///
    /// Unlike [`deposit`](Self::deposit) a zero or absent amount is accepted
    /// and leaves the balance as it is.
    pub async fn withdraw(
        &self,
        ctx: &RequestContext,
        req: WithdrawRequest,
    ) -> Result<WithdrawResponse> {
        ctx.ensure_active()?;

        if req.account_id.is_empty() {
            return Err(BankError::invalid_argument("account id is required"));
        }
        if req.request_id.is_empty() {
            return Err(BankError::invalid_argument("request id is required"));
        }

        let mut store = self.store.write().await;

        if let Some(resp) = store.withdrawals.replay(&req.request_id) {
            debug!(request_id = %req.request_id, "withdraw replayed");
            return Ok(resp);
        }

        let account = store
            .get_mut(&req.account_id)
            .ok_or_else(|| BankError::not_found("account not found"))?;

        let new_balance = match (account.balance.as_ref(), req.amount.as_ref()) {
            (current, None) => current.cloned(),
            (Some(current), Some(amount)) => Some(subtract(current, amount).map_err(money_error)?),
            // An account opened without a balance holds zero of any currency
            (None, Some(amount)) => Some(
                subtract(&Money::zero(amount.currency.clone()), amount).map_err(money_error)?,
            ),
        };
        if req.amount.is_some() {
            ensure_non_negative(new_balance.as_ref())?;
        }
        account.balance = new_balance;

        info!(
            account_id = %req.account_id,
            request_id = %req.request_id,
            new_balance = ?account.balance,
            "withdraw"
        );

        let resp = WithdrawResponse {
            account: account.clone(),
        };
        store.withdrawals.record(req.request_id, resp.clone());
        Ok(resp)
    }

    /// Number of open accounts
    pub async fn account_count(&self) -> usize {
        self.store.read().await.len()
    }

    /// Number of responses held for replay across all operation kinds
    pub async fn cached_responses(&self) -> usize {
        self.store.read().await.cached_responses()
    }
}

/// Port status errors pass through untouched; anything below the status
/// level becomes `Internal`.
fn lookup_error(err: LookupError) -> BankError {
    match err {
        LookupError::Status(status) => status,
        LookupError::Transport(msg) => {
            BankError::internal(format!("failed to call user service: {}", msg))
        }
    }
}

/// No completed deposit or withdrawal may leave a balance below zero
fn ensure_non_negative(balance: Option<&Money>) -> Result<()> {
    if balance.is_some_and(Money::is_negative) {
        return Err(BankError::failed_precondition("insufficient balance"));
    }
    Ok(())
}

/// Balance-dependent arithmetic failures are precondition failures for
/// both deposits and withdrawals.
fn money_error(err: MoneyError) -> BankError {
    match err {
        MoneyError::CurrencyMismatch(_, _) => BankError::failed_precondition("currency mismatch"),
        MoneyError::InsufficientFunds => BankError::failed_precondition("insufficient balance"),
        MoneyError::Overflow => BankError::invalid_argument("amount out of range"),
    }
}
