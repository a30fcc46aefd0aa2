mod idempotency;
mod messages;
mod service;
mod store;

pub use idempotency::{IdempotencyCache, OperationKind};
pub use messages::{
    CreateAccountRequest, CreateAccountResponse, DeleteAccountRequest, DeleteAccountResponse,
    DepositRequest, DepositResponse, GetAccountRequest, GetAccountResponse, ListAccountsRequest,
    ListAccountsResponse, WithdrawRequest, WithdrawResponse,
};
pub use service::LedgerService;
pub use store::AccountStore;
