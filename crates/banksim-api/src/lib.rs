mod client;
mod config;
mod dto;
mod errors;
mod handlers;
mod remote;
mod server;
mod state;

pub mod logging;

pub use client::{into_status, BankClient, LedgerClient, UserClient};
pub use config::{ConfigError, ServerConfig};
pub use dto::{
    CreateUserRequest, CreateUserResponse, DeleteUserResponse, HealthResponse,
    LedgerStatusResponse, ListUsersResponse, MoneyMovement, UpdateUserResponse,
};
pub use errors::{status_for, ApiError, ErrorBody};
pub use handlers::TIMEOUT_HEADER;
pub use remote::HttpUserLookup;
pub use server::{create_ledger_app, create_user_app};
pub use state::{LedgerState, UserState};
