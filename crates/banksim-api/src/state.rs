use banksim_ledger::LedgerService;
use banksim_users::{UserDirectory, UserLookup};
use std::sync::Arc;

/// Shared state of the ledger router
#[derive(Clone)]
pub struct LedgerState {
    pub ledger: Arc<LedgerService>,
}

impl LedgerState {
    pub fn new(users: Arc<dyn UserLookup>) -> Self {
        LedgerState {
            ledger: Arc::new(LedgerService::new(users)),
        }
    }
}

/// Shared state of the user directory router
#[derive(Clone)]
pub struct UserState {
    pub users: Arc<UserDirectory>,
}

impl UserState {
    pub fn new() -> Self {
        UserState {
            users: Arc::new(UserDirectory::new()),
        }
    }
}

impl Default for UserState {
    fn default() -> Self {
        Self::new()
    }
}
