use async_trait::async_trait;
use banksim_types::{BankError, RequestContext, UserId, UserInfo};
use thiserror::Error;

/// Why a user lookup failed.
///
/// `Status` is a definite answer from the user service and is forwarded to
/// callers as-is. `Transport` means no answer was obtained at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error(transparent)]
    Status(#[from] BankError),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Port through which the ledger validates user identities
/// Implemented in-process by [`UserDirectory`](crate::UserDirectory) and
/// over the network by the API crate's remote client
#[async_trait]
pub trait UserLookup: Send + Sync {
    /// Fetch a user by id
    async fn get_user(&self, ctx: &RequestContext, id: &UserId) -> Result<UserInfo, LookupError>;
}
