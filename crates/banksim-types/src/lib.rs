mod money;
mod account;
mod context;
mod error;

pub use money::{add, subtract, Money, NANOS_PER_UNIT};
pub use account::{Account, AccountId, RequestId, UserId, UserInfo};
pub use context::RequestContext;
pub use error::{BankError, ErrorKind, MoneyError, Result};
