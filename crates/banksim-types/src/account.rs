use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Money;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                $name(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(s.to_string())
            }
        }
    };
}

string_id!(
    /// Opaque account identifier, assigned by the ledger
    AccountId
);

string_id!(
    /// Opaque user identifier, assigned by the user directory
    UserId
);

string_id!(
    /// Client-supplied idempotency key
    RequestId
);

/// User profile as held by the user directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: UserId,
    pub login: String,
    pub email: String,
}

/// Ledger account.
///
/// `owner` is a snapshot taken when the account was opened; later edits to
/// the user record are not reflected here. `balance` is absent when the
/// account was opened without an initial balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub owner: UserInfo,
    pub balance: Option<Money>,
}

impl Account {
    /// Zero or absent balance
    pub fn has_zero_balance(&self) -> bool {
        self.balance.as_ref().map_or(true, Money::is_zero)
    }
}
