//! Request and response shapes of the ledger surface.
//!
//! Every request field defaults when missing so that validation happens in
//! the service and reports `InvalidArgument`, not in the decoder.

use banksim_types::{Account, AccountId, Money, RequestId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    #[serde(default)]
    pub user_id: UserId,
    #[serde(default)]
    pub initial_balance: Option<Money>,
    #[serde(default)]
    pub request_id: RequestId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAccountResponse {
    pub account: Account,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetAccountRequest {
    #[serde(default)]
    pub id: AccountId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetAccountResponse {
    pub account: Account,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAccountsRequest {
    #[serde(default)]
    pub user_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAccountsResponse {
    pub accounts: Vec<Account>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAccountRequest {
    #[serde(default)]
    pub account_id: AccountId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAccountResponse {
    pub account_id: AccountId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositRequest {
    #[serde(default)]
    pub account_id: AccountId,
    #[serde(default)]
    pub amount: Option<Money>,
    #[serde(default)]
    pub request_id: RequestId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositResponse {
    pub account: Account,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawRequest {
    #[serde(default)]
    pub account_id: AccountId,
    #[serde(default)]
    pub amount: Option<Money>,
    #[serde(default)]
    pub request_id: RequestId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawResponse {
    pub account: Account,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_empty() {
        let req: DepositRequest = serde_json::from_str("{}").unwrap();
        assert!(req.account_id.is_empty());
        assert!(req.request_id.is_empty());
        assert!(req.amount.is_none());
    }

    #[test]
    fn test_create_request_from_wire() {
        let req: CreateAccountRequest = serde_json::from_str(
            r#"{"user_id":"u1","initial_balance":{"currency":"USD","units":5},"request_id":"r1"}"#,
        )
        .unwrap();
        assert_eq!(req.user_id, UserId::new("u1"));
        assert_eq!(req.initial_balance, Some(Money::from_units("USD", 5)));
        assert_eq!(req.request_id, RequestId::new("r1"));
    }
}
