use banksim_types::{Account, AccountId, UserId};
use std::collections::HashMap;

use crate::idempotency::{IdempotencyCache, OperationKind};
use crate::messages::{CreateAccountResponse, DepositResponse, WithdrawResponse};

/// All mutable ledger state: accounts plus the replay caches of the three
/// idempotent operations.
///
/// The store itself is not synchronized; [`LedgerService`](crate::LedgerService)
/// keeps it behind a single readers-writer lock.
#[derive(Debug, Clone)]
pub struct AccountStore {
    accounts: HashMap<AccountId, Account>,
    pub(crate) creations: IdempotencyCache<CreateAccountResponse>,
    pub(crate) deposits: IdempotencyCache<DepositResponse>,
    pub(crate) withdrawals: IdempotencyCache<WithdrawResponse>,
}

impl AccountStore {
    /// Create a new empty store
    pub fn new() -> Self {
        AccountStore {
            accounts: HashMap::new(),
            creations: IdempotencyCache::new(OperationKind::CreateAccount),
            deposits: IdempotencyCache::new(OperationKind::Deposit),
            withdrawals: IdempotencyCache::new(OperationKind::Withdraw),
        }
    }

    pub fn get(&self, id: &AccountId) -> Option<&Account> {
        self.accounts.get(id)
    }

    pub fn get_mut(&mut self, id: &AccountId) -> Option<&mut Account> {
        self.accounts.get_mut(id)
    }

    pub fn contains(&self, id: &AccountId) -> bool {
        self.accounts.contains_key(id)
    }

    pub fn insert(&mut self, account: Account) {
        self.accounts.insert(account.id.clone(), account);
    }

    pub fn remove(&mut self, id: &AccountId) -> Option<Account> {
        self.accounts.remove(id)
    }

    /// Accounts whose owner snapshot matches `user`, in map order
    pub fn owned_by(&self, user: &UserId) -> Vec<Account> {
        self.accounts
            .values()
            .filter(|account| &account.owner.id == user)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Total number of recorded idempotency entries across all kinds
    pub fn cached_responses(&self) -> usize {
        self.creations.len() + self.deposits.len() + self.withdrawals.len()
    }
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banksim_types::{Money, UserInfo};

    fn account(id: &str, owner: &str) -> Account {
        Account {
            id: AccountId::new(id),
            owner: UserInfo {
                id: UserId::new(owner),
                login: owner.to_string(),
                email: format!("{}@bank.io", owner),
            },
            balance: Some(Money::zero("USD")),
        }
    }

    #[test]
    fn test_insert_get_remove() {
        let mut store = AccountStore::new();
        store.insert(account("a1", "alice"));

        assert!(store.contains(&AccountId::new("a1")));
        assert_eq!(store.get(&AccountId::new("a1")).unwrap().owner.login, "alice");

        let removed = store.remove(&AccountId::new("a1")).unwrap();
        assert_eq!(removed.id, AccountId::new("a1"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_owned_by() {
        let mut store = AccountStore::new();
        store.insert(account("a1", "alice"));
        store.insert(account("a2", "bob"));
        store.insert(account("a3", "alice"));

        let mut ids: Vec<_> = store
            .owned_by(&UserId::new("alice"))
            .into_iter()
            .map(|a| a.id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec![AccountId::new("a1"), AccountId::new("a3")]);
        assert!(store.owned_by(&UserId::new("carol")).is_empty());
    }

    #[test]
    fn test_balance_mutates_in_place() {
        let mut store = AccountStore::new();
        store.insert(account("a1", "alice"));

        store.get_mut(&AccountId::new("a1")).unwrap().balance = Some(Money::from_units("USD", 7));
        assert_eq!(
            store.get(&AccountId::new("a1")).unwrap().balance,
            Some(Money::from_units("USD", 7))
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.cached_responses(), 0);
    }
}
