use banksim_types::RequestId;
use std::collections::HashMap;
use std::fmt;

/// Mutating operations that keep their own replay namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    CreateAccount,
    Deposit,
    Withdraw,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::CreateAccount => "create_account",
            OperationKind::Deposit => "deposit",
            OperationKind::Withdraw => "withdraw",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request id -> first successful response, for one operation kind.
///
/// Entries never expire. A replayed request id returns the stored response
/// even when the rest of the new request differs from the original.
#[derive(Debug, Clone)]
pub struct IdempotencyCache<R> {
    kind: OperationKind,
    entries: HashMap<RequestId, R>,
}

impl<R: Clone> IdempotencyCache<R> {
    pub fn new(kind: OperationKind) -> Self {
        IdempotencyCache {
            kind,
            entries: HashMap::new(),
        }
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Previously recorded response, if any
    pub fn replay(&self, request_id: &RequestId) -> Option<R> {
        self.entries.get(request_id).cloned()
    }

    /// Record the response for a request id. The first recording wins.
    pub fn record(&mut self, request_id: RequestId, response: R) {
        self.entries.entry(request_id).or_insert(response);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_record_wins() {
        let mut cache = IdempotencyCache::new(OperationKind::Deposit);
        let id = RequestId::new("r1");

        cache.record(id.clone(), 1);
        cache.record(id.clone(), 2);

        assert_eq!(cache.replay(&id), Some(1));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_miss() {
        let cache: IdempotencyCache<u32> = IdempotencyCache::new(OperationKind::Withdraw);
        assert_eq!(cache.replay(&RequestId::new("nope")), None);
        assert!(cache.is_empty());
        assert_eq!(cache.kind().as_str(), "withdraw");
    }
}
