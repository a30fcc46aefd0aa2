use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{BankError, Result};

/// Per-request cancellation scope.
///
/// Clones share the same cancellation flag. A context is done once it has
/// been canceled explicitly or its deadline has passed. Services only look
/// at it on entry; work already under way always runs to completion.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    canceled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// A context that is never done unless canceled
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        RequestContext {
            canceled: Arc::new(AtomicBool::new(false)),
            deadline: Some(deadline),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::SeqCst);
    }

    pub fn is_done(&self) -> bool {
        self.canceled.load(Ordering::SeqCst)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Fail with `Canceled` if the caller has already given up
    pub fn ensure_active(&self) -> Result<()> {
        if self.is_done() {
            return Err(BankError::Canceled("request canceled by client".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_context_is_active() {
        assert!(RequestContext::new().ensure_active().is_ok());
    }

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let ctx = RequestContext::new();
        let handle = ctx.clone();
        handle.cancel();
        assert!(matches!(ctx.ensure_active(), Err(BankError::Canceled(_))));
    }

    #[test]
    fn test_expired_deadline() {
        let ctx = RequestContext::with_timeout(Duration::ZERO);
        assert!(ctx.is_done());
    }
}
