//! Shared probe budget.
//!
//! One budget caps the total number of probes across every detector that
//! shares it. Callers decide when to refill it.

use std::sync::atomic::{AtomicU32, Ordering};

/// Default number of probes
pub const DEFAULT_PROBE_BUDGET: u32 = 3;

#[derive(Debug)]
pub struct RetryBudget {
    remaining: AtomicU32,
}

impl RetryBudget {
    pub fn new(attempts: u32) -> Self {
        Self {
            remaining: AtomicU32::new(attempts),
        }
    }

    /// Take one unit. Returns false once the budget is spent.
    pub fn try_consume(&self) -> bool {
        self.remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok()
    }

    pub fn remaining(&self) -> u32 {
        self.remaining.load(Ordering::Acquire)
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Refill to `attempts`
    pub fn reset(&self, attempts: u32) {
        self.remaining.store(attempts, Ordering::Release);
    }
}

impl Default for RetryBudget {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_BUDGET)
    }
}
