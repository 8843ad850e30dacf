//! Resource budget requested before walking the content tree.

use std::time::Duration;

use tracing::{debug, warn};

/// Ceilings the collection pass asks the host environment for.
///
/// `None` on either field asks for the ceiling to be lifted entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BudgetRequest {
    pub memory_bytes: Option<u64>,
    pub time: Option<Duration>,
}

impl BudgetRequest {
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// True when neither ceiling is set.
    pub fn is_unbounded(&self) -> bool {
        self.memory_bytes.is_none() && self.time.is_none()
    }
}

/// Host collaborator that can raise memory and time ceilings for the current operation.
pub trait ResourceBudget: Send + Sync {
    fn request(&self, request: &BudgetRequest);
}

/// Budget for hosts that impose no per-operation ceilings.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopBudget;

impl ResourceBudget for NoopBudget {
    fn request(&self, request: &BudgetRequest) {
        if !request.is_unbounded() {
            warn!(
                target = "publish::budget",
                memory_bytes = ?request.memory_bytes,
                time = ?request.time,
                "collection limits configured but no resource budget installed; limits ignored"
            );
            return;
        }
        debug!(
            target = "publish::budget",
            memory_bytes = ?request.memory_bytes,
            time = ?request.time,
            "resource budget requested"
        );
    }
}
