//! Leadership oracle: whether this node may still accept writes for a
//! namespace.
//!
//! C5 consults this immediately before every log append, inside the
//! replication lock's read guard, so the answer is authoritative for the
//! duration of that append.

use replicheck_core::Namespace;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Reports whether this node can currently accept writes for a namespace.
pub trait LeadershipOracle: Send + Sync {
    /// True if this node still holds primary/leader status for `ns`.
    fn can_accept_writes_for(&self, ns: &Namespace) -> bool;
}

/// An oracle backed by a single flag: primary until [`InMemoryLeadershipOracle::step_down`]
/// is called, after which every namespace is rejected. A real implementation
/// would instead check per-namespace replication state; this crate only
/// ever runs as a single auditor against a single role, so one flag suffices.
#[derive(Clone, Default)]
pub struct InMemoryLeadershipOracle {
    stepped_down: Arc<AtomicBool>,
}

impl InMemoryLeadershipOracle {
    /// An oracle that reports primary for every namespace until told
    /// otherwise.
    pub fn new() -> Self {
        InMemoryLeadershipOracle::default()
    }

    /// Flip to "no longer primary" for every namespace. Idempotent.
    pub fn step_down(&self) {
        self.stepped_down.store(true, Ordering::SeqCst);
    }
}

impl LeadershipOracle for InMemoryLeadershipOracle {
    fn can_accept_writes_for(&self, _ns: &Namespace) -> bool {
        !self.stepped_down.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_until_stepped_down() {
        let oracle = InMemoryLeadershipOracle::new();
        let ns = Namespace::new("app", "users");
        assert!(oracle.can_accept_writes_for(&ns));
        oracle.step_down();
        assert!(!oracle.can_accept_writes_for(&ns));
    }

    #[test]
    fn step_down_is_visible_through_clones() {
        let oracle = InMemoryLeadershipOracle::new();
        let clone = oracle.clone();
        clone.step_down();
        assert!(!oracle.can_accept_writes_for(&Namespace::new("app", "users")));
    }
}
