//! The worker's one-shot cooperative-cancellation flag.
//!
//! A single boolean, shared between the executor's main loop and the log
//! bridge. Either source of cancellation (interruption, stepdown) sets it;
//! the main loop inspects it after every C5 call and after every batch, and
//! once set, exits its per-collection and per-run loops without emitting
//! further records. It is one-shot: nothing ever clears it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared terminal flag for one run.
#[derive(Debug, Clone, Default)]
pub struct TerminalFlag(Arc<AtomicBool>);

impl TerminalFlag {
    /// A fresh, unset flag.
    pub fn new() -> Self {
        TerminalFlag(Arc::new(AtomicBool::new(false)))
    }

    /// Set the flag. Idempotent: setting an already-set flag is a no-op.
    pub fn set(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// True once [`TerminalFlag::set`] has been called at least once.
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
