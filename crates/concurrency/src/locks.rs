//! Lock discipline between the log bridge and leadership transfer.
//!
//! The host database models this as a global intent-exclusive lock for
//! appenders that is incompatible with the exclusive lock leadership
//! transfer takes during stepdown. A `parking_lot::RwLock<()>` is a faithful
//! stand-in: the read side (taken by every append) is freely concurrent
//! with itself, and is mutually exclusive with the write side (taken once,
//! during stepdown) — exactly the compatibility matrix the host's named
//! lock modes provide, without needing to name them.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Shared state behind [`ReplicationLock`] and [`LeadershipTransfer`]. Build
/// one per run and hand a clone of each side to the collaborator that needs
/// it.
#[derive(Clone, Default)]
pub struct LockDomain {
    inner: Arc<RwLock<()>>,
}

impl LockDomain {
    /// A fresh, unheld lock domain.
    pub fn new() -> Self {
        LockDomain::default()
    }

    /// The read side, acquired by every C5 append.
    pub fn replication_lock(&self) -> ReplicationLock {
        ReplicationLock(Arc::clone(&self.inner))
    }

    /// The write side, acquired once during stepdown.
    pub fn leadership_transfer(&self) -> LeadershipTransfer {
        LeadershipTransfer(Arc::clone(&self.inner))
    }
}

/// The read (shared) side of a [`LockDomain`]. Multiple concurrent appends,
/// including from other auditor runs, may hold this at once.
#[derive(Clone)]
pub struct ReplicationLock(Arc<RwLock<()>>);

impl ReplicationLock {
    /// Block until the lock is acquired. Unlimited wait, matching the host
    /// database's IX-lock semantics: there is no bound on how long a
    /// concurrent stepdown's exclusive hold can take.
    pub fn acquire(&self) -> RwLockReadGuard<'_, ()> {
        self.0.read()
    }
}

/// The write (exclusive) side of a [`LockDomain`], held for the duration of
/// a leadership transfer.
#[derive(Clone)]
pub struct LeadershipTransfer(Arc<RwLock<()>>);

impl LeadershipTransfer {
    /// Block until every in-flight append has released the read side, then
    /// hold exclusively.
    pub fn acquire(&self) -> RwLockWriteGuard<'_, ()> {
        self.0.write()
    }
}

/// The database-level shared catalog lock taken by the run planner and by
/// each per-collection setup step in the executor. Readers never block each
/// other; it exists to serialize against catalog mutation, which this
/// workspace models only as a trait boundary ([`replicheck_storage`] isn't a
/// dependency here to avoid a cycle — callers pass their own catalog
/// reference alongside this lock).
#[derive(Clone, Default)]
pub struct CatalogLock {
    inner: Arc<RwLock<()>>,
}

impl CatalogLock {
    /// A fresh, unheld catalog lock.
    pub fn new() -> Self {
        CatalogLock::default()
    }

    /// Acquire the shared catalog lock.
    pub fn acquire_shared(&self) -> RwLockReadGuard<'_, ()> {
        self.inner.read()
    }
}
