//! Log Bridge (C5): transactional append under a lock discipline mutually
//! exclusive with leadership transfer.
//!
//! Every append goes through the same three steps regardless of what's
//! being appended (a Collection record or a Batch record): acquire the
//! replication lock's read side, check interruption, check writability,
//! append. Any failure here sets the run's [`TerminalFlag`] and the
//! executor must not emit any further record.

use std::sync::Arc;

use replicheck_concurrency::{ReplicationLock, TerminalFlag};
use replicheck_core::{Error, LogRecord, Namespace, Timestamp};
use replicheck_durability::WriteLog;

use crate::oracle::LeadershipOracle;

/// The C5 collaborator bundle: one replication lock side, one leadership
/// oracle, one write log, sharing a run's terminal flag with the executor.
///
/// Owns `Arc`s rather than borrows so a bridge can be moved into the
/// executor's dedicated worker thread.
#[derive(Clone)]
pub struct LogBridge {
    replication_lock: ReplicationLock,
    oracle: Arc<dyn LeadershipOracle>,
    write_log: Arc<dyn WriteLog>,
    terminal_flag: TerminalFlag,
    /// Set by the executor before each append; checked here as the
    /// cooperative-interruption source independent of stepdown.
    interrupted: Arc<dyn Fn() -> bool + Send + Sync>,
}

impl LogBridge {
    /// Build a bridge over the given collaborators for one run.
    pub fn new(
        replication_lock: ReplicationLock,
        oracle: Arc<dyn LeadershipOracle>,
        write_log: Arc<dyn WriteLog>,
        terminal_flag: TerminalFlag,
        interrupted: Arc<dyn Fn() -> bool + Send + Sync>,
    ) -> Self {
        LogBridge {
            replication_lock,
            oracle,
            write_log,
            terminal_flag,
            interrupted,
        }
    }

    /// Append `record` for `ns`, returning the timestamp the write log
    /// assigned it.
    ///
    /// On [`Error::Interrupted`] or [`Error::PrimarySteppedDown`] the run's
    /// terminal flag is set before returning; the caller must not attempt
    /// any further append in this run.
    pub fn append(&self, ns: &Namespace, record: LogRecord) -> Result<Timestamp, Error> {
        let _guard = self.replication_lock.acquire();

        if (self.interrupted)() {
            self.terminal_flag.set();
            return Err(Error::Interrupted);
        }

        if !self.oracle.can_accept_writes_for(ns) {
            self.terminal_flag.set();
            return Err(Error::PrimarySteppedDown);
        }

        self.write_log.append(record)
    }
}
