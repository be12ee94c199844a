//! The replicated write log collaborator.
//!
//! `WriteLog::append` is the seam C5 calls after its lock and interruption
//! checks pass. A real implementation serializes the append through the
//! host's own replicated log and its own write-write-conflict retry; the
//! in-memory implementation here retries a caller-injected conflict
//! predicate the same number of times a real unit-of-work would, so tests
//! can exercise the retry path without a real consensus log.

use parking_lot::Mutex;
use replicheck_core::{Error, LogRecord, Timestamp};

/// Appends records to the replicated write log, returning the timestamp the
/// log assigned to the appended record.
pub trait WriteLog: Send + Sync {
    /// Append `record`, retrying internally on write-write conflicts.
    fn append(&self, record: LogRecord) -> Result<Timestamp, Error>;
}

/// An in-memory [`WriteLog`] that assigns monotonically increasing
/// timestamps and keeps every appended record for inspection.
pub struct InMemoryWriteLog {
    records: Mutex<Vec<(Timestamp, LogRecord)>>,
    next_timestamp: Mutex<u64>,
    /// When `Some(n)`, the next `n` append attempts return a conflict
    /// before succeeding, exercising the retry loop a real unit-of-work
    /// would run.
    inject_conflicts: Mutex<u32>,
}

impl InMemoryWriteLog {
    /// An empty log starting at [`Timestamp::ZERO`].
    pub fn new() -> Self {
        InMemoryWriteLog {
            records: Mutex::new(Vec::new()),
            next_timestamp: Mutex::new(1),
            inject_conflicts: Mutex::new(0),
        }
    }

    /// Make the next `n` append calls retry once each before succeeding.
    pub fn inject_conflicts(&self, n: u32) {
        *self.inject_conflicts.lock() = n;
    }

    /// Every record appended so far, oldest first.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().iter().map(|(_, r)| r.clone()).collect()
    }
}

impl Default for InMemoryWriteLog {
    fn default() -> Self {
        Self::new()
    }
}

const MAX_CONFLICT_RETRIES: u32 = 5;

impl WriteLog for InMemoryWriteLog {
    fn append(&self, record: LogRecord) -> Result<Timestamp, Error> {
        let mut attempts = 0;
        loop {
            let mut pending = self.inject_conflicts.lock();
            if *pending > 0 {
                *pending -= 1;
                drop(pending);
                attempts += 1;
                if attempts > MAX_CONFLICT_RETRIES {
                    return Err(Error::AppendFailed(
                        "exhausted retries on write-write conflict".into(),
                    ));
                }
                continue;
            }
            drop(pending);
            break;
        }

        let mut next = self.next_timestamp.lock();
        let ts = Timestamp::from_u64(*next);
        *next += 1;
        drop(next);

        self.records.lock().push((ts, record));
        Ok(ts)
    }
}
