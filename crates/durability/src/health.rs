//! The health log sink collaborator.
//!
//! Every health-log write is infallible from the executor's point of view:
//! a sink that cannot durably record an entry still accepts it and logs the
//! failure itself, rather than forcing the run to retry or abort. This
//! mirrors the host database's own health log, which is an unreplicated,
//! best-effort local collection.

use parking_lot::Mutex;
use replicheck_core::HealthLogEntry;
use tracing::{error, info, warn};

/// Records health-log entries. Infallible by design: implementations must
/// swallow their own I/O errors rather than propagate them to the executor.
pub trait HealthSink: Send + Sync {
    /// Append `entry`. Must not block the caller indefinitely and must not
    /// return an error.
    fn log(&self, entry: HealthLogEntry);
}

/// An in-memory [`HealthSink`] that keeps every entry for inspection and
/// mirrors each one to the tracing subscriber at the tracing level
/// corresponding to the entry's severity.
#[derive(Default)]
pub struct InMemoryHealthSink {
    entries: Mutex<Vec<HealthLogEntry>>,
}

impl InMemoryHealthSink {
    /// An empty sink.
    pub fn new() -> Self {
        InMemoryHealthSink::default()
    }

    /// Every entry logged so far, oldest first.
    pub fn entries(&self) -> Vec<HealthLogEntry> {
        self.entries.lock().clone()
    }
}

impl HealthSink for InMemoryHealthSink {
    fn log(&self, entry: HealthLogEntry) {
        match &entry {
            HealthLogEntry::Batch {
                namespace,
                severity,
                min_key,
                max_key,
                count,
                bytes,
                digest,
                success,
                ..
            } => {
                use replicheck_core::HealthSeverity::*;
                let msg = "db_check batch result";
                match severity {
                    Info => info!(%namespace, ?min_key, ?max_key, count, bytes, %digest, success, msg),
                    Warning => warn!(%namespace, ?min_key, ?max_key, count, bytes, %digest, success, msg),
                    Error => error!(%namespace, ?min_key, ?max_key, count, bytes, %digest, success, msg),
                }
            }
            HealthLogEntry::Error {
                namespace,
                severity,
                reason,
            } => {
                use replicheck_core::HealthSeverity::*;
                match severity {
                    Info => info!(namespace = ?namespace, reason, "db_check error"),
                    Warning => warn!(namespace = ?namespace, reason, "db_check error"),
                    Error => error!(namespace = ?namespace, reason, "db_check error"),
                }
            }
        }
        self.entries.lock().push(entry);
    }
}
