//! The run/collection/batch data model.
//!
//! A strict tree: [`Run`] owns a sequence of [`CollectionInfo`], each
//! collection produces a sequence of transient [`BatchStats`], and each batch
//! is mirrored into two append-only records: a [`LogRecord`] destined for the
//! replicated write log, and a [`HealthLogEntry`] destined for the node-local
//! health sink.

use crate::digest::Digest;
use crate::key::Key;
use crate::limits::BatchCaps;
use crate::namespace::Namespace;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Logical timestamp assigned by the write log to an appended record.
///
/// Unlike wall-clock time, this value is meaningful only as something the
/// write log hands back on append and the health-log entry carries forward
/// for the secondary-side comparison; ordering is all that's guaranteed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The zero timestamp, used before any record has been appended.
    pub const ZERO: Timestamp = Timestamp(0);

    /// Wrap a raw logical timestamp value.
    pub const fn from_u64(value: u64) -> Self {
        Timestamp(value)
    }

    /// Unwrap the raw logical timestamp value.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Timestamp::ZERO
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single document as the batch hasher sees it: its key, plus the raw
/// bytes the hasher folds into the running digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// The document's key in the collection's key domain.
    pub key: Key,
    /// Raw document bytes contributed to the batch digest.
    pub bytes: Vec<u8>,
}

impl Document {
    /// Construct a document from a key and its bytes.
    pub fn new(key: Key, bytes: impl Into<Vec<u8>>) -> Self {
        Document {
            key,
            bytes: bytes.into(),
        }
    }
}

/// A single collection's audit range and caps, as produced by the run
/// planner. Immutable once planned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionInfo {
    /// The collection being audited.
    pub namespace: Namespace,
    /// Inclusive start of the audited range; `Key::MinKey` for a full run.
    pub start_key: Key,
    /// Inclusive end of the audited range; `Key::MaxKey` for a full run.
    pub end_key: Key,
    /// Caps on total documents/bytes hashed across the whole collection.
    pub caps: BatchCaps,
}

impl CollectionInfo {
    /// Build a whole-collection entry: `MinKey..MaxKey`, unbounded caps.
    pub fn full_range(namespace: Namespace) -> Self {
        CollectionInfo {
            namespace,
            start_key: Key::MinKey,
            end_key: Key::MaxKey,
            caps: BatchCaps::default(),
        }
    }

    /// Build a sub-range entry, validating `start_key <= end_key`.
    pub fn sub_range(
        namespace: Namespace,
        start_key: Key,
        end_key: Key,
        caps: BatchCaps,
    ) -> Result<Self, CollectionInfoError> {
        if start_key > end_key {
            return Err(CollectionInfoError::StartAfterEnd);
        }
        Ok(CollectionInfo {
            namespace,
            start_key,
            end_key,
            caps,
        })
    }
}

/// Invariant violations rejected at [`CollectionInfo`] construction.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CollectionInfoError {
    /// `start_key` sorted after `end_key`.
    #[error("start_key must not sort after end_key")]
    StartAfterEnd,
}

/// A finite, ordered sequence of [`CollectionInfo`] produced by the run
/// planner. Processed strictly in order; never in parallel across
/// collections within one run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Run {
    collections: Vec<CollectionInfo>,
}

impl Run {
    /// Build a run from an already-ordered list of collection entries.
    pub fn new(collections: Vec<CollectionInfo>) -> Self {
        Run { collections }
    }

    /// Iterate the run's collections in processing order.
    pub fn iter(&self) -> impl Iterator<Item = &CollectionInfo> {
        self.collections.iter()
    }

    /// Number of collections in the run.
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    /// True if the run has no collections to process.
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}

impl IntoIterator for Run {
    type Item = CollectionInfo;
    type IntoIter = std::vec::IntoIter<CollectionInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.collections.into_iter()
    }
}

/// The transient result of one batch hasher invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchStats {
    /// Documents hashed in this batch.
    pub n_docs: u64,
    /// Bytes hashed in this batch.
    pub n_bytes: u64,
    /// Key of the last document hashed, or the batch's start key if none
    /// were hashed (the empty-terminal case).
    pub last_key: Key,
    /// Content digest over every document visited, in key order.
    pub digest: Digest,
    /// Timestamp returned by the write log once the batch record is
    /// appended; absent until the append happens.
    pub log_timestamp: Timestamp,
}

/// Severity recorded alongside a health-log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthSeverity {
    /// Routine progress entry.
    Info,
    /// A recoverable anomaly worth an operator's attention.
    Warning,
    /// A failure that aborted a collection or the whole run.
    Error,
}

/// A metadata record for one collection, published to the write log before
/// its first batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRecord {
    /// The collection this record describes.
    pub namespace: Namespace,
    /// The collection's catalog UUID.
    pub uuid: Uuid,
    /// UUID of the collection immediately before this one in catalog UUID
    /// order, if any.
    pub prev_uuid: Option<Uuid>,
    /// UUID of the collection immediately after this one in catalog UUID
    /// order, if any.
    pub next_uuid: Option<Uuid>,
    /// Index specs, opaque to the auditor, carried for secondary
    /// comparison.
    pub indexes: Vec<String>,
    /// Collection creation options, opaque to the auditor.
    pub options: serde_json::Value,
}

/// A batch record, published to the write log after each batch hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRecord {
    /// The collection this batch belongs to.
    pub namespace: Namespace,
    /// Inclusive-ish lower key boundary of this batch (see key-boundary
    /// contract: equal to the previous batch's `max_key`).
    pub min_key: Key,
    /// Upper key boundary of this batch: the last key hashed, or `MaxKey`
    /// for the terminal batch of a full run.
    pub max_key: Key,
    /// Content digest over this batch's documents.
    pub digest: Digest,
}

/// A record destined for the replicated write log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LogRecord {
    /// A [`CollectionRecord`].
    Collection(CollectionRecord),
    /// A [`BatchRecord`].
    Batch(BatchRecord),
}

/// An entry in the node-local, append-only health log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation")]
pub enum HealthLogEntry {
    /// A successfully hashed (or attempted) batch.
    #[serde(rename = "dbCheckBatch")]
    Batch {
        /// The collection the batch belongs to.
        namespace: Namespace,
        /// Entry severity; `Info` on success.
        severity: HealthSeverity,
        /// Lower key boundary of the batch.
        min_key: Key,
        /// Upper key boundary of the batch.
        max_key: Key,
        /// Documents hashed.
        count: u64,
        /// Bytes hashed.
        bytes: u64,
        /// Content digest over the batch.
        digest: Digest,
        /// Whether the batch completed and was durably appended.
        success: bool,
        /// Timestamp the write log assigned to the corresponding batch
        /// record.
        timestamp: Timestamp,
    },
    /// A failure that aborted a collection or the whole run.
    Error {
        /// The collection in progress when the failure occurred, if any
        /// (run-terminal errors that precede any collection have none).
        namespace: Option<Namespace>,
        /// Always `Error`.
        severity: HealthSeverity,
        /// Machine-readable failure reason (see `reason_code` on the
        /// crate's error types).
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_info_full_range_defaults_are_unbounded() {
        let info = CollectionInfo::full_range(Namespace::new("app", "users"));
        assert_eq!(info.start_key, Key::MinKey);
        assert_eq!(info.end_key, Key::MaxKey);
        assert_eq!(info.caps, BatchCaps::default());
    }

    #[test]
    fn collection_info_sub_range_rejects_start_after_end() {
        let err = CollectionInfo::sub_range(
            Namespace::new("app", "users"),
            Key::real(b"z".to_vec()),
            Key::real(b"a".to_vec()),
            BatchCaps::default(),
        )
        .unwrap_err();
        assert_eq!(err, CollectionInfoError::StartAfterEnd);
    }

    #[test]
    fn collection_info_sub_range_accepts_equal_bounds() {
        let key = Key::real(b"m".to_vec());
        let info = CollectionInfo::sub_range(
            Namespace::new("app", "users"),
            key.clone(),
            key.clone(),
            BatchCaps::default(),
        )
        .unwrap();
        assert_eq!(info.start_key, key);
    }

    #[test]
    fn run_preserves_order_and_len() {
        let ns_a = Namespace::new("app", "a");
        let ns_b = Namespace::new("app", "b");
        let run = Run::new(vec![
            CollectionInfo::full_range(ns_a.clone()),
            CollectionInfo::full_range(ns_b.clone()),
        ]);
        assert_eq!(run.len(), 2);
        let namespaces: Vec<_> = run.iter().map(|c| c.namespace.clone()).collect();
        assert_eq!(namespaces, vec![ns_a, ns_b]);
    }

    #[test]
    fn empty_run_reports_empty() {
        assert!(Run::default().is_empty());
    }

    #[test]
    fn health_log_entry_batch_serializes_with_operation_tag() {
        let entry = HealthLogEntry::Batch {
            namespace: Namespace::new("app", "users"),
            severity: HealthSeverity::Info,
            min_key: Key::MinKey,
            max_key: Key::MaxKey,
            count: 0,
            bytes: 0,
            digest: Digest::ZERO,
            success: true,
            timestamp: Timestamp::ZERO,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["operation"], "dbCheckBatch");
    }

    #[test]
    fn log_record_round_trips_through_json() {
        let record = LogRecord::Batch(BatchRecord {
            namespace: Namespace::new("app", "users"),
            min_key: Key::MinKey,
            max_key: Key::MaxKey,
            digest: Digest::ZERO,
        });
        let json = serde_json::to_vec(&record).unwrap();
        let decoded: LogRecord = serde_json::from_slice(&json).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn timestamp_orders_and_displays() {
        assert!(Timestamp::ZERO < Timestamp::from_u64(1));
        assert_eq!(Timestamp::from_u64(42).to_string(), "42");
    }
}
