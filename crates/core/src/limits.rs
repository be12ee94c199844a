//! Per-collection and per-batch limits.
//!
//! ## Contract
//!
//! `BatchCaps` defaults to the largest representable positive integer for
//! both fields, matching spec §3's `CollectionInfo` default. The executor's
//! fixed per-batch ceilings (`kBatchDocs`, `kBatchBytes`) live alongside
//! these as named constants, since both are "the numbers that bound a
//! batch" and belong in one place.

/// Per-batch document count ceiling enforced by the executor regardless of
/// any larger user-supplied cap (`kBatchDocs` in spec §4.4).
pub const BATCH_DOC_CEILING: u64 = 5_000;

/// Per-batch byte ceiling enforced by the executor regardless of any larger
/// user-supplied cap (`kBatchBytes` in spec §4.4).
pub const BATCH_BYTE_CEILING: u64 = 20_000_000;

/// User-supplied (or default) caps on an audited collection range.
///
/// `max_docs` / `max_bytes` bound the whole collection (or sub-range); the
/// per-batch ceilings above additionally bound a single batch within that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchCaps {
    /// Maximum total documents to hash across the whole run for this
    /// collection.
    pub max_docs: u64,
    /// Maximum total bytes to hash across the whole run for this
    /// collection.
    pub max_bytes: u64,
}

impl Default for BatchCaps {
    fn default() -> Self {
        BatchCaps {
            max_docs: u64::MAX,
            max_bytes: u64::MAX,
        }
    }
}

impl BatchCaps {
    /// Caps for a single batch: the smaller of the per-batch ceiling and
    /// whatever budget remains of the collection-wide cap.
    pub fn remaining_batch_caps(&self, docs_so_far: u64, bytes_so_far: u64) -> (u64, u64) {
        let docs_budget = self.max_docs.saturating_sub(docs_so_far);
        let bytes_budget = self.max_bytes.saturating_sub(bytes_so_far);
        (
            BATCH_DOC_CEILING.min(docs_budget),
            BATCH_BYTE_CEILING.min(bytes_budget),
        )
    }
}
