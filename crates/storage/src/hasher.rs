//! Batch hasher: the core iterate-and-digest primitive.
//!
//! Canonical bytes hashed per document are `key.encode() ++ doc.bytes`
//! (the key first, so two documents that differ only in key never collide
//! in the running digest), streamed into a single SHA-256 state across the
//! whole batch rather than buffered — the hash is ready the moment the last
//! document is consumed.

use replicheck_core::{BatchStats, Digest, Key, Timestamp};
use sha2::{Digest as _, Sha256};

use crate::catalog::CollectionSnapshot;

/// Iterate `snapshot` from `start` until the first of `max_docs` documents,
/// `max_bytes` cumulative bytes, or a key beyond `end_key` is hit.
///
/// `start` is treated inclusively when it is [`Key::MinKey`] (the first
/// batch of a collection) and exclusively otherwise (every later batch,
/// where `start` is the previous batch's `last_key`), per the hasher's
/// contract.
///
/// When iteration runs out of documents before hitting any cap or the
/// `end_key` boundary, the whole `[start, end_key]` range has been
/// consumed: `last_key` is reported as `end_key` rather than the raw key of
/// the last document actually hashed (or `start` itself, if the range held
/// no documents at all). This is what lets the executor satisfy the
/// key-boundary contract — the final batch of a full scan must report
/// `MaxKey`, which no real key ever equals — without special-casing the
/// empty-range case separately.
pub fn compute_batch(
    snapshot: &dyn CollectionSnapshot,
    start: &Key,
    end_key: &Key,
    max_docs: u64,
    max_bytes: u64,
) -> BatchStats {
    let inclusive = start.is_min();
    let mut hasher = Sha256::new();
    let mut n_docs: u64 = 0;
    let mut n_bytes: u64 = 0;
    let mut last_key = start.clone();
    let mut exhausted = true;

    for doc in snapshot.iter_from(start, inclusive) {
        if &doc.key > end_key {
            // The next document lies beyond end_key: the requested range
            // [start, end_key] has been fully consumed, same as running off
            // the end of the collection. Leave `exhausted` set so `last_key`
            // reports `end_key`, not the last document actually hashed.
            break;
        }
        if n_docs >= max_docs {
            exhausted = false;
            break;
        }
        let doc_bytes = doc.bytes.len() as u64;
        if n_docs > 0 && n_bytes.saturating_add(doc_bytes) > max_bytes {
            exhausted = false;
            break;
        }

        hasher.update(doc.key.encode());
        hasher.update(&doc.bytes);
        n_docs += 1;
        n_bytes += doc_bytes;
        last_key = doc.key;

        if n_bytes >= max_bytes {
            exhausted = false;
            break;
        }
    }

    if exhausted {
        last_key = end_key.clone();
    }

    let digest = if n_docs == 0 {
        Digest::ZERO
    } else {
        Digest::new(hasher.finalize().into())
    };

    BatchStats {
        n_docs,
        n_bytes,
        last_key,
        digest,
        log_timestamp: Timestamp::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryCollection;
    use replicheck_core::Document;

    fn doc(key: &str, bytes: &str) -> Document {
        Document::new(Key::real(key.as_bytes().to_vec()), bytes.as_bytes().to_vec())
    }

    #[test]
    fn empty_collection_yields_zero_digest_and_reports_end_key() {
        let coll = InMemoryCollection::new(vec![]);
        let snap = coll.snapshot_for_test();
        let stats = compute_batch(&*snap, &Key::MinKey, &Key::MaxKey, u64::MAX, u64::MAX);
        assert_eq!(stats.n_docs, 0);
        assert_eq!(stats.n_bytes, 0);
        assert_eq!(stats.last_key, Key::MaxKey);
        assert_eq!(stats.digest, Digest::ZERO);
    }

    #[test]
    fn hashes_everything_in_one_batch_when_caps_are_unbounded() {
        let coll = InMemoryCollection::new(vec![doc("a", "1"), doc("b", "22"), doc("c", "333")]);
        let snap = coll.snapshot_for_test();
        let stats = compute_batch(&*snap, &Key::MinKey, &Key::MaxKey, u64::MAX, u64::MAX);
        assert_eq!(stats.n_docs, 3);
        assert_eq!(stats.n_bytes, 1 + 2 + 3);
        assert_eq!(stats.last_key, Key::MaxKey);
    }

    #[test]
    fn doc_count_cap_stops_the_batch() {
        let coll = InMemoryCollection::new(vec![doc("a", "1"), doc("b", "1"), doc("c", "1")]);
        let snap = coll.snapshot_for_test();
        let stats = compute_batch(&*snap, &Key::MinKey, &Key::MaxKey, 2, u64::MAX);
        assert_eq!(stats.n_docs, 2);
        assert_eq!(stats.last_key, Key::real(b"b".to_vec()));
    }

    #[test]
    fn byte_cap_still_admits_a_single_oversized_document() {
        let coll = InMemoryCollection::new(vec![doc("a", "1234567890"), doc("b", "1")]);
        let snap = coll.snapshot_for_test();
        let stats = compute_batch(&*snap, &Key::MinKey, &Key::MaxKey, u64::MAX, 4);
        assert_eq!(stats.n_docs, 1);
        assert_eq!(stats.last_key, Key::real(b"a".to_vec()));
    }

    #[test]
    fn end_key_bounds_the_batch() {
        let coll = InMemoryCollection::new(vec![doc("a", "1"), doc("b", "1"), doc("c", "1")]);
        let snap = coll.snapshot_for_test();
        let stats = compute_batch(
            &*snap,
            &Key::MinKey,
            &Key::real(b"b".to_vec()),
            u64::MAX,
            u64::MAX,
        );
        assert_eq!(stats.n_docs, 2);
        assert_eq!(stats.last_key, Key::real(b"b".to_vec()));
    }

    #[test]
    fn resuming_from_a_prior_last_key_excludes_it() {
        let coll = InMemoryCollection::new(vec![doc("a", "1"), doc("b", "1"), doc("c", "1")]);
        let snap = coll.snapshot_for_test();
        let first = compute_batch(&*snap, &Key::MinKey, &Key::MaxKey, 1, u64::MAX);
        assert_eq!(first.last_key, Key::real(b"a".to_vec()));
        let second = compute_batch(&*snap, &first.last_key, &Key::MaxKey, u64::MAX, u64::MAX);
        assert_eq!(second.n_docs, 2);
        assert_eq!(second.last_key, Key::MaxKey);
    }

    #[test]
    fn digest_is_deterministic_for_the_same_sequence() {
        let coll = InMemoryCollection::new(vec![doc("a", "1"), doc("b", "2")]);
        let snap1 = coll.snapshot_for_test();
        let snap2 = coll.snapshot_for_test();
        let s1 = compute_batch(&*snap1, &Key::MinKey, &Key::MaxKey, u64::MAX, u64::MAX);
        let s2 = compute_batch(&*snap2, &Key::MinKey, &Key::MaxKey, u64::MAX, u64::MAX);
        assert_eq!(s1.digest, s2.digest);
    }

    #[test]
    fn end_key_below_the_next_document_still_reports_end_key() {
        let coll = InMemoryCollection::new(vec![doc("a", "1"), doc("z", "1")]);
        let snap = coll.snapshot_for_test();
        let end = Key::real(b"m".to_vec());
        let stats = compute_batch(&*snap, &Key::MinKey, &end, u64::MAX, u64::MAX);
        assert_eq!(stats.n_docs, 1);
        assert_eq!(stats.last_key, end);
    }

    #[test]
    fn end_key_before_any_document_reports_end_key_with_zero_docs() {
        let coll = InMemoryCollection::new(vec![doc("z", "1")]);
        let snap = coll.snapshot_for_test();
        let end = Key::real(b"m".to_vec());
        let stats = compute_batch(&*snap, &Key::MinKey, &end, u64::MAX, u64::MAX);
        assert_eq!(stats.n_docs, 0);
        assert_eq!(stats.last_key, end);
    }

    #[test]
    fn digest_changes_if_any_document_changes() {
        let coll_a = InMemoryCollection::new(vec![doc("a", "1")]);
        let coll_b = InMemoryCollection::new(vec![doc("a", "2")]);
        let sa = compute_batch(
            &*coll_a.snapshot_for_test(),
            &Key::MinKey,
            &Key::MaxKey,
            u64::MAX,
            u64::MAX,
        );
        let sb = compute_batch(
            &*coll_b.snapshot_for_test(),
            &Key::MinKey,
            &Key::MaxKey,
            u64::MAX,
            u64::MAX,
        );
        assert_ne!(sa.digest, sb.digest);
    }
}
