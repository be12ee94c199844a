//! Catalog and snapshot trait boundaries.
//!
//! The auditor core never talks to a real storage engine directly; it talks
//! to these three traits. A production build backs them with the host
//! database's actual catalog and storage snapshot machinery; the
//! [`crate::testing`] module provides a BTreeMap-backed in-memory
//! implementation used by this crate's own tests.

use replicheck_core::{Document, Key, Namespace};
use uuid::Uuid;

/// Static description of a collection, independent of its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionDescriptor {
    /// The collection's catalog UUID.
    pub uuid: Uuid,
    /// Index specs, opaque to the auditor.
    pub indexes: Vec<String>,
    /// Collection creation options, opaque to the auditor.
    pub options: serde_json::Value,
}

/// A database-wide view of the collections available to audit.
///
/// Implementations must present collections in a stable UUID ordering so
/// that `prev_next` is meaningful across calls within one run.
pub trait CatalogStore: Send + Sync {
    /// List every collection namespace in `db`, in catalog UUID order.
    fn list_collections(&self, db: &str) -> Vec<Namespace>;

    /// Open a read handle on `ns`, or `None` if it doesn't exist.
    fn open(&self, ns: &Namespace) -> Option<Box<dyn CollectionHandle>>;

    /// The UUIDs of the collections immediately before and after `ns` in the
    /// catalog's UUID ordering, or `(None, None)` if `ns` is unknown.
    fn prev_next(&self, ns: &Namespace) -> (Option<Uuid>, Option<Uuid>);
}

/// A read handle on one collection.
pub trait CollectionHandle: Send + Sync {
    /// This collection's static descriptor.
    fn descriptor(&self) -> CollectionDescriptor;

    /// Take a read snapshot of the collection's current contents.
    ///
    /// Mutations that occur after this call are never observed through the
    /// returned snapshot.
    fn snapshot(&self) -> Box<dyn CollectionSnapshot>;
}

/// A point-in-time, key-ordered view of a collection.
pub trait CollectionSnapshot: Send + Sync {
    /// Iterate documents starting at `start`.
    ///
    /// `inclusive = true` includes a document whose key equals `start`
    /// (used for the very first batch of a collection, where `start` is
    /// `MinKey` and every real key is `> MinKey` anyway); `inclusive =
    /// false` excludes it (used for every subsequent batch, where `start`
    /// is the previous batch's `lastKey` and must not be re-emitted).
    fn iter_from<'a>(
        &'a self,
        start: &Key,
        inclusive: bool,
    ) -> Box<dyn Iterator<Item = Document> + 'a>;
}
