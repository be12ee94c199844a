//! In-memory catalog and collection reference implementation.
//!
//! Backs [`crate::catalog`]'s traits with plain `BTreeMap`s so the rest of
//! this workspace's crates can exercise the planner and executor without a
//! real storage engine. Snapshot isolation is implemented by deep-cloning
//! the map at snapshot time, the same approach as `ClonedSnapshotView` in
//! the storage engine this crate is descended from: simple and correct,
//! never lazy.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use parking_lot::Mutex;
use replicheck_core::{Document, Key, Namespace};
use uuid::Uuid;

use crate::catalog::{CatalogStore, CollectionDescriptor, CollectionHandle, CollectionSnapshot};

/// A mutable in-memory collection: a key-ordered map of document bytes.
pub struct InMemoryCollection {
    descriptor: CollectionDescriptor,
    data: Mutex<BTreeMap<Key, Vec<u8>>>,
}

impl InMemoryCollection {
    /// Build a collection pre-populated with `docs`, assigning it a fresh
    /// UUID and no indexes/options.
    pub fn new(docs: Vec<Document>) -> Self {
        Self::with_descriptor(
            CollectionDescriptor {
                uuid: Uuid::new_v4(),
                indexes: Vec::new(),
                options: serde_json::Value::Null,
            },
            docs,
        )
    }

    /// Build a collection with an explicit descriptor, for tests that care
    /// about UUID ordering.
    pub fn with_descriptor(descriptor: CollectionDescriptor, docs: Vec<Document>) -> Self {
        let mut data = BTreeMap::new();
        for doc in docs {
            data.insert(doc.key, doc.bytes);
        }
        InMemoryCollection {
            descriptor,
            data: Mutex::new(data),
        }
    }

    /// Insert or overwrite a single document, simulating a concurrent write
    /// that lands after an earlier snapshot was already taken.
    pub fn put(&self, doc: Document) {
        self.data.lock().insert(doc.key, doc.bytes);
    }

    /// Remove a document, simulating a concurrent delete.
    pub fn delete(&self, key: &Key) {
        self.data.lock().remove(key);
    }

    /// Number of documents currently in the collection.
    pub fn len(&self) -> usize {
        self.data.lock().len()
    }

    /// True if the collection currently has no documents.
    pub fn is_empty(&self) -> bool {
        self.data.lock().is_empty()
    }

    /// Take a snapshot directly, bypassing [`CollectionHandle`], for tests
    /// that only need the hasher.
    pub fn snapshot_for_test(&self) -> Box<dyn CollectionSnapshot> {
        self.snapshot()
    }
}

impl CollectionHandle for InMemoryCollection {
    fn descriptor(&self) -> CollectionDescriptor {
        self.descriptor.clone()
    }

    fn snapshot(&self) -> Box<dyn CollectionSnapshot> {
        let cloned = self.data.lock().clone();
        Box::new(ClonedSnapshot {
            data: Arc::new(cloned),
        })
    }
}

/// A deep-cloned, immutable point-in-time view of an [`InMemoryCollection`].
struct ClonedSnapshot {
    data: Arc<BTreeMap<Key, Vec<u8>>>,
}

impl CollectionSnapshot for ClonedSnapshot {
    fn iter_from<'a>(
        &'a self,
        start: &Key,
        inclusive: bool,
    ) -> Box<dyn Iterator<Item = Document> + 'a> {
        let lower = if inclusive {
            Bound::Included(start.clone())
        } else {
            Bound::Excluded(start.clone())
        };
        Box::new(
            self.data
                .range((lower, Bound::Unbounded))
                .map(|(key, bytes)| Document::new(key.clone(), bytes.clone())),
        )
    }
}

/// Wraps a shared [`InMemoryCollection`] so it can be handed out as a
/// freshly-opened [`CollectionHandle`] without giving the caller the
/// catalog's own `Arc`.
struct SharedHandle(Arc<InMemoryCollection>);

impl CollectionHandle for SharedHandle {
    fn descriptor(&self) -> CollectionDescriptor {
        self.0.descriptor()
    }

    fn snapshot(&self) -> Box<dyn CollectionSnapshot> {
        self.0.snapshot()
    }
}

/// An in-memory catalog: a fixed registration order of namespaces (standing
/// in for the host catalog's UUID order) mapping to their collections.
pub struct InMemoryCatalog {
    order: Mutex<Vec<Namespace>>,
    collections: Mutex<std::collections::HashMap<Namespace, Arc<InMemoryCollection>>>,
}

impl InMemoryCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        InMemoryCatalog {
            order: Mutex::new(Vec::new()),
            collections: Mutex::new(std::collections::HashMap::new()),
        }
    }

    /// Register a collection under `ns`, appending it to the catalog's UUID
    /// ordering.
    pub fn register(&self, ns: Namespace, collection: InMemoryCollection) {
        self.order.lock().push(ns.clone());
        self.collections.lock().insert(ns, Arc::new(collection));
    }

    /// Borrow the shared handle for a registered collection, for tests that
    /// want to mutate it concurrently with an in-flight audit.
    pub fn collection(&self, ns: &Namespace) -> Option<Arc<InMemoryCollection>> {
        self.collections.lock().get(ns).cloned()
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore for InMemoryCatalog {
    fn list_collections(&self, db: &str) -> Vec<Namespace> {
        self.order
            .lock()
            .iter()
            .filter(|ns| ns.db == db)
            .cloned()
            .collect()
    }

    fn open(&self, ns: &Namespace) -> Option<Box<dyn CollectionHandle>> {
        self.collections
            .lock()
            .get(ns)
            .cloned()
            .map(|coll| Box::new(SharedHandle(coll)) as Box<dyn CollectionHandle>)
    }

    fn prev_next(&self, ns: &Namespace) -> (Option<Uuid>, Option<Uuid>) {
        let order = self.order.lock();
        let Some(idx) = order.iter().position(|n| n == ns) else {
            return (None, None);
        };
        let collections = self.collections.lock();
        let prev = idx
            .checked_sub(1)
            .and_then(|i| order.get(i))
            .and_then(|n| collections.get(n))
            .map(|c| c.descriptor.uuid);
        let next = order
            .get(idx + 1)
            .and_then(|n| collections.get(n))
            .map(|c| c.descriptor.uuid);
        (prev, next)
    }
}
