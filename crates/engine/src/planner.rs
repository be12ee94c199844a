//! Run Planner (C3): turn an invocation into an ordered [`Run`].

use replicheck_concurrency::CatalogLock;
use replicheck_core::{BatchCaps, CollectionInfo, Key, Namespace, PlanningError, Run};
use replicheck_storage::CatalogStore;

/// Parameters for a single-collection `{ dbCheck: <coll> }` invocation.
#[derive(Debug, Clone, Default)]
pub struct SingleCollectionRequest {
    /// The collection name within the target database.
    pub coll: String,
    /// Inclusive lower bound; defaults to [`Key::MinKey`].
    pub min_key: Option<Key>,
    /// Inclusive upper bound; defaults to [`Key::MaxKey`].
    pub max_key: Option<Key>,
    /// Total document cap across the whole collection range.
    pub max_docs: Option<u64>,
    /// Total byte cap across the whole collection range.
    pub max_bytes: Option<u64>,
    /// Accepted and stored but never consulted by the executor, per the
    /// unresolved throttling design question — see DESIGN.md.
    pub max_count_per_second: Option<u64>,
}

/// `planSingle`: plan a run over one named collection.
///
/// Fails [`PlanningError::InvalidNamespace`] if the namespace is not
/// eligible (local database, or a non-whitelisted system collection), and
/// [`PlanningError::NamespaceNotFound`] if it is eligible but absent from
/// the catalog. Acquires the shared catalog lock for the duration of the
/// lookup, matching the per-collection setup step C4 takes again before
/// each collection.
pub fn plan_single(
    catalog_lock: &CatalogLock,
    catalog: &dyn CatalogStore,
    db: &str,
    req: SingleCollectionRequest,
) -> Result<Run, PlanningError> {
    let ns = Namespace::new(db, req.coll);
    if !ns.is_eligible() {
        return Err(PlanningError::InvalidNamespace(ns));
    }

    let _guard = catalog_lock.acquire_shared();
    if catalog.open(&ns).is_none() {
        return Err(PlanningError::NamespaceNotFound(ns));
    }

    let caps = BatchCaps {
        max_docs: req.max_docs.unwrap_or(u64::MAX),
        max_bytes: req.max_bytes.unwrap_or(u64::MAX),
    };
    let start = req.min_key.unwrap_or(Key::MinKey);
    let end = req.max_key.unwrap_or(Key::MaxKey);
    let info = CollectionInfo::sub_range(ns.clone(), start, end, caps)
        .map_err(|_| PlanningError::InvalidNamespace(ns))?;

    Ok(Run::new(vec![info]))
}

/// `planAll`: plan a whole-database run over every eligible collection.
///
/// Fails [`PlanningError::InvalidNamespace`] outright for the unreplicated
/// local database. Otherwise holds the shared catalog lock for the whole
/// enumeration, so the collection list is a consistent snapshot of the
/// catalog at plan time.
pub fn plan_all(
    catalog_lock: &CatalogLock,
    catalog: &dyn CatalogStore,
    db: &str,
) -> Result<Run, PlanningError> {
    if Namespace::new(db, "placeholder").is_local() {
        return Err(PlanningError::InvalidNamespace(Namespace::new(
            db,
            "*".to_string(),
        )));
    }

    let _guard = catalog_lock.acquire_shared();
    let infos = catalog
        .list_collections(db)
        .into_iter()
        .filter(Namespace::is_eligible)
        .map(CollectionInfo::full_range)
        .collect();

    Ok(Run::new(infos))
}
