//! End-to-end scenarios against the in-memory reference collaborators,
//! covering the quantified invariants and boundary behaviors of the audit's
//! testable-properties list.

use std::sync::Arc;

use replicheck_concurrency::{CatalogLock, LockDomain, TerminalFlag};
use replicheck_core::{Document, HealthLogEntry, Key, Namespace, PlanningError};
use replicheck_durability::{InMemoryHealthSink, InMemoryWriteLog};
use replicheck_engine::{
    launch_db_check, Collaborators, DbCheckRequest, InMemoryLeadershipOracle,
};
use replicheck_storage::{InMemoryCatalog, InMemoryCollection};

fn doc(key: &str) -> Document {
    Document::new(Key::real(key.as_bytes().to_vec()), vec![1u8; 8])
}

struct Fixture {
    catalog: Arc<InMemoryCatalog>,
    health_sink: Arc<InMemoryHealthSink>,
    oracle: Arc<InMemoryLeadershipOracle>,
    collaborators: Collaborators,
}

fn fixture() -> Fixture {
    let catalog = Arc::new(InMemoryCatalog::new());
    let health_sink = Arc::new(InMemoryHealthSink::new());
    let oracle = Arc::new(InMemoryLeadershipOracle::new());
    let collaborators = Collaborators {
        catalog: catalog.clone(),
        catalog_lock: CatalogLock::new(),
        lock_domain: LockDomain::new(),
        write_log: Arc::new(InMemoryWriteLog::new()),
        health_sink: health_sink.clone(),
        oracle: oracle.clone(),
        interrupt: TerminalFlag::new(),
    };
    Fixture {
        catalog,
        health_sink,
        oracle,
        collaborators,
    }
}

fn batches(sink: &InMemoryHealthSink) -> Vec<HealthLogEntry> {
    sink.entries()
        .into_iter()
        .filter(|e| matches!(e, HealthLogEntry::Batch { .. }))
        .collect()
}

fn errors(sink: &InMemoryHealthSink) -> Vec<HealthLogEntry> {
    sink.entries()
        .into_iter()
        .filter(|e| matches!(e, HealthLogEntry::Error { .. }))
        .collect()
}

#[test]
fn whole_database_run_visits_collections_in_catalog_order() {
    let f = fixture();
    f.catalog.register(
        Namespace::new("app", "b"),
        InMemoryCollection::new(vec![doc("x")]),
    );
    f.catalog.register(
        Namespace::new("app", "a"),
        InMemoryCollection::new(vec![doc("y")]),
    );

    let handle = launch_db_check(
        DbCheckRequest::Database { db: "app".into() },
        &f.collaborators,
    )
    .unwrap();
    handle.join();

    let seen: Vec<_> = batches(&f.health_sink)
        .into_iter()
        .map(|e| match e {
            HealthLogEntry::Batch { namespace, .. } => namespace.coll,
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(seen, vec!["b", "a"]);
}

#[test]
fn whole_database_run_skips_ineligible_system_collections() {
    let f = fixture();
    f.catalog.register(
        Namespace::new("app", "users"),
        InMemoryCollection::new(vec![]),
    );
    f.catalog.register(
        Namespace::new("app", "system.indexes"),
        InMemoryCollection::new(vec![]),
    );

    let handle = launch_db_check(
        DbCheckRequest::Database { db: "app".into() },
        &f.collaborators,
    )
    .unwrap();
    handle.join();

    assert_eq!(batches(&f.health_sink).len(), 1);
}

#[test]
fn local_database_is_rejected_before_any_run_is_launched() {
    let f = fixture();
    let err = launch_db_check(
        DbCheckRequest::Database {
            db: "local".into(),
        },
        &f.collaborators,
    )
    .unwrap_err();
    assert!(matches!(err, PlanningError::InvalidNamespace(_)));
    assert!(f.health_sink.entries().is_empty());
}

#[test]
fn empty_collection_produces_the_minkey_maxkey_boundary_batch() {
    let f = fixture();
    f.catalog.register(
        Namespace::new("app", "users"),
        InMemoryCollection::new(vec![]),
    );

    use replicheck_engine::SingleCollectionRequest;
    let handle = launch_db_check(
        DbCheckRequest::Single {
            db: "app".into(),
            params: SingleCollectionRequest {
                coll: "users".into(),
                ..Default::default()
            },
        },
        &f.collaborators,
    )
    .unwrap();
    handle.join();

    let b = batches(&f.health_sink);
    assert_eq!(b.len(), 1);
    match &b[0] {
        HealthLogEntry::Batch {
            min_key,
            max_key,
            count,
            ..
        } => {
            assert_eq!(*min_key, Key::MinKey);
            assert_eq!(*max_key, Key::MaxKey);
            assert_eq!(*count, 0);
        }
        _ => unreachable!(),
    }
}

#[test]
fn doc_count_cap_truncates_the_run_short_of_full_coverage() {
    use replicheck_engine::SingleCollectionRequest;

    let f = fixture();
    let docs = (0..10).map(|i| doc(&format!("k{i:03}"))).collect();
    f.catalog
        .register(Namespace::new("app", "users"), InMemoryCollection::new(docs));

    let handle = launch_db_check(
        DbCheckRequest::Single {
            db: "app".into(),
            params: SingleCollectionRequest {
                coll: "users".into(),
                max_docs: Some(3),
                ..Default::default()
            },
        },
        &f.collaborators,
    )
    .unwrap();
    handle.join();

    let b = batches(&f.health_sink);
    let total: u64 = b
        .iter()
        .map(|e| match e {
            HealthLogEntry::Batch { count, .. } => *count,
            _ => unreachable!(),
        })
        .sum();
    assert_eq!(total, 3);
}

#[test]
fn stepdown_mid_run_aborts_remaining_collections() {
    let f = fixture();
    f.catalog.register(
        Namespace::new("app", "a"),
        InMemoryCollection::new(vec![doc("x")]),
    );
    f.catalog.register(
        Namespace::new("app", "b"),
        InMemoryCollection::new(vec![doc("y")]),
    );
    f.oracle.step_down();

    let handle = launch_db_check(
        DbCheckRequest::Database { db: "app".into() },
        &f.collaborators,
    )
    .unwrap();
    handle.join();

    assert!(batches(&f.health_sink).is_empty());
    assert_eq!(errors(&f.health_sink).len(), 1);
}

#[test]
fn two_catalogs_with_identical_contents_hash_identically() {
    let primary = fixture();
    let secondary = fixture();
    let docs = vec![doc("a"), doc("b"), doc("c")];
    primary.catalog.register(
        Namespace::new("app", "users"),
        InMemoryCollection::new(docs.clone()),
    );
    secondary
        .catalog
        .register(Namespace::new("app", "users"), InMemoryCollection::new(docs));

    for f in [&primary, &secondary] {
        let handle = launch_db_check(
            DbCheckRequest::Database { db: "app".into() },
            &f.collaborators,
        )
        .unwrap();
        handle.join();
    }

    let digest_of = |sink: &InMemoryHealthSink| -> Vec<_> {
        batches(sink)
            .into_iter()
            .map(|e| match e {
                HealthLogEntry::Batch { digest, .. } => digest,
                _ => unreachable!(),
            })
            .collect()
    };
    assert_eq!(
        digest_of(&primary.health_sink),
        digest_of(&secondary.health_sink)
    );
}

#[test]
fn a_divergent_secondary_produces_a_different_digest() {
    let primary = fixture();
    let secondary = fixture();
    primary.catalog.register(
        Namespace::new("app", "users"),
        InMemoryCollection::new(vec![doc("a"), doc("b")]),
    );
    secondary.catalog.register(
        Namespace::new("app", "users"),
        InMemoryCollection::new(vec![doc("a"), Document::new(Key::real(b"b".to_vec()), vec![9u8; 8])]),
    );

    for f in [&primary, &secondary] {
        let handle = launch_db_check(
            DbCheckRequest::Database { db: "app".into() },
            &f.collaborators,
        )
        .unwrap();
        handle.join();
    }

    let digest_of = |sink: &InMemoryHealthSink| -> Vec<_> {
        batches(sink)
            .into_iter()
            .map(|e| match e {
                HealthLogEntry::Batch { digest, .. } => digest,
                _ => unreachable!(),
            })
            .collect()
    };
    assert_ne!(
        digest_of(&primary.health_sink),
        digest_of(&secondary.health_sink)
    );
}
