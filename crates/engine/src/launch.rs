//! The public entry point: the seam a command surface would call.
//!
//! `launch_db_check` stands in for the command handler this crate doesn't
//! implement (command parsing, auth, FCV gate are all out of scope). It
//! does exactly what spec §6 requires of that handler: plan synchronously,
//! fail synchronously on a planning error, otherwise launch the worker and
//! return immediately with a handle — never blocking on the run itself.

use std::sync::Arc;

use replicheck_concurrency::{CatalogLock, LockDomain, TerminalFlag};
use replicheck_core::PlanningError;
use replicheck_durability::{HealthSink, WriteLog};
use replicheck_storage::CatalogStore;
use uuid::Uuid;

use crate::bridge::LogBridge;
use crate::executor::{self, ExecutorContext, JobHandle};
use crate::oracle::LeadershipOracle;
use crate::planner::{self, SingleCollectionRequest};

/// `{ dbCheck: <coll>, ... }` vs `{ dbCheck: 1 }`.
pub enum DbCheckRequest {
    /// Single-collection form.
    Single {
        /// Target database.
        db: String,
        /// Collection and range/cap parameters.
        params: SingleCollectionRequest,
    },
    /// Whole-database form.
    Database {
        /// Target database.
        db: String,
    },
}

/// The collaborators a real deployment would wire to its own catalog,
/// write log, health log, and leadership state. Cloned cheaply (every
/// field is an `Arc` or an `Arc`-backed handle) so one set can back many
/// concurrent runs.
#[derive(Clone)]
pub struct Collaborators {
    /// Collection catalog and snapshot source.
    pub catalog: Arc<dyn CatalogStore>,
    /// Shared database-level catalog lock.
    pub catalog_lock: CatalogLock,
    /// Shared IX-lock-vs-stepdown lock domain.
    pub lock_domain: LockDomain,
    /// Replicated write log.
    pub write_log: Arc<dyn WriteLog>,
    /// Node-local health-log sink.
    pub health_sink: Arc<dyn HealthSink>,
    /// Leadership oracle.
    pub oracle: Arc<dyn LeadershipOracle>,
    /// The caller's operation-context interruption token. A real command
    /// handler ties this to its own client context; callers that don't
    /// need interruption can hand out a fresh, never-set
    /// [`TerminalFlag::new`].
    pub interrupt: TerminalFlag,
}

/// Plan and launch a `dbCheck` run.
///
/// Returns as soon as the worker thread is spawned; the run itself
/// proceeds asynchronously and is observed only through the health log and
/// the returned [`JobHandle`].
pub fn launch_db_check(
    request: DbCheckRequest,
    collaborators: &Collaborators,
) -> Result<JobHandle, PlanningError> {
    let run = match request {
        DbCheckRequest::Single { db, params } => planner::plan_single(
            &collaborators.catalog_lock,
            collaborators.catalog.as_ref(),
            &db,
            params,
        )?,
        DbCheckRequest::Database { db } => planner::plan_all(
            &collaborators.catalog_lock,
            collaborators.catalog.as_ref(),
            &db,
        )?,
    };

    let run_id = Uuid::new_v4();
    let terminal_flag = TerminalFlag::new();
    let interrupt = collaborators.interrupt.clone();
    let bridge = LogBridge::new(
        collaborators.lock_domain.replication_lock(),
        collaborators.oracle.clone(),
        collaborators.write_log.clone(),
        terminal_flag.clone(),
        Arc::new(move || interrupt.is_set()),
    );

    let ctx = ExecutorContext {
        run_id,
        catalog_lock: collaborators.catalog_lock.clone(),
        catalog: collaborators.catalog.clone(),
        bridge,
        health_sink: collaborators.health_sink.clone(),
        terminal_flag,
    };

    Ok(executor::spawn(run, ctx))
}
