//! Batch Executor (C4): the dedicated worker thread that drives a [`Run`]
//! to completion.
//!
//! One thread per run, strictly sequential collections and batches within a
//! collection — no parallelism, because the batch chain depends on ordered
//! `lastKey` handoff (per the concurrency model). The thread is named
//! `dbcheck-<run_id>` and wrapped in `catch_unwind` so a panic inside one
//! collection's processing surfaces as a logged error rather than taking
//! down the process, mirroring the panic-containment idiom of a
//! general-purpose background worker pool without adopting its shared
//! queue.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::JoinHandle;

use replicheck_concurrency::{CatalogLock, TerminalFlag};
use replicheck_core::{
    BatchRecord, CollectionInfo, CollectionRecord, HealthLogEntry, HealthSeverity, LogRecord, Run,
};
use replicheck_durability::HealthSink;
use replicheck_storage::{compute_batch, CatalogStore};
use uuid::Uuid;

use crate::bridge::LogBridge;

/// Everything the executor needs besides the [`Run`] itself.
#[derive(Clone)]
pub struct ExecutorContext {
    /// Identifies this run in thread names and tracing spans.
    pub run_id: Uuid,
    /// Shared catalog lock, re-acquired before each collection's setup.
    pub catalog_lock: CatalogLock,
    /// Collection catalog and snapshot source.
    pub catalog: Arc<dyn CatalogStore>,
    /// C5 collaborator bundle.
    pub bridge: LogBridge,
    /// Health-log sink.
    pub health_sink: Arc<dyn HealthSink>,
    /// This run's one-shot cancellation flag.
    pub terminal_flag: TerminalFlag,
}

/// A handle to a launched run's dedicated worker thread.
pub struct JobHandle {
    run_id: Uuid,
    thread: Option<JoinHandle<()>>,
}

impl JobHandle {
    /// Block until the worker thread exits.
    pub fn join(mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }

    /// Non-blocking poll of whether the worker thread has exited.
    pub fn is_finished(&self) -> bool {
        match &self.thread {
            Some(thread) => thread.is_finished(),
            None => true,
        }
    }

    /// The run this handle tracks.
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }
}

/// Spawn the dedicated worker thread for `run` and return immediately.
///
/// This is the fire-and-forget boundary: the caller (the command surface)
/// returns success to its client as soon as this call returns, regardless
/// of how long the run itself takes.
pub fn spawn(run: Run, ctx: ExecutorContext) -> JobHandle {
    let run_id = ctx.run_id;
    let thread = std::thread::Builder::new()
        .name(format!("dbcheck-{run_id}"))
        .spawn(move || {
            let span = tracing::info_span!("db_check_run", run_id = %run_id);
            let _enter = span.enter();
            tracing::info!(collections = run.len(), "db_check run starting");

            if panic::catch_unwind(AssertUnwindSafe(|| execute_run(&run, &ctx))).is_err() {
                tracing::error!("db_check worker panicked");
            }

            tracing::info!("db_check run finished");
        })
        .expect("failed to spawn db_check worker thread");

    JobHandle {
        run_id,
        thread: Some(thread),
    }
}

fn execute_run(run: &Run, ctx: &ExecutorContext) {
    for info in run.iter() {
        if ctx.terminal_flag.is_set() {
            tracing::warn!(namespace = %info.namespace, "run aborted before collection started");
            break;
        }
        run_collection(info, ctx);
        if ctx.terminal_flag.is_set() {
            break;
        }
    }
}

fn run_collection(info: &CollectionInfo, ctx: &ExecutorContext) {
    let span = tracing::info_span!("db_check_collection", namespace = %info.namespace);
    let _enter = span.enter();

    let handle = {
        let _guard = ctx.catalog_lock.acquire_shared();
        match ctx.catalog.open(&info.namespace) {
            Some(handle) => handle,
            None => {
                tracing::warn!("collection missing at setup, skipping");
                ctx.health_sink.log(HealthLogEntry::Error {
                    namespace: Some(info.namespace.clone()),
                    severity: HealthSeverity::Warning,
                    reason: "collection missing".into(),
                });
                return;
            }
        }
    };
    let descriptor = handle.descriptor();
    let (prev_uuid, next_uuid) = {
        let _guard = ctx.catalog_lock.acquire_shared();
        ctx.catalog.prev_next(&info.namespace)
    };

    let metadata = LogRecord::Collection(CollectionRecord {
        namespace: info.namespace.clone(),
        uuid: descriptor.uuid,
        prev_uuid,
        next_uuid,
        indexes: descriptor.indexes,
        options: descriptor.options,
    });

    if let Err(err) = ctx.bridge.append(&info.namespace, metadata) {
        tracing::error!(reason = err.reason_code(), "failed to publish collection metadata");
        ctx.health_sink.log(HealthLogEntry::Error {
            namespace: Some(info.namespace.clone()),
            severity: HealthSeverity::Error,
            reason: err.reason_code().into(),
        });
        return;
    }

    let mut start = info.start_key.clone();
    let mut total_docs: u64 = 0;
    let mut total_bytes: u64 = 0;

    loop {
        let (max_docs, max_bytes) = info.caps.remaining_batch_caps(total_docs, total_bytes);
        if max_docs == 0 || max_bytes == 0 {
            break;
        }

        let snapshot = handle.snapshot();
        let stats = compute_batch(snapshot.as_ref(), &start, &info.end_key, max_docs, max_bytes);

        let batch = LogRecord::Batch(BatchRecord {
            namespace: info.namespace.clone(),
            min_key: start.clone(),
            max_key: stats.last_key.clone(),
            digest: stats.digest,
        });

        match ctx.bridge.append(&info.namespace, batch) {
            Ok(timestamp) => {
                ctx.health_sink.log(HealthLogEntry::Batch {
                    namespace: info.namespace.clone(),
                    severity: HealthSeverity::Info,
                    min_key: start.clone(),
                    max_key: stats.last_key.clone(),
                    count: stats.n_docs,
                    bytes: stats.n_bytes,
                    digest: stats.digest,
                    success: true,
                    timestamp,
                });
            }
            Err(err) => {
                tracing::error!(reason = err.reason_code(), "failed to publish batch");
                ctx.health_sink.log(HealthLogEntry::Error {
                    namespace: Some(info.namespace.clone()),
                    severity: HealthSeverity::Error,
                    reason: err.reason_code().into(),
                });
                return;
            }
        }

        total_docs += stats.n_docs;
        total_bytes += stats.n_bytes;
        let reached_end = stats.last_key >= info.end_key;
        start = stats.last_key;

        if reached_end || total_docs >= info.caps.max_docs || total_bytes >= info.caps.max_bytes {
            break;
        }
        if ctx.terminal_flag.is_set() {
            break;
        }
    }
}
