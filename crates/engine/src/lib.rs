//! Run Planner (C3) and Batch Executor (C4) for the consistency auditor,
//! plus the public `launch_db_check` entry point that represents the
//! out-of-scope command surface's call into this core.
//!
//! The worker is a dedicated OS thread per run ([`executor::spawn`]), not a
//! shared priority-queue scheduler: batches within a run are strictly
//! sequential by contract, so there is nothing for a worker pool to buy.

#![warn(missing_docs)]

pub mod bridge;
pub mod executor;
pub mod launch;
pub mod oracle;
pub mod planner;

pub use bridge::LogBridge;
pub use executor::{ExecutorContext, JobHandle};
pub use launch::{launch_db_check, Collaborators, DbCheckRequest};
pub use oracle::{InMemoryLeadershipOracle, LeadershipOracle};
pub use planner::{plan_all, plan_single, SingleCollectionRequest};
