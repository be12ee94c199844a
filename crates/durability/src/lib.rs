//! The write-log and health-log collaborators the consistency auditor calls
//! into but does not implement.
//!
//! Both of these are properties of the host database this crate treats as
//! external (per the data model's §6 boundary): a real write log serializes
//! through the host's own replication protocol, and a real health log is the
//! host's own unreplicated diagnostic collection. This crate gives the
//! engine crate trait seams for both, plus in-memory implementations for
//! tests and for running the auditor stand-alone.

#![warn(missing_docs)]

pub mod health;
pub mod write_log;

pub use health::{HealthSink, InMemoryHealthSink};
pub use write_log::{InMemoryWriteLog, WriteLog};
