//! Core types shared by every replicheck crate.
//!
//! This crate defines the foundational, storage-agnostic data model for the
//! replica-set consistency auditor:
//! - [`Key`]: a totally ordered key augmented with `MinKey`/`MaxKey` sentinels
//! - [`Namespace`]: a `db.collection` identifier plus eligibility rules
//! - [`BatchCaps`]: the document/byte limits that bound a single batch
//! - [`Digest`]: a fixed-width content hash over a batch's documents
//! - the run/collection/batch data model from the audit's §3 data model
//! - the crate-wide error taxonomy

#![warn(missing_docs)]

pub mod digest;
pub mod error;
pub mod key;
pub mod limits;
pub mod model;
pub mod namespace;

pub use digest::Digest;
pub use error::{Error, PlanningError, Result};
pub use key::Key;
pub use limits::BatchCaps;
pub use model::{
    BatchRecord, BatchStats, CollectionInfo, CollectionRecord, Document, HealthLogEntry,
    HealthSeverity, LogRecord, Run, Timestamp,
};
pub use namespace::Namespace;
