//! Error taxonomy for the consistency auditor.
//!
//! Two error families map onto the three failure scopes described by the
//! audit's error handling design: [`PlanningError`] is reported synchronously
//! to the caller before any worker is launched. [`Error`] covers everything
//! raised once a run is underway; [`Error::is_cancellation`] splits it into
//! the two remaining scopes — a plain write-log failure aborts only the
//! collection currently being audited, while interruption or lost leadership
//! is run-terminal and stops the whole job with no further records emitted.

use crate::namespace::Namespace;
use thiserror::Error;

/// Result type alias for fallible operations that return a [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that reject a `dbCheck` invocation before any worker is launched.
///
/// Reported synchronously to the caller as a command failure; no health-log
/// entry is ever written for these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanningError {
    /// The named namespace does not exist in the catalog.
    #[error("namespace not found: {0}")]
    NamespaceNotFound(Namespace),

    /// The namespace exists but is not eligible for auditing (local database,
    /// or a non-whitelisted system-reserved collection).
    #[error("namespace not eligible for auditing: {0}")]
    InvalidNamespace(Namespace),

    /// The target database does not exist.
    ///
    /// Never constructed by this crate's planner, which only ever looks up
    /// collections within a named database; populated by the command
    /// surface's database-existence check, which is out of scope here.
    #[error("database not found: {0}")]
    DatabaseNotFound(String),

    /// The server's feature-compatibility version is below the minimum this
    /// command requires.
    ///
    /// Never constructed by this crate; the FCV gate is out of scope and
    /// belongs to the command surface that would call [`DatabaseNotFound`]'s
    /// sibling check before invoking the planner at all.
    #[error("feature compatibility version too low: requires >= {required}, have {actual}")]
    FeatureCompatibilityTooLow {
        /// Minimum FCV the command requires.
        required: &'static str,
        /// FCV actually in effect.
        actual: String,
    },
}

/// Errors raised once a run is underway (C2/C4/C5).
///
/// Recorded as an error health-log entry. [`Error::is_cancellation`] tells
/// the executor whether to abort just the current collection and move on
/// (a plain write-log failure) or stop the whole run (lost leadership,
/// interruption).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The node lost the ability to accept writes for the run's target
    /// namespace (stepdown, or a leadership transfer in progress).
    #[error("primary stepped down")]
    PrimarySteppedDown,

    /// The worker's operation context was interrupted before a log append.
    #[error("interrupted")]
    Interrupted,

    /// The write log rejected the append after exhausting its retries.
    #[error("write log append failed: {0}")]
    AppendFailed(String),
}

impl Error {
    /// A short machine-readable tag for the health-log `reason` field.
    pub fn reason_code(&self) -> &'static str {
        match self {
            Error::PrimarySteppedDown => "PrimarySteppedDown",
            Error::Interrupted => "Interrupted",
            Error::AppendFailed(_) => "AppendFailed",
        }
    }

    /// True if this error originated from cooperative cancellation rather
    /// than an actual write-log failure.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Error::PrimarySteppedDown | Error::Interrupted)
    }
}
