//! Namespace identity and eligibility rules.
//!
//! A namespace is `db.collection`. Eligibility decides whether the Run
//! Planner may include a namespace in a run at all: the unreplicated local
//! database is never eligible, and system-reserved collections are only
//! eligible if they appear on a fixed whitelist.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Database name reserved for unreplicated, node-local state.
pub const LOCAL_DATABASE: &str = "local";

/// Prefix marking a collection as system-reserved.
pub const SYSTEM_PREFIX: &str = "system.";

/// System-reserved collection names eligible for auditing despite the
/// `system.` prefix.
pub const SYSTEM_WHITELIST: &[&str] = &[
    "backup_users",
    "js",
    "new_users",
    "roles",
    "users",
    "version",
    "views",
];

/// A fully qualified `db.collection` identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Namespace {
    /// Database name.
    pub db: String,
    /// Collection name within `db`.
    pub coll: String,
}

impl Namespace {
    /// Construct a namespace from its two parts.
    pub fn new(db: impl Into<String>, coll: impl Into<String>) -> Self {
        Namespace {
            db: db.into(),
            coll: coll.into(),
        }
    }

    /// Parse a `db.collection` string.
    ///
    /// Splits on the first `.`; the remainder (which may itself contain
    /// dots, as in `system.js`) becomes the collection name.
    pub fn parse(s: &str) -> Option<Self> {
        let (db, coll) = s.split_once('.')?;
        if db.is_empty() || coll.is_empty() {
            return None;
        }
        Some(Namespace::new(db, coll))
    }

    /// True for the unreplicated, node-local `local` database.
    pub fn is_local(&self) -> bool {
        self.db == LOCAL_DATABASE
    }

    /// True if the collection name carries the system-reserved prefix.
    pub fn has_system_prefix(&self) -> bool {
        self.coll.starts_with(SYSTEM_PREFIX)
    }

    /// True if a system-prefixed collection is on the audit whitelist.
    ///
    /// Meaningless (always `false`) for collections without the prefix;
    /// callers should check [`Namespace::has_system_prefix`] first via
    /// [`Namespace::is_eligible`].
    pub fn is_whitelisted_system_collection(&self) -> bool {
        self.coll
            .strip_prefix(SYSTEM_PREFIX)
            .map(|rest| SYSTEM_WHITELIST.contains(&rest))
            .unwrap_or(false)
    }

    /// Eligibility per spec §4.3: not in `local`, and if system-prefixed,
    /// on the whitelist.
    pub fn is_eligible(&self) -> bool {
        if self.is_local() {
            return false;
        }
        if self.has_system_prefix() {
            return self.is_whitelisted_system_collection();
        }
        true
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.db, self.coll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_database_never_eligible() {
        assert!(!Namespace::new("local", "system.replset").is_eligible());
        assert!(!Namespace::new("local", "oplog.rs").is_eligible());
        assert!(!Namespace::new("local", "anything").is_eligible());
    }

    #[test]
    fn ordinary_collection_is_eligible() {
        assert!(Namespace::new("app", "users").is_eligible());
        assert!(Namespace::new("app", "orders").is_eligible());
    }

    #[test]
    fn system_prefixed_whitelist_is_eligible() {
        for name in SYSTEM_WHITELIST {
            let ns = Namespace::new("app", format!("system.{name}"));
            assert!(ns.is_eligible(), "system.{name} should be eligible");
        }
    }

    #[test]
    fn system_prefixed_non_whitelist_is_rejected() {
        assert!(!Namespace::new("app", "system.replset").is_eligible());
        assert!(!Namespace::new("app", "system.indexes").is_eligible());
    }

    #[test]
    fn parse_splits_on_first_dot_only() {
        let ns = Namespace::parse("app.system.js").unwrap();
        assert_eq!(ns.db, "app");
        assert_eq!(ns.coll, "system.js");
    }

    #[test]
    fn parse_rejects_missing_dot_or_empty_parts() {
        assert!(Namespace::parse("noDot").is_none());
        assert!(Namespace::parse(".coll").is_none());
        assert!(Namespace::parse("db.").is_none());
    }

    #[test]
    fn display_round_trips_through_parse() {
        let ns = Namespace::new("app", "users");
        assert_eq!(Namespace::parse(&ns.to_string()).unwrap(), ns);
    }
}
