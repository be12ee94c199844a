//! Storage-facing half of the consistency auditor: the collection snapshot
//! and catalog boundaries the core iterates through, and the batch hasher
//! that turns a snapshot slice into a [`replicheck_core::Digest`].
//!
//! Everything here is a trait plus one in-memory reference implementation
//! (under [`testing`]); a production build backs [`catalog::CatalogStore`]
//! and [`catalog::CollectionSnapshot`] with the host database's real
//! catalog and storage engine instead.

#![warn(missing_docs)]

pub mod catalog;
pub mod hasher;
pub mod testing;

pub use catalog::{CatalogStore, CollectionDescriptor, CollectionHandle, CollectionSnapshot};
pub use hasher::compute_batch;
pub use testing::{InMemoryCatalog, InMemoryCollection};
