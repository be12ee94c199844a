//! Lock discipline and cancellation for the consistency auditor.
//!
//! This crate is deliberately small: it has no notion of a transaction or a
//! commit protocol. It exists to give the engine crate two things it needs
//! from the host database's concurrency control without depending on a real
//! one: a way to make the log bridge's append mutually exclusive with
//! leadership transfer ([`locks`]), and a way for any collaborator to flip a
//! one-shot cancellation switch the executor's main loop checks ([`cancel`]).

#![warn(missing_docs)]

pub mod cancel;
pub mod locks;

pub use cancel::TerminalFlag;
pub use locks::{CatalogLock, LeadershipTransfer, LockDomain, ReplicationLock};
