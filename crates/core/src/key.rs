//! Key ordering for the auditor's key domain.
//!
//! This module defines the total order used everywhere a batch boundary is
//! compared or published: `MinKey` below every real key, `MaxKey` above
//! every real key, and real keys ordered by their raw bytes.
//!
//! ## Contract
//!
//! The only construction paths are an explicit user value (`Key::real`) or
//! one of the two sentinels. The byte encoding used in log and health
//! records (`Key::encode` / `Key::decode`) must round-trip the sentinels
//! distinguishably from any real key — see the tag scheme below.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

const TAG_MIN: u8 = 0x00;
const TAG_REAL: u8 = 0x01;
const TAG_MAX: u8 = 0x02;

/// A key in the collection's key domain, or one of the two sentinels.
///
/// Derived `Ord` relies on declaration order (`MinKey` < `Real` < `MaxKey`)
/// and, within `Real`, on `Vec<u8>`'s lexicographic ordering — together this
/// is exactly the total order the audit requires.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    /// Sentinel below every real key.
    MinKey,
    /// A real key drawn from the collection's key domain.
    Real(Vec<u8>),
    /// Sentinel above every real key.
    MaxKey,
}

impl Key {
    /// Construct a real key from raw bytes.
    pub fn real(bytes: impl Into<Vec<u8>>) -> Self {
        Key::Real(bytes.into())
    }

    /// True for the `MinKey` sentinel.
    pub fn is_min(&self) -> bool {
        matches!(self, Key::MinKey)
    }

    /// True for the `MaxKey` sentinel.
    pub fn is_max(&self) -> bool {
        matches!(self, Key::MaxKey)
    }

    /// Canonical byte encoding used in log and health records.
    ///
    /// Tag-prefixed so sentinels can never collide with a real key's bytes:
    /// `0x00` = MinKey, `0x01 || bytes` = a real key, `0x02` = MaxKey.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Key::MinKey => vec![TAG_MIN],
            Key::Real(bytes) => {
                let mut out = Vec::with_capacity(bytes.len() + 1);
                out.push(TAG_REAL);
                out.extend_from_slice(bytes);
                out
            }
            Key::MaxKey => vec![TAG_MAX],
        }
    }

    /// Inverse of [`Key::encode`].
    pub fn decode(bytes: &[u8]) -> Result<Self, KeyDecodeError> {
        match bytes.first() {
            Some(&TAG_MIN) if bytes.len() == 1 => Ok(Key::MinKey),
            Some(&TAG_MAX) if bytes.len() == 1 => Ok(Key::MaxKey),
            Some(&TAG_REAL) => Ok(Key::Real(bytes[1..].to_vec())),
            Some(tag) => Err(KeyDecodeError::UnknownTag(*tag)),
            None => Err(KeyDecodeError::Empty),
        }
    }

    /// Compare two keys, exposed for call sites that prefer a method over
    /// the derived `Ord` trait (e.g. when the comparison is the whole point
    /// of a line and a method read better).
    pub fn cmp_key(&self, other: &Key) -> Ordering {
        self.cmp(other)
    }
}

impl Serialize for Key {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bytes(&self.encode())
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bytes = Vec::<u8>::deserialize(deserializer)?;
        Key::decode(&bytes).map_err(serde::de::Error::custom)
    }
}

/// Errors decoding a [`Key`] from its canonical byte encoding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyDecodeError {
    /// The byte slice was empty (no tag byte present).
    #[error("key encoding is empty")]
    Empty,
    /// The leading tag byte did not match any known variant.
    #[error("unknown key tag byte: {0:#x}")]
    UnknownTag(u8),
}
