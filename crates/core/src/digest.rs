//! Fixed-width content digest over a batch's documents.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 256-bit content digest (SHA-256) over canonicalized document bytes in
/// key order. Computed by `replicheck-storage`'s batch hasher; this type
/// just carries the result so `replicheck-core` doesn't need a hashing
/// dependency of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest(pub [u8; 32]);

impl Digest {
    /// Wrap a raw 32-byte digest.
    pub fn new(bytes: [u8; 32]) -> Self {
        Digest(bytes)
    }

    /// The all-zero digest, used for an empty batch (no documents hashed).
    pub const ZERO: Digest = Digest([0u8; 32]);

    /// Lowercase hex representation, as it would appear in a health-log line.
    pub fn to_hex(&self) -> String {
        let mut s = String::with_capacity(64);
        for byte in self.0 {
            use fmt::Write;
            write!(s, "{byte:02x}").expect("writing to a String cannot fail");
        }
        s
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
