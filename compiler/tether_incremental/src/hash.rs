//! Content hashing.
//!
//! `FxHasher` is fast and stable for a given build of the tool, which is all
//! a cache key needs: the blob header carries a format version.

use std::fmt;
use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

/// A content hash of some cached value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ContentHash(u64);

impl ContentHash {
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Hash raw bytes, e.g. a serialized payload.
#[must_use]
pub fn hash_bytes(data: &[u8]) -> ContentHash {
    let mut hasher = FxHasher::default();
    hasher.write(data);
    ContentHash(hasher.finish())
}

/// Hash any `Hash` value, e.g. a unit's extracted facts.
#[must_use]
pub fn hash_value<T: Hash + ?Sized>(value: &T) -> ContentHash {
    let mut hasher = FxHasher::default();
    value.hash(&mut hasher);
    ContentHash(hasher.finish())
}
