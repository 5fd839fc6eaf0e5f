//! Hashed strings - cheap-to-compare, cheap-to-hash string keys.
//!
//! A [`HashedString`] pairs an immutable string with a 64-bit hash computed
//! once at construction. Hashing one into a map writes the cached value,
//! and equality short-circuits on the hash before touching the text, so
//! repeated lookups by the same name never re-scan the bytes.
//!
//! The hash uses fixed AHash seeds: the same text produces the same hash in
//! every process, which keeps hashes usable as stable identities across a
//! save/load boundary.

use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};
use std::sync::Arc;

const SEEDS: (u64, u64, u64, u64) = (
    0x6c6f_6465_7374_6f6e, // "lodeston"
    0x9e37_79b9_7f4a_7c15,
    0xd1b5_4a32_d192_ed03,
    0x2545_f491_4f6c_dd1d,
);

fn hash_str(text: &str) -> u64 {
    ahash::RandomState::with_seeds(SEEDS.0, SEEDS.1, SEEDS.2, SEEDS.3).hash_one(text)
}

/// An immutable string with a precomputed, process-stable 64-bit hash.
#[derive(Clone)]
pub struct HashedString {
    hash: u64,
    text: Arc<str>,
}

impl HashedString {
    /// Create a hashed string from any string-like value.
    pub fn new(text: impl AsRef<str>) -> Self {
        let text = text.as_ref();
        Self {
            hash: hash_str(text),
            text: Arc::from(text),
        }
    }

    /// The empty hashed string.
    pub fn empty() -> Self {
        Self::new("")
    }

    /// Get the underlying text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Get the cached hash value.
    pub fn hash_value(&self) -> u64 {
        self.hash
    }

    /// Check if the underlying text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl PartialEq for HashedString {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.text == other.text
    }
}

impl Eq for HashedString {}

impl Hash for HashedString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl Default for HashedString {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for HashedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashedString({:?})", self.text)
    }
}

impl fmt::Display for HashedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for HashedString {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for HashedString {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl AsRef<str> for HashedString {
    fn as_ref(&self) -> &str {
        &self.text
    }
}
