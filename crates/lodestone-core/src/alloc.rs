//! Optimized collection types for Lodestone.
//!
//! Re-exports hash collections backed by AHash, which is measurably faster
//! than the SipHash default for the short string and integer keys the
//! engine indexes by.

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};
