//! Lodestone Core
//!
//! Foundation utilities shared by the Lodestone engine crates.

pub mod alloc;
pub mod hashed;
pub mod logging;

pub use hashed::HashedString;
