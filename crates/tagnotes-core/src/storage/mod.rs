//! Storage layer
//!
//! Persists the encoded note list between runs.
//!
//! ## Architecture
//!
//! - **Payload**: the same codec bytes that go onto a tag, stored as one file
//! - **Write-through**: the store saves after every mutation
//!
//! A failed save never rolls back the in-memory list; see [`crate::store`].

pub mod error;
pub mod persistence;

pub use error::{StoreError, StoreResult};
pub use persistence::{FilePersistence, MemoryPersistence, Persistence};
