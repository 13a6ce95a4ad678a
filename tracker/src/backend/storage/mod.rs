//! # Storage Module
//!
//! Handles data persistence for the expense tracker.
//!
//! The domain layer only sees the [`KeyValueStorage`] trait: a blob goes in
//! under a key and comes back out. Two implementations are provided:
//!
//! - **FileKeyValueStore**: one file per key in the data directory, written
//!   atomically (temp file + rename)
//! - **InMemoryKeyValueStore**: a shared `HashMap`, for tests

pub mod file_store;
pub mod memory_store;
pub mod traits;

pub use file_store::FileKeyValueStore;
pub use memory_store::InMemoryKeyValueStore;
pub use traits::KeyValueStorage;
