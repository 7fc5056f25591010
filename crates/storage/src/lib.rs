//! Storage abstraction and implementations for TechTrack.
//!
//! This crate provides a trait-based key-value interface with an in-memory
//! backend and a JSON file backend.

#![warn(missing_docs)]

pub mod trait_;
pub mod memory;
pub mod json_storage;

pub use trait_::{validate_key, KeyValueStore, StorageError, Result};
pub use memory::MemoryStore;
pub use json_storage::JsonFileStore;
