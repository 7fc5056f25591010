//! Progress tracking
//!
//! The progress store, random selection, and deadline queries.

#![warn(missing_docs)]

pub mod store;
pub mod selector;
pub mod deadline;

pub use store::{LoadOrigin, ProgressStore, SeedReason, StoreConfig, STORAGE_KEY};
pub use selector::{RandomSource, SeededRandom, ThreadRandom};
