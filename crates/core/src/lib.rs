//! TechTrack core data models.
//!
//! This crate defines the technology record, its status state machine,
//! filters, the derived progress summary, and the snapshot codec used for
//! persistence.

#![warn(missing_docs)]

// Identity
mod id;

// Records
mod technology;
mod filter;
mod progress;
mod seed;

mod error;

pub mod snapshot;

// Re-exports
pub use id::TechnologyId;
pub use technology::{NewTechnology, Technology, TechnologyPatch, TechnologyStatus};
pub use filter::{StatusFilter, TechnologyFilter};
pub use progress::ProgressSummary;
pub use seed::seed_technologies;
pub use error::{CoreError, Result};

/// Calendar date type used for deadlines
pub type Date = chrono::NaiveDate;
