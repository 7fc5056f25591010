//! Built-in starter catalog.

use crate::id::TechnologyId;
use crate::technology::{Technology, TechnologyStatus};

/// The catalog used when no valid snapshot is available.
pub fn seed_technologies() -> Vec<Technology> {
    vec![
        Technology::new(
            TechnologyId::new(1),
            "React Components",
            "Learning the basic building blocks",
        )
        .with_status(TechnologyStatus::Completed),
        Technology::new(TechnologyId::new(2), "JSX Syntax", "Mastering JSX syntax")
            .with_status(TechnologyStatus::InProgress),
        Technology::new(
            TechnologyId::new(3),
            "State Management",
            "Working with component state",
        ),
    ]
}
