//! Unique identifiers for tracked technologies.

use std::collections::BTreeSet;
use serde::{Deserialize, Serialize};

/// Unique identifier for a Technology.
///
/// Serialized as a bare integer so snapshots stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TechnologyId(u64);

impl TechnologyId {
    /// Wrap a raw id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw integer value.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Allocate an id not present in `existing`: one past the current
    /// maximum, or the lowest free id once the maximum is `u64::MAX`.
    /// `None` only when every id is taken.
    pub fn allocate<'a>(existing: impl IntoIterator<Item = &'a TechnologyId>) -> Option<Self> {
        let taken: BTreeSet<u64> = existing.into_iter().map(|id| id.0).collect();
        let Some(&max) = taken.last() else {
            return Some(Self(1));
        };
        match max.checked_add(1) {
            Some(raw) => Some(Self(raw)),
            None => (1..=u64::MAX).find(|raw| !taken.contains(raw)).map(Self),
        }
    }
}

impl std::fmt::Display for TechnologyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for TechnologyId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}
