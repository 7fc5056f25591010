//! Filter for querying technologies.

use crate::technology::{Technology, TechnologyStatus};

/// Status half of a [`TechnologyFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// Any status
    #[default]
    All,
    /// Exactly this status
    Only(TechnologyStatus),
}

impl StatusFilter {
    fn accepts(self, status: TechnologyStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

impl From<Option<TechnologyStatus>> for StatusFilter {
    fn from(status: Option<TechnologyStatus>) -> Self {
        status.map_or(Self::All, Self::Only)
    }
}

/// Filter for querying technologies. Both conditions must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TechnologyFilter {
    /// Status condition
    pub status: StatusFilter,

    /// Case-insensitive substring matched against title or description.
    /// Blank terms are ignored.
    pub search: Option<String>,
}

impl TechnologyFilter {
    /// Filter on a single status.
    pub fn status(status: TechnologyStatus) -> Self {
        Self {
            status: StatusFilter::Only(status),
            search: None,
        }
    }

    /// Add a search term.
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Select matching records, preserving order. Never mutates `items`.
    pub fn apply(&self, items: &[Technology]) -> Vec<Technology> {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        items
            .iter()
            .filter(|t| self.status.accepts(t.status))
            .filter(|t| needle.as_deref().map_or(true, |n| t.matches_search(n)))
            .cloned()
            .collect()
    }
}
