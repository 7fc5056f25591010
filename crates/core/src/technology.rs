//! Technology model - a learning topic with its completion state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::error::{CoreError, Result};
use crate::id::TechnologyId;

/// A learning topic tracked by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technology {
    /// Unique identifier, immutable after creation
    pub id: TechnologyId,

    /// Title (never empty)
    pub title: String,

    /// Free-form description
    pub description: String,

    /// Completion status
    pub status: TechnologyStatus,

    /// User notes
    pub notes: String,

    /// Optional target date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
}

impl Technology {
    /// Create a not-started technology with empty notes and no deadline.
    pub fn new(
        id: TechnologyId,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            status: TechnologyStatus::NotStarted,
            notes: String::new(),
            deadline: None,
        }
    }

    /// Builder-style status override.
    pub fn with_status(mut self, status: TechnologyStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether the status is exactly `completed`.
    pub fn is_completed(&self) -> bool {
        self.status == TechnologyStatus::Completed
    }

    /// Case-insensitive substring match against title or description.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_search(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

/// Tri-state completion status.
///
/// The only forward transition is [`TechnologyStatus::next`], which walks the
/// cycle `NotStarted -> InProgress -> Completed -> NotStarted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TechnologyStatus {
    /// Not yet begun
    #[default]
    NotStarted,
    /// Being studied
    InProgress,
    /// Finished
    Completed,
}

impl TechnologyStatus {
    /// All statuses in cycle order.
    pub const ALL: [TechnologyStatus; 3] = [
        TechnologyStatus::NotStarted,
        TechnologyStatus::InProgress,
        TechnologyStatus::Completed,
    ];

    /// The status reached by one step of the cycle.
    pub fn next(self) -> Self {
        match self {
            Self::NotStarted => Self::InProgress,
            Self::InProgress => Self::Completed,
            Self::Completed => Self::NotStarted,
        }
    }

    /// The wire literal for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for TechnologyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TechnologyStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "not-started" => Ok(Self::NotStarted),
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(CoreError::InvalidInput(format!("unknown status: {other}"))),
        }
    }
}

/// Input for creating a technology.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTechnology {
    /// Title (required, must not be blank)
    pub title: String,
    /// Description
    pub description: String,
    /// Initial status; `NotStarted` when absent
    pub status: Option<TechnologyStatus>,
    /// Initial notes
    pub notes: String,
    /// Initial deadline
    pub deadline: Option<NaiveDate>,
}

impl NewTechnology {
    /// Input with only a title set.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Build the record under the given id.
    pub fn into_technology(self, id: TechnologyId) -> Result<Technology> {
        ensure_title(&self.title)?;
        Ok(Technology {
            id,
            title: self.title,
            description: self.description,
            status: self.status.unwrap_or_default(),
            notes: self.notes,
            deadline: self.deadline,
        })
    }
}

/// Partial update for an existing technology. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TechnologyPatch {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New status
    pub status: Option<TechnologyStatus>,
    /// New notes
    pub notes: Option<String>,
    /// New deadline; `Some(None)` clears it
    pub deadline: Option<Option<NaiveDate>>,
}

impl TechnologyPatch {
    /// Whether the patch carries no fields.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.notes.is_none()
            && self.deadline.is_none()
    }

    /// Check the patch without applying it.
    pub fn validate(&self) -> Result<()> {
        match &self.title {
            Some(title) => ensure_title(title),
            None => Ok(()),
        }
    }

    /// Merge present fields into `tech`.
    pub fn apply(self, tech: &mut Technology) -> Result<()> {
        self.validate()?;
        if let Some(title) = self.title {
            tech.title = title;
        }
        if let Some(description) = self.description {
            tech.description = description;
        }
        if let Some(status) = self.status {
            tech.status = status;
        }
        if let Some(notes) = self.notes {
            tech.notes = notes;
        }
        if let Some(deadline) = self.deadline {
            tech.deadline = deadline;
        }
        Ok(())
    }
}

pub(crate) fn ensure_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(CoreError::InvalidInput("title must not be empty".to_string()));
    }
    Ok(())
}
