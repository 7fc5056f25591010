//! Snapshot codec for a technology collection.
//!
//! The wire format is a JSON array of records:
//!
//! ```text
//! [{"id":1,"title":"JSX","description":"","status":"in-progress","notes":"","deadline":"2024-05-01"}]
//! ```
//!
//! Decoding is lenient about missing optional fields and strict about
//! anything that would break collection invariants.

use std::collections::HashSet;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use crate::error::{CoreError, Result};
use crate::id::TechnologyId;
use crate::technology::{ensure_title, Technology, TechnologyStatus};

/// Date format used for deadlines.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Serialize a collection.
pub fn encode(items: &[Technology]) -> Result<Vec<u8>> {
    serde_json::to_vec(items).map_err(|e| CoreError::InvalidSnapshot(e.to_string()))
}

/// Deserialize and validate a collection.
pub fn decode(bytes: &[u8]) -> Result<Vec<Technology>> {
    let wire: Vec<WireTechnology> =
        serde_json::from_slice(bytes).map_err(|e| CoreError::InvalidSnapshot(e.to_string()))?;

    let mut seen = HashSet::with_capacity(wire.len());
    let mut items = Vec::with_capacity(wire.len());
    for record in wire {
        if !seen.insert(record.id) {
            return Err(CoreError::InvalidSnapshot(format!("duplicate id {}", record.id)));
        }
        ensure_title(&record.title)
            .map_err(|_| CoreError::InvalidSnapshot(format!("record {} has an empty title", record.id)))?;
        items.push(record.into());
    }
    Ok(items)
}

#[derive(Deserialize)]
struct WireTechnology {
    id: TechnologyId,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: Option<TechnologyStatus>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default, deserialize_with = "blank_or_date")]
    deadline: Option<NaiveDate>,
}

impl From<WireTechnology> for Technology {
    fn from(w: WireTechnology) -> Self {
        Technology {
            id: w.id,
            title: w.title,
            description: w.description.unwrap_or_default(),
            status: w.status.unwrap_or_default(),
            notes: w.notes.unwrap_or_default(),
            deadline: w.deadline,
        }
    }
}

/// Accept `null`, `""`, or a `YYYY-MM-DD` string.
fn blank_or_date<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
