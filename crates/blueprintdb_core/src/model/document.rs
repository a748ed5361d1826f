//! Stored document envelopes.
//!
//! # Responsibility
//! - Define the persisted `{nodes, edges, timestamp}` record.
//! - Define list projections returned by the document store.
//!
//! # Invariants
//! - A record carries all three fields; partial records are corrupt.
//! - Timestamps are UTC and truncated to millisecond precision.

use crate::model::diagram::Diagram;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Persisted record stored under one document key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    #[serde(flatten)]
    pub diagram: Diagram,
    /// Save time, serialized as ISO-8601.
    pub timestamp: DateTime<Utc>,
}

impl DocumentRecord {
    pub fn new(diagram: Diagram, timestamp: DateTime<Utc>) -> Self {
        Self {
            diagram,
            timestamp: timestamp.trunc_subsecs(3),
        }
    }
}

/// One row of the recent-documents list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSummary {
    pub name: String,
    pub timestamp: DateTime<Utc>,
}

impl DocumentSummary {
    /// Short UTC date for the recent-files menu, e.g. `17/10/26, 7:05 pm`.
    pub fn display_date(&self) -> String {
        self.timestamp.format("%d/%m/%y, %-I:%M %P").to_string()
    }
}

/// Result of scanning the store for documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentListing {
    /// Sorted by `timestamp DESC, name ASC`.
    pub items: Vec<DocumentSummary>,
    /// Names whose stored value could not be parsed.
    pub skipped: Vec<String>,
}

impl DocumentListing {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.name.as_str()).collect()
    }
}
