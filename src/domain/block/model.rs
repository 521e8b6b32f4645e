//! Maintenance block entity

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Reason recorded when an administrator leaves it blank
pub const DEFAULT_BLOCK_REASON: &str = "Mantenimiento";

/// Administrator-declared maintenance window over one slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    pub court_id: String,
    pub date: NaiveDate,
    pub time: String,
    pub reason: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Block {
    /// Whether this block covers the given slot
    pub fn covers(&self, court_id: &str, date: NaiveDate, time: &str) -> bool {
        self.court_id == court_id && self.date == date && self.time == time
    }
}

/// Input for `add_block`
#[derive(Debug, Clone)]
pub struct NewBlock {
    pub court_id: String,
    pub date: NaiveDate,
    pub time: String,
    pub reason: String,
}

impl NewBlock {
    pub fn new(
        court_id: impl Into<String>,
        date: NaiveDate,
        time: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            court_id: court_id.into(),
            date,
            time: time.into(),
            reason: reason.into(),
        }
    }

    /// Reason to store, falling back to the default when blank
    pub fn effective_reason(&self) -> String {
        let trimmed = self.reason.trim();
        if trimmed.is_empty() {
            DEFAULT_BLOCK_REASON.to_string()
        } else {
            trimmed.to_string()
        }
    }
}
