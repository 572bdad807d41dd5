//! Domain model for a recurring-task template.
use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};

use super::task::TaskPriority;

/// Inclusive bounds for a template's generation cadence, in calendar days.
pub const MIN_INTERVAL_DAYS: u32 = 1;
pub const MAX_INTERVAL_DAYS: u32 = 365;

/// The schedule definition a work order is generated from.
///
/// The scheduler exclusively owns the scheduling fields (`next_due_date`,
/// `last_generated_at`, `is_active`). Templates are never deleted
/// automatically, and deleting one does not cascade to tasks it previously
/// generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringTaskTemplate {
    pub id: String,
    pub unit_id: String,
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub interval_days: u32,
    pub next_due_date: NaiveDate,
    pub assigned_contractor_id: Option<String>,
    pub is_active: bool,
    pub last_generated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecurringTaskTemplate {
    /// Generate a unique template ID based on the unit and current timestamp.
    /// Format: template::<unit_id>::<timestamp_ms>-<random_suffix>
    pub fn generate_id(unit_id: &str, timestamp_ms: u64) -> String {
        format!(
            "template::{}::{}-{}",
            unit_id,
            timestamp_ms,
            super::task::generate_random_suffix(4)
        )
    }

    /// Check whether an interval is inside the allowed cadence bounds
    pub fn is_valid_interval(interval_days: u32) -> bool {
        (MIN_INTERVAL_DAYS..=MAX_INTERVAL_DAYS).contains(&interval_days)
    }
}
