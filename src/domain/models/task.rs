//! Domain models for work orders (tasks).
use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TaskStatus {
    Open,
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    /// Convert to string for CSV storage
    pub fn to_string(&self) -> String {
        match self {
            TaskStatus::Open => "open".to_string(),
            TaskStatus::InProgress => "in_progress".to_string(),
            TaskStatus::Completed => "completed".to_string(),
            TaskStatus::Cancelled => "cancelled".to_string(),
        }
    }

    /// Parse from string; rejects anything outside the four legal statuses
    pub fn from_string(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "open" => Ok(TaskStatus::Open),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            "cancelled" => Ok(TaskStatus::Cancelled),
            _ => Err(format!("Invalid task status: {}", s)),
        }
    }

    /// Terminal statuses have no defined transitions out of them
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    /// Convert to string for CSV storage
    pub fn to_string(&self) -> String {
        match self {
            TaskPriority::Low => "low".to_string(),
            TaskPriority::Medium => "medium".to_string(),
            TaskPriority::High => "high".to_string(),
            TaskPriority::Urgent => "urgent".to_string(),
        }
    }

    /// Parse from string for CSV loading
    pub fn from_string(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            "urgent" => Ok(TaskPriority::Urgent),
            _ => Err(format!("Invalid task priority: {}", s)),
        }
    }
}

/// A concrete work order.
///
/// Created either directly by a user or by the recurring-task scheduler. When
/// generated from a template the fields are copied at creation time as a
/// snapshot, not a live reference; later template edits do not touch existing
/// tasks. `completed_at`/`completed_by` are set once on completion and never
/// cleared, even if the task is re-opened afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub unit_id: String,
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub due_date: NaiveDate,
    pub assigned_contractor_id: Option<String>,
    pub status: TaskStatus,
    pub estimated_cost: Option<f64>,
    pub actual_cost: Option<f64>,
    pub completed_at: Option<DateTime<Utc>>,
    pub completed_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Generate a unique task ID based on the unit and current timestamp.
    /// Format: task::<unit_id>::<timestamp_ms>-<random_suffix>
    pub fn generate_id(unit_id: &str, timestamp_ms: u64) -> String {
        format!(
            "task::{}::{}-{}",
            unit_id,
            timestamp_ms,
            generate_random_suffix(4)
        )
    }
}

/// Generate a random hex suffix for IDs minted in the same millisecond.
pub(crate) fn generate_random_suffix(len: usize) -> String {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("Time went backwards")
        .as_nanos();
    format!("{:x}", now % (16_u128.pow(len as u32)))
        .chars()
        .take(len)
        .collect()
}
