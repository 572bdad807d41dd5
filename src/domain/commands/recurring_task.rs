//! Commands and results for the recurring-task scheduler.
use serde::{Deserialize, Serialize};

use crate::domain::models::recurring_task::RecurringTaskTemplate;
use crate::domain::models::task::{Task, TaskPriority};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRecurringTaskCommand {
    pub unit_id: String,
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub interval_days: u32,
    /// First due date, YYYY-MM-DD
    pub next_due_date: String,
    pub assigned_contractor_id: Option<String>,
    pub acting_user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRecurringTaskResult {
    pub template: RecurringTaskTemplate,
}

/// Edit a template. Fields left as `None` are unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRecurringTaskCommand {
    pub template_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub interval_days: Option<u32>,
    /// New next due date, YYYY-MM-DD
    pub next_due_date: Option<String>,
    pub assigned_contractor_id: Option<String>,
    pub acting_user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRecurringTaskResult {
    pub template: RecurringTaskTemplate,
}

/// Pause or resume a template. Unconditional set; never touches the
/// schedule itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleRecurringTaskCommand {
    pub template_id: String,
    pub is_active: bool,
    pub acting_user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleRecurringTaskResult {
    pub template: RecurringTaskTemplate,
}

/// Materialize one concrete task from a template now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateTaskCommand {
    pub template_id: String,
    pub acting_user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateTaskResult {
    pub task: Task,
    /// The template with its schedule advanced past the generated task
    pub template: RecurringTaskTemplate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteRecurringTaskCommand {
    pub template_id: String,
    pub acting_user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteRecurringTaskResult {
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListRecurringTasksResult {
    pub templates: Vec<RecurringTaskTemplate>,
}
