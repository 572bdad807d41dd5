//! Commands and results for the task lifecycle.
use serde::{Deserialize, Serialize};

use crate::domain::models::task::{Task, TaskPriority};

/// Create a work order directly (the non-template path).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTaskCommand {
    pub unit_id: String,
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    /// Due date, YYYY-MM-DD
    pub due_date: String,
    pub assigned_contractor_id: Option<String>,
    pub estimated_cost: Option<f64>,
    pub acting_user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTaskResult {
    pub task: Task,
}

/// Move a task to a new status.
///
/// `new_status` arrives as the raw string from the request layer; anything
/// outside the four legal statuses is a validation error. `actual_cost` is
/// only applied when transitioning into `completed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionTaskCommand {
    pub task_id: String,
    pub new_status: String,
    pub actual_cost: Option<f64>,
    pub acting_user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionTaskResult {
    pub task: Task,
    /// True when the task just completed and has an assigned contractor; the
    /// caller should prompt the user to rate the contractor. The rating flow
    /// itself lives outside this core.
    pub prompt_contractor_rating: bool,
}

/// Edit the cost fields of a task. Fields left as `None` are unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateTaskCostsCommand {
    pub task_id: String,
    pub estimated_cost: Option<f64>,
    pub actual_cost: Option<f64>,
    pub acting_user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateTaskCostsResult {
    pub task: Task,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteTaskCommand {
    pub task_id: String,
    pub acting_user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteTaskResult {
    pub success_message: String,
}
