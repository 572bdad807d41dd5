//! # Task Service
//!
//! The lifecycle of a work order from creation to a terminal state:
//! `open` → `in_progress` → `completed` | `cancelled`, with the shortcuts
//! `open` → `completed` and `open` → `cancelled`. Completion stamps
//! `completed_at`/`completed_by` exactly once; nothing ever clears them.
//! There is no un-complete in the model, even when a task is re-opened.
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use log::{info, warn};
use std::sync::Arc;

use crate::domain::commands::task::{
    CreateTaskCommand, CreateTaskResult, DeleteTaskCommand, DeleteTaskResult,
    TransitionTaskCommand, TransitionTaskResult, UpdateTaskCostsCommand, UpdateTaskCostsResult,
};
use crate::domain::errors::DomainError;
use crate::domain::models::task::{Task, TaskStatus};
use crate::storage::csv::{CsvConnection, TaskRepository, UnitRepository};
use crate::storage::traits::{TaskStorage, UnitStorage};

/// Service owning the work-order state machine
#[derive(Clone)]
pub struct TaskService {
    task_repository: TaskRepository,
    unit_repository: UnitRepository,
}

impl TaskService {
    /// Create a new TaskService
    pub fn new(csv_conn: Arc<CsvConnection>) -> Self {
        let task_repository = TaskRepository::new((*csv_conn).clone());
        let unit_repository = UnitRepository::new((*csv_conn).clone());
        Self {
            task_repository,
            unit_repository,
        }
    }

    /// Create a work order directly (the non-template path)
    pub fn create_task(&self, command: CreateTaskCommand) -> Result<CreateTaskResult> {
        info!(
            "Creating task '{}' for unit {} (user {})",
            command.title, command.unit_id, command.acting_user_id
        );

        if command.title.trim().is_empty() {
            return Err(anyhow::anyhow!("Task title cannot be empty"));
        }
        if let Some(cost) = command.estimated_cost {
            if cost < 0.0 {
                return Err(anyhow::anyhow!("Estimated cost cannot be negative"));
            }
        }
        let due_date = NaiveDate::parse_from_str(&command.due_date, "%Y-%m-%d").map_err(|_| {
            anyhow::anyhow!(
                "Invalid due date format: {} (expected YYYY-MM-DD)",
                command.due_date
            )
        })?;

        if self.unit_repository.get_unit(&command.unit_id)?.is_none() {
            return Err(DomainError::NotFound {
                entity: "Unit",
                id: command.unit_id.clone(),
            }
            .into());
        }

        let now = Utc::now();
        let task = Task {
            id: Task::generate_id(&command.unit_id, now.timestamp_millis() as u64),
            unit_id: command.unit_id,
            title: command.title.trim().to_string(),
            description: command.description,
            priority: command.priority,
            due_date,
            assigned_contractor_id: command.assigned_contractor_id,
            status: TaskStatus::Open,
            estimated_cost: command.estimated_cost,
            actual_cost: None,
            completed_at: None,
            completed_by: None,
            created_at: now,
        };

        self.task_repository.store_task(&task)?;

        info!("Created task: {}", task.id);
        Ok(CreateTaskResult { task })
    }

    /// Move a task to a new status.
    ///
    /// Entering `completed` stamps `completed_at` and `completed_by`, applies
    /// `actual_cost` when provided, and signals the contractor-rating prompt
    /// when a contractor is assigned. Every other target status leaves the
    /// completion fields exactly as they were. A persistence failure leaves
    /// the stored task in its prior state.
    pub fn transition(&self, command: TransitionTaskCommand) -> Result<TransitionTaskResult> {
        info!(
            "Transitioning task {} to '{}' (user {})",
            command.task_id, command.new_status, command.acting_user_id
        );

        let new_status = TaskStatus::from_string(&command.new_status).map_err(|_| {
            warn!("Rejected unknown task status: {}", command.new_status);
            DomainError::InvalidStatus {
                value: command.new_status.clone(),
            }
        })?;

        let mut task = self.load_task(&command.task_id)?;

        task.status = new_status;
        let mut prompt_contractor_rating = false;
        if new_status == TaskStatus::Completed {
            task.completed_at = Some(Utc::now());
            task.completed_by = Some(command.acting_user_id.clone());
            if let Some(actual_cost) = command.actual_cost {
                task.actual_cost = Some(actual_cost);
            }
            prompt_contractor_rating = task.assigned_contractor_id.is_some();
        }

        self.task_repository.update_task(&task)?;

        info!(
            "Task {} is now {} (rating prompt: {})",
            task.id,
            task.status.to_string(),
            prompt_contractor_rating
        );

        Ok(TransitionTaskResult {
            task,
            prompt_contractor_rating,
        })
    }

    /// Edit the cost fields of a task. `None` fields are left unchanged.
    pub fn update_costs(&self, command: UpdateTaskCostsCommand) -> Result<UpdateTaskCostsResult> {
        info!(
            "Updating costs for task {} (user {})",
            command.task_id, command.acting_user_id
        );

        let mut task = self.load_task(&command.task_id)?;

        if let Some(estimated_cost) = command.estimated_cost {
            if estimated_cost < 0.0 {
                return Err(anyhow::anyhow!("Estimated cost cannot be negative"));
            }
            task.estimated_cost = Some(estimated_cost);
        }
        if let Some(actual_cost) = command.actual_cost {
            if actual_cost < 0.0 {
                return Err(anyhow::anyhow!("Actual cost cannot be negative"));
            }
            task.actual_cost = Some(actual_cost);
        }

        self.task_repository.update_task(&task)?;

        Ok(UpdateTaskCostsResult { task })
    }

    /// Delete a task. No cascading effects on the template that spawned it.
    pub fn delete_task(&self, command: DeleteTaskCommand) -> Result<DeleteTaskResult> {
        info!(
            "Deleting task {} (user {})",
            command.task_id, command.acting_user_id
        );

        let deleted = self.task_repository.delete_task(&command.task_id)?;
        if !deleted {
            warn!("No task found to delete: {}", command.task_id);
            return Err(DomainError::NotFound {
                entity: "Task",
                id: command.task_id,
            }
            .into());
        }

        Ok(DeleteTaskResult {
            success_message: format!("Task '{}' deleted successfully", command.task_id),
        })
    }

    /// Get a single task by ID
    pub fn get_task(&self, task_id: &str) -> Result<Option<Task>> {
        self.task_repository.get_task(task_id)
    }

    /// List all tasks for a unit, most recently created first
    pub fn list_tasks_for_unit(&self, unit_id: &str) -> Result<Vec<Task>> {
        let tasks = self.task_repository.list_tasks_for_unit(unit_id)?;
        info!("Found {} tasks for unit {}", tasks.len(), unit_id);
        Ok(tasks)
    }

    fn load_task(&self, task_id: &str) -> Result<Task> {
        self.task_repository.get_task(task_id)?.ok_or_else(|| {
            DomainError::NotFound {
                entity: "Task",
                id: task_id.to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::task::TaskPriority;
    use crate::domain::models::unit::Unit;
    use tempfile::{tempdir, TempDir};

    fn setup_test() -> (TaskService, TempDir) {
        let temp_dir = tempdir().unwrap();
        let conn = CsvConnection::new(temp_dir.path().to_path_buf()).unwrap();
        let service = TaskService::new(Arc::new(conn.clone()));

        UnitRepository::new(conn)
            .store_unit(&Unit {
                id: "unit::1".to_string(),
                building_id: "building::1".to_string(),
                address: "12 Elm St, Apt 1".to_string(),
            })
            .expect("Failed to seed test unit");

        (service, temp_dir)
    }

    fn create_command(contractor: Option<&str>) -> CreateTaskCommand {
        CreateTaskCommand {
            unit_id: "unit::1".to_string(),
            title: "Fix leaking faucet".to_string(),
            description: "Kitchen faucet drips".to_string(),
            priority: TaskPriority::High,
            due_date: "2025-05-01".to_string(),
            assigned_contractor_id: contractor.map(|c| c.to_string()),
            estimated_cost: Some(150.0),
            acting_user_id: "user::1".to_string(),
        }
    }

    fn transition_command(task_id: &str, status: &str, cost: Option<f64>) -> TransitionTaskCommand {
        TransitionTaskCommand {
            task_id: task_id.to_string(),
            new_status: status.to_string(),
            actual_cost: cost,
            acting_user_id: "user::1".to_string(),
        }
    }

    #[test]
    fn test_create_task() {
        let (service, _temp_dir) = setup_test();

        let task = service
            .create_task(create_command(None))
            .expect("Failed to create task")
            .task;

        assert_eq!(task.status, TaskStatus::Open);
        assert_eq!(task.estimated_cost, Some(150.0));
        assert!(task.completed_at.is_none());
        assert_eq!(service.get_task(&task.id).unwrap(), Some(task));
    }

    #[test]
    fn test_completion_stamps_fields_and_prompts_rating() {
        let (service, _temp_dir) = setup_test();
        let task = service
            .create_task(create_command(Some("contractor::1")))
            .unwrap()
            .task;

        let result = service
            .transition(transition_command(&task.id, "completed", Some(275.0)))
            .expect("Failed to complete task");

        assert_eq!(result.task.status, TaskStatus::Completed);
        assert!(result.task.completed_at.is_some());
        assert_eq!(result.task.completed_by, Some("user::1".to_string()));
        assert_eq!(result.task.actual_cost, Some(275.0));
        assert!(result.prompt_contractor_rating);
    }

    #[test]
    fn test_completion_without_contractor_does_not_prompt() {
        let (service, _temp_dir) = setup_test();
        let task = service.create_task(create_command(None)).unwrap().task;

        let result = service
            .transition(transition_command(&task.id, "completed", None))
            .unwrap();

        assert!(!result.prompt_contractor_rating);
        assert!(result.task.actual_cost.is_none());
    }

    #[test]
    fn test_reopening_does_not_clear_completion_fields() {
        let (service, _temp_dir) = setup_test();
        let task = service
            .create_task(create_command(Some("contractor::1")))
            .unwrap()
            .task;

        service
            .transition(transition_command(&task.id, "completed", Some(275.0)))
            .unwrap();

        let reopened = service
            .transition(transition_command(&task.id, "open", None))
            .unwrap();

        assert_eq!(reopened.task.status, TaskStatus::Open);
        // No un-complete exists: the stamps survive re-opening
        assert!(reopened.task.completed_at.is_some());
        assert_eq!(reopened.task.completed_by, Some("user::1".to_string()));
        assert_eq!(reopened.task.actual_cost, Some(275.0));
        assert!(!reopened.prompt_contractor_rating);
    }

    #[test]
    fn test_in_progress_path() {
        let (service, _temp_dir) = setup_test();
        let task = service.create_task(create_command(None)).unwrap().task;

        let started = service
            .transition(transition_command(&task.id, "in_progress", None))
            .unwrap();
        assert_eq!(started.task.status, TaskStatus::InProgress);
        assert!(started.task.completed_at.is_none());
        assert!(!started.prompt_contractor_rating);

        let cancelled = service
            .transition(transition_command(&task.id, "cancelled", None))
            .unwrap();
        assert_eq!(cancelled.task.status, TaskStatus::Cancelled);
        assert!(cancelled.task.completed_at.is_none());
    }

    #[test]
    fn test_unknown_status_is_a_validation_error() {
        let (service, _temp_dir) = setup_test();
        let task = service.create_task(create_command(None)).unwrap().task;

        let err = service
            .transition(transition_command(&task.id, "done", None))
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::InvalidStatus { .. })
        ));

        // The stored task was not touched
        let stored = service.get_task(&task.id).unwrap().unwrap();
        assert_eq!(stored.status, TaskStatus::Open);
    }

    #[test]
    fn test_transition_missing_task_is_not_found() {
        let (service, _temp_dir) = setup_test();

        let err = service
            .transition(transition_command("task::ghost", "completed", None))
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::NotFound { .. })
        ));
    }

    #[test]
    fn test_update_costs() {
        let (service, _temp_dir) = setup_test();
        let task = service.create_task(create_command(None)).unwrap().task;

        let updated = service
            .update_costs(UpdateTaskCostsCommand {
                task_id: task.id.clone(),
                estimated_cost: Some(200.0),
                actual_cost: Some(180.0),
                acting_user_id: "user::1".to_string(),
            })
            .unwrap()
            .task;

        assert_eq!(updated.estimated_cost, Some(200.0));
        assert_eq!(updated.actual_cost, Some(180.0));

        let rejected = service.update_costs(UpdateTaskCostsCommand {
            task_id: task.id.clone(),
            estimated_cost: None,
            actual_cost: Some(-1.0),
            acting_user_id: "user::1".to_string(),
        });
        assert!(rejected.is_err());
    }

    #[test]
    fn test_delete_task() {
        let (service, _temp_dir) = setup_test();
        let task = service.create_task(create_command(None)).unwrap().task;

        service
            .delete_task(DeleteTaskCommand {
                task_id: task.id.clone(),
                acting_user_id: "user::1".to_string(),
            })
            .unwrap();

        assert!(service.get_task(&task.id).unwrap().is_none());

        let err = service
            .delete_task(DeleteTaskCommand {
                task_id: task.id,
                acting_user_id: "user::1".to_string(),
            })
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::NotFound { .. })
        ));
    }

    #[test]
    fn test_list_tasks_for_unit() {
        let (service, _temp_dir) = setup_test();
        service.create_task(create_command(None)).unwrap();
        let mut second = create_command(None);
        second.title = "Replace smoke detector".to_string();
        service.create_task(second).unwrap();

        let tasks = service.list_tasks_for_unit("unit::1").unwrap();
        assert_eq!(tasks.len(), 2);

        assert!(service.list_tasks_for_unit("unit::2").unwrap().is_empty());
    }
}
