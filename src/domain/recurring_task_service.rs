//! # Recurring Task Service
//!
//! Owns recurring-task templates: creation and edits, the active/paused
//! toggle, and the "generate one concrete task now" operation. There is no
//! background scheduler process; generation is invoked on demand, once per
//! due template, by an external caller.
//!
//! Due-date advancement is calendar math from the *previous scheduled date*,
//! never from "now", so a late generation does not compress the following
//! interval.
use anyhow::Result;
use chrono::{Duration, NaiveDate, Utc};
use log::{info, warn};
use std::sync::Arc;

use crate::domain::commands::recurring_task::{
    CreateRecurringTaskCommand, CreateRecurringTaskResult, DeleteRecurringTaskCommand,
    DeleteRecurringTaskResult, GenerateTaskCommand, GenerateTaskResult, ListRecurringTasksResult,
    ToggleRecurringTaskCommand, ToggleRecurringTaskResult, UpdateRecurringTaskCommand,
    UpdateRecurringTaskResult,
};
use crate::domain::errors::DomainError;
use crate::domain::models::recurring_task::{
    RecurringTaskTemplate, MAX_INTERVAL_DAYS, MIN_INTERVAL_DAYS,
};
use crate::domain::models::task::{Task, TaskStatus};
use crate::storage::csv::{CsvConnection, RecurringTaskRepository, TaskRepository, UnitRepository};
use crate::storage::traits::{RecurringTaskStorage, TaskStorage, UnitStorage};

/// Service owning template scheduling state
#[derive(Clone)]
pub struct RecurringTaskService {
    recurring_task_repository: RecurringTaskRepository,
    task_repository: TaskRepository,
    unit_repository: UnitRepository,
}

impl RecurringTaskService {
    /// Create a new RecurringTaskService
    pub fn new(csv_conn: Arc<CsvConnection>) -> Self {
        let recurring_task_repository = RecurringTaskRepository::new((*csv_conn).clone());
        let task_repository = TaskRepository::new((*csv_conn).clone());
        let unit_repository = UnitRepository::new((*csv_conn).clone());
        Self {
            recurring_task_repository,
            task_repository,
            unit_repository,
        }
    }

    /// Create a new recurring-task template
    pub fn create_template(
        &self,
        command: CreateRecurringTaskCommand,
    ) -> Result<CreateRecurringTaskResult> {
        info!(
            "Creating recurring task template '{}' for unit {} every {} days (user {})",
            command.title, command.unit_id, command.interval_days, command.acting_user_id
        );

        if command.title.trim().is_empty() {
            return Err(anyhow::anyhow!("Template title cannot be empty"));
        }
        Self::validate_interval(command.interval_days)?;
        let next_due_date = Self::parse_date(&command.next_due_date)?;

        if self.unit_repository.get_unit(&command.unit_id)?.is_none() {
            return Err(DomainError::NotFound {
                entity: "Unit",
                id: command.unit_id.clone(),
            }
            .into());
        }

        let now = Utc::now();
        let template = RecurringTaskTemplate {
            id: RecurringTaskTemplate::generate_id(
                &command.unit_id,
                now.timestamp_millis() as u64,
            ),
            unit_id: command.unit_id,
            title: command.title.trim().to_string(),
            description: command.description,
            priority: command.priority,
            interval_days: command.interval_days,
            next_due_date,
            assigned_contractor_id: command.assigned_contractor_id,
            is_active: true,
            last_generated_at: None,
            created_at: now,
            updated_at: now,
        };

        self.recurring_task_repository.store_template(&template)?;

        info!("Created recurring task template: {}", template.id);
        Ok(CreateRecurringTaskResult { template })
    }

    /// Edit an existing template. `None` fields are left unchanged.
    pub fn update_template(
        &self,
        command: UpdateRecurringTaskCommand,
    ) -> Result<UpdateRecurringTaskResult> {
        info!("Updating recurring task template: {}", command.template_id);

        let mut template = self.load_template(&command.template_id)?;

        if let Some(title) = command.title {
            if title.trim().is_empty() {
                return Err(anyhow::anyhow!("Template title cannot be empty"));
            }
            template.title = title.trim().to_string();
        }
        if let Some(description) = command.description {
            template.description = description;
        }
        if let Some(priority) = command.priority {
            template.priority = priority;
        }
        if let Some(interval_days) = command.interval_days {
            Self::validate_interval(interval_days)?;
            template.interval_days = interval_days;
        }
        if let Some(ref next_due_date) = command.next_due_date {
            template.next_due_date = Self::parse_date(next_due_date)?;
        }
        if let Some(contractor_id) = command.assigned_contractor_id {
            template.assigned_contractor_id = Some(contractor_id);
        }
        template.updated_at = Utc::now();

        self.recurring_task_repository.update_template(&template)?;

        info!("Updated recurring task template: {}", template.id);
        Ok(UpdateRecurringTaskResult { template })
    }

    /// Pause or resume a template.
    ///
    /// Unconditional set of `is_active`; the schedule (`next_due_date`) is
    /// never touched, so resuming picks up where the template left off.
    pub fn toggle_active(
        &self,
        command: ToggleRecurringTaskCommand,
    ) -> Result<ToggleRecurringTaskResult> {
        info!(
            "Setting recurring task template {} active={} (user {})",
            command.template_id, command.is_active, command.acting_user_id
        );

        let mut template = self.load_template(&command.template_id)?;
        template.is_active = command.is_active;
        template.updated_at = Utc::now();

        self.recurring_task_repository.update_template(&template)?;

        Ok(ToggleRecurringTaskResult { template })
    }

    /// Materialize one concrete task from a template and advance its schedule.
    ///
    /// Refused with `InactiveTemplate` when the template is paused: the
    /// caller asked for generation explicitly, so a silent skip would hide a
    /// mistake. The task snapshot and the template advance are two separate
    /// writes; a crash between them can leave a generated task whose template
    /// was not advanced.
    pub fn generate(&self, command: GenerateTaskCommand) -> Result<GenerateTaskResult> {
        info!(
            "Generating task from template {} (user {})",
            command.template_id, command.acting_user_id
        );

        let mut template = self.load_template(&command.template_id)?;

        if !template.is_active {
            warn!(
                "Refusing to generate from paused template: {}",
                template.id
            );
            return Err(DomainError::InactiveTemplate {
                template_id: template.id,
            }
            .into());
        }

        let now = Utc::now();
        let task = Task {
            id: Task::generate_id(&template.unit_id, now.timestamp_millis() as u64),
            unit_id: template.unit_id.clone(),
            title: template.title.clone(),
            description: template.description.clone(),
            priority: template.priority,
            due_date: template.next_due_date,
            assigned_contractor_id: template.assigned_contractor_id.clone(),
            status: TaskStatus::Open,
            estimated_cost: None,
            actual_cost: None,
            completed_at: None,
            completed_by: None,
            created_at: now,
        };

        self.task_repository.store_task(&task)?;

        // Advance from the previous scheduled date, not from now
        template.next_due_date =
            template.next_due_date + Duration::days(i64::from(template.interval_days));
        template.last_generated_at = Some(now);
        template.updated_at = now;
        self.recurring_task_repository.update_template(&template)?;

        info!(
            "Generated task {} due {} from template {}; next due {}",
            task.id, task.due_date, template.id, template.next_due_date
        );

        Ok(GenerateTaskResult { task, template })
    }

    /// Delete a template. Tasks it previously generated are untouched.
    pub fn delete_template(
        &self,
        command: DeleteRecurringTaskCommand,
    ) -> Result<DeleteRecurringTaskResult> {
        info!(
            "Deleting recurring task template {} (user {})",
            command.template_id, command.acting_user_id
        );

        let deleted = self
            .recurring_task_repository
            .delete_template(&command.template_id)?;

        if !deleted {
            warn!(
                "No recurring task template found to delete: {}",
                command.template_id
            );
            return Err(DomainError::NotFound {
                entity: "Recurring task template",
                id: command.template_id,
            }
            .into());
        }

        Ok(DeleteRecurringTaskResult {
            success_message: format!(
                "Recurring task template '{}' deleted successfully",
                command.template_id
            ),
        })
    }

    /// Get a single template by ID
    pub fn get_template(&self, template_id: &str) -> Result<Option<RecurringTaskTemplate>> {
        self.recurring_task_repository.get_template(template_id)
    }

    /// List all templates
    pub fn list_templates(&self) -> Result<ListRecurringTasksResult> {
        let templates = self.recurring_task_repository.list_templates()?;
        info!("Found {} recurring task templates", templates.len());
        Ok(ListRecurringTasksResult { templates })
    }

    fn load_template(&self, template_id: &str) -> Result<RecurringTaskTemplate> {
        self.recurring_task_repository
            .get_template(template_id)?
            .ok_or_else(|| {
                DomainError::NotFound {
                    entity: "Recurring task template",
                    id: template_id.to_string(),
                }
                .into()
            })
    }

    fn validate_interval(interval_days: u32) -> Result<()> {
        if !RecurringTaskTemplate::is_valid_interval(interval_days) {
            return Err(anyhow::anyhow!(
                "Interval must be between {} and {} days, got {}",
                MIN_INTERVAL_DAYS,
                MAX_INTERVAL_DAYS,
                interval_days
            ));
        }
        Ok(())
    }

    fn parse_date(date: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| anyhow::anyhow!("Invalid date format: {} (expected YYYY-MM-DD)", date))
    }
}
