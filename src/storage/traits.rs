//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.
//!
//! The replace-wholesale traits expose the clear and store phases separately
//! on purpose: the domain's delete-then-insert sequence is not atomic beyond
//! its ordering, and the phase that failed must be observable to the caller.
//! A backend with real transactions may implement both phases inside one unit
//! of work; providing that isolation is the backend's responsibility, not the
//! domain's.

use anyhow::Result;
use crate::domain::models::allocation::{BuildingAllocation, TransactionAllocation};
use crate::domain::models::recurring_task::RecurringTaskTemplate;
use crate::domain::models::task::Task;
use crate::domain::models::unit::Unit;

/// Read-only view of the unit directory.
///
/// Units are created and edited by the surrounding CRM; this core only needs
/// existence checks, an ordered unit list per building, and the address for
/// display joins.
pub trait UnitStorage: Send + Sync {
    /// Retrieve a specific unit by ID
    fn get_unit(&self, unit_id: &str) -> Result<Option<Unit>>;

    /// List all units in a building, ordered by unit ID
    fn list_units_for_building(&self, building_id: &str) -> Result<Vec<Unit>>;
}

/// Trait defining the interface for building-scope allocation storage.
pub trait BuildingAllocationStorage: Send + Sync {
    /// Delete every allocation row for a building.
    /// Phase one of a replace-wholesale save.
    fn clear_allocations(&self, building_id: &str) -> Result<()>;

    /// Insert the full allocation set for a building.
    /// Phase two of a replace-wholesale save; assumes the scope was cleared.
    fn store_allocations(
        &self,
        building_id: &str,
        allocations: &[BuildingAllocation],
    ) -> Result<()>;

    /// List all allocation rows for a building; row order is not meaningful
    fn list_allocations(&self, building_id: &str) -> Result<Vec<BuildingAllocation>>;
}

/// Trait defining the interface for transaction-scope allocation storage.
pub trait TransactionAllocationStorage: Send + Sync {
    /// Delete every allocation row for a transaction
    fn clear_allocations(&self, transaction_id: &str) -> Result<()>;

    /// Insert the full allocation set for a transaction
    fn store_allocations(
        &self,
        transaction_id: &str,
        allocations: &[TransactionAllocation],
    ) -> Result<()>;

    /// List all allocation rows for a transaction
    fn list_allocations(&self, transaction_id: &str) -> Result<Vec<TransactionAllocation>>;
}

/// Trait defining the interface for recurring-task template storage.
pub trait RecurringTaskStorage: Send + Sync {
    /// Store a new template
    fn store_template(&self, template: &RecurringTaskTemplate) -> Result<()>;

    /// Retrieve a specific template by ID
    fn get_template(&self, template_id: &str) -> Result<Option<RecurringTaskTemplate>>;

    /// Update an existing template
    fn update_template(&self, template: &RecurringTaskTemplate) -> Result<()>;

    /// Delete a template by ID
    /// Returns true if the template was found and deleted, false otherwise
    fn delete_template(&self, template_id: &str) -> Result<bool>;

    /// List all templates ordered by creation time (most recent first)
    fn list_templates(&self) -> Result<Vec<RecurringTaskTemplate>>;
}

/// Trait defining the interface for work-order storage.
pub trait TaskStorage: Send + Sync {
    /// Store a new task
    fn store_task(&self, task: &Task) -> Result<()>;

    /// Retrieve a specific task by ID
    fn get_task(&self, task_id: &str) -> Result<Option<Task>>;

    /// Update an existing task
    fn update_task(&self, task: &Task) -> Result<()>;

    /// Delete a task by ID
    /// Returns true if the task was found and deleted, false otherwise
    fn delete_task(&self, task_id: &str) -> Result<bool>;

    /// List all tasks for a unit ordered by creation time (most recent first)
    fn list_tasks_for_unit(&self, unit_id: &str) -> Result<Vec<Task>>;
}
