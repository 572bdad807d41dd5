//! # Domain Layer
//!
//! Services, models and command types for the allocation engine and the
//! recurring-work scheduler. Services own the invariants; persistence is
//! delegated to the storage layer through the traits in `crate::storage`.

pub mod commands;
pub mod models;

pub mod allocation_service;
pub mod equal_split;
pub mod errors;
pub mod recurring_task_service;
pub mod task_service;

pub use allocation_service::AllocationService;
pub use errors::DomainError;
pub use recurring_task_service::RecurringTaskService;
pub use task_service::TaskService;
