//! # CSV Storage Module
//!
//! File-based storage implementation for the allocation and scheduling core.
//! Row-shaped data (units, allocations, tasks) lives in CSV files; recurring
//! task templates are stored as one YAML document each.
//!
//! ## Layout
//!
//! ```text
//! data/
//! ├── units.csv
//! ├── tasks.csv
//! ├── building_allocations/
//! │   └── {building_id}.csv
//! ├── transaction_allocations/
//! │   └── {transaction_id}.csv
//! └── recurring_tasks/
//!     └── {template_id}.yaml
//! ```
//!
//! All writes go through an atomic temp-file-then-rename pattern so a crash
//! mid-write never leaves a half-written file behind.

pub mod building_allocation_repository;
pub mod connection;
pub mod recurring_task_repository;
pub mod task_repository;
pub mod transaction_allocation_repository;
pub mod unit_repository;

pub use building_allocation_repository::BuildingAllocationRepository;
pub use connection::CsvConnection;
pub use recurring_task_repository::RecurringTaskRepository;
pub use task_repository::TaskRepository;
pub use transaction_allocation_repository::TransactionAllocationRepository;
pub use unit_repository::UnitRepository;
