//! # Property Core
//!
//! Allocation & recurring-work scheduling core for a property-management CRM.
//!
//! The surrounding CRM (units, tenants, leases, contractors, ledger CRUD) is
//! out of scope and talks to this crate through narrow interfaces. What lives
//! here is the stateful part with real invariants:
//!
//! - an **allocation engine** that splits a shared cost across units under a
//!   strict sum invariant (percentage mode keyed by building, amount mode
//!   keyed by financial transaction), plus a pure equal-split calculator;
//! - a **recurring-task scheduler** that materializes concrete work orders
//!   from templates and advances due dates without drift, plus the lifecycle
//!   state machine for generated work orders.
//!
//! All operations are synchronous request/response calls; there is no
//! background timer loop. Generation is triggered on demand by the caller.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

// Domain modules
pub mod domain;
pub mod storage;

// Re-export commonly used types
pub use storage::csv::CsvConnection;

/// Main backend struct that orchestrates all services
pub struct Backend {
    pub allocation_service: domain::AllocationService,
    pub recurring_task_service: domain::RecurringTaskService,
    pub task_service: domain::TaskService,
}

impl Backend {
    /// Create a new backend instance with all services rooted at `data_dir`
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        let csv_conn = Arc::new(CsvConnection::new(data_dir)?);

        let allocation_service = domain::AllocationService::new(csv_conn.clone());
        let recurring_task_service = domain::RecurringTaskService::new(csv_conn.clone());
        let task_service = domain::TaskService::new(csv_conn);

        Ok(Backend {
            allocation_service,
            recurring_task_service,
            task_service,
        })
    }
}
