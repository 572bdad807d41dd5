//! Domain models shared by the services and the storage layer.

pub mod allocation;
pub mod recurring_task;
pub mod task;
pub mod unit;
