//! # Storage Layer
//!
//! Persistence for the allocation and scheduling core. The domain services
//! only see the traits in [`traits`]; the file-based implementation lives in
//! [`csv`].

pub mod csv;
pub mod traits;

pub use traits::{
    BuildingAllocationStorage, RecurringTaskStorage, TaskStorage, TransactionAllocationStorage,
    UnitStorage,
};
