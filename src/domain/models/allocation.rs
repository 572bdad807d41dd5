//! Domain models for cost allocations.
//!
//! Two parallel shapes share one idea: a record assigning a share of a shared
//! cost to a specific unit. Building scope expresses shares as percentages
//! summing to 100; transaction scope expresses them as amounts summing to the
//! transaction total.
use serde::{Deserialize, Serialize};

/// Percentage-based allocation of a building's common expenses to one unit.
///
/// Invariant (per building): the percentages over all rows sum to exactly 0
/// (nothing configured) or to 100 within a 0.01 tolerance. The whole set for
/// a building is replaced on save, never patched row by row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingAllocation {
    pub building_id: String,
    pub unit_id: String,
    pub percentage: f64,
}

/// Amount-based allocation of a single financial transaction to one unit.
///
/// Invariant (per transaction): the amounts over all rows sum to the parent
/// transaction's amount within $0.01. The `percentage` field is derived from
/// the transaction amount for display and carries no invariant of its own.
/// Meaningful only for expense-type transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionAllocation {
    pub transaction_id: String,
    pub unit_id: String,
    pub amount: f64,
    pub percentage: Option<f64>,
}

/// Transaction allocation row joined with the unit's address for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionAllocationView {
    pub unit_id: String,
    pub unit_address: String,
    pub amount: f64,
    pub percentage: Option<f64>,
}

/// Outcome of a sum-invariant check.
///
/// Validation failures are values, not errors: callers surface `error` to the
/// user and retry with corrected input. The message always states the
/// computed total to aid correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationValidation {
    pub valid: bool,
    pub error: Option<String>,
}

impl AllocationValidation {
    pub fn valid() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    pub fn invalid(message: String) -> Self {
        Self {
            valid: false,
            error: Some(message),
        }
    }
}
