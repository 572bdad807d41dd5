//! Commands and results for the allocation engine.
use serde::{Deserialize, Serialize};

use crate::domain::models::allocation::{
    AllocationValidation, BuildingAllocation, TransactionAllocation,
};

/// One percentage-mode allocation row as entered by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationInput {
    pub unit_id: String,
    pub percentage: f64,
}

/// One amount-mode allocation row as entered by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmountAllocationInput {
    pub unit_id: String,
    pub amount: f64,
}

/// Replace the entire allocation set for a building.
/// An empty `allocations` list is a valid "clear all allocations" request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsertBuildingAllocationsCommand {
    pub building_id: String,
    pub allocations: Vec<AllocationInput>,
    pub acting_user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsertBuildingAllocationsResult {
    pub validation: AllocationValidation,
    /// The rows now persisted for the building; empty when validation failed
    /// (nothing was written) or when the request cleared the set.
    pub allocations: Vec<BuildingAllocation>,
}

/// Replace the entire allocation set for a financial transaction.
/// Only meaningful for expense-type transactions; the caller passes the
/// transaction's actual amount for the sum check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsertTransactionAllocationsCommand {
    pub transaction_id: String,
    pub transaction_amount: f64,
    pub allocations: Vec<AmountAllocationInput>,
    pub acting_user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsertTransactionAllocationsResult {
    pub validation: AllocationValidation,
    pub allocations: Vec<TransactionAllocation>,
}
