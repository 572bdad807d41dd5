//! # Allocation Service
//!
//! Validates and persists cost allocations across a building's units. Two
//! parallel modes share one shape: percentage mode keyed by building (shares
//! sum to 100) and amount mode keyed by a financial transaction (shares sum
//! to the transaction amount; expense-type transactions only).
//!
//! Saves are replace-wholesale: clear every existing row for the scope, then
//! insert the provided rows. The two steps are not atomic beyond their
//! ordering: a failure after the clear leaves the scope allocation-less,
//! and the error says which phase failed so the caller can tell.
use anyhow::{Context, Result};
use log::{info, warn};
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::commands::allocation::{
    AllocationInput, AmountAllocationInput, UpsertBuildingAllocationsCommand,
    UpsertBuildingAllocationsResult, UpsertTransactionAllocationsCommand,
    UpsertTransactionAllocationsResult,
};
use crate::domain::equal_split::{equal_split, SplitShare};
use crate::domain::errors::DomainError;
use crate::domain::models::allocation::{
    AllocationValidation, BuildingAllocation, TransactionAllocation, TransactionAllocationView,
};
use crate::storage::csv::{
    BuildingAllocationRepository, CsvConnection, TransactionAllocationRepository, UnitRepository,
};
use crate::storage::traits::{
    BuildingAllocationStorage, TransactionAllocationStorage, UnitStorage,
};

/// Tolerance for the percentage sum invariant (|sum - 100| must be below it)
const PERCENTAGE_TOLERANCE: f64 = 0.01;
/// Tolerance for the amount sum invariant (|sum - amount| may equal it)
const AMOUNT_TOLERANCE: f64 = 0.01;

/// Service owning the allocation sum invariants
#[derive(Clone)]
pub struct AllocationService {
    building_allocation_repository: BuildingAllocationRepository,
    transaction_allocation_repository: TransactionAllocationRepository,
    unit_repository: UnitRepository,
}

impl AllocationService {
    /// Create a new AllocationService
    pub fn new(csv_conn: Arc<CsvConnection>) -> Self {
        let building_allocation_repository =
            BuildingAllocationRepository::new((*csv_conn).clone());
        let transaction_allocation_repository =
            TransactionAllocationRepository::new((*csv_conn).clone());
        let unit_repository = UnitRepository::new((*csv_conn).clone());
        Self {
            building_allocation_repository,
            transaction_allocation_repository,
            unit_repository,
        }
    }

    /// Check the percentage sum invariant for a building-scope allocation set.
    ///
    /// An empty set is valid (no allocations configured); otherwise the
    /// percentages must sum to 100 within 0.01. The error message states the
    /// computed total so the user can correct the entry.
    pub fn validate_percentage_sum(allocations: &[AllocationInput]) -> AllocationValidation {
        if allocations.is_empty() {
            return AllocationValidation::valid();
        }

        let total: f64 = allocations.iter().map(|a| a.percentage).sum();
        if (total - 100.0).abs() < PERCENTAGE_TOLERANCE {
            AllocationValidation::valid()
        } else {
            AllocationValidation::invalid(format!(
                "Allocation percentages must total 100%, got {:.2}%",
                total
            ))
        }
    }

    /// Check the amount sum invariant for a transaction-scope allocation set.
    ///
    /// An empty set is valid; otherwise the amounts must sum to the
    /// transaction's actual amount within $0.01.
    pub fn validate_amount_sum(
        allocations: &[AmountAllocationInput],
        transaction_amount: f64,
    ) -> AllocationValidation {
        if allocations.is_empty() {
            return AllocationValidation::valid();
        }

        let total: f64 = allocations.iter().map(|a| a.amount).sum();
        if (total - transaction_amount).abs() <= AMOUNT_TOLERANCE {
            AllocationValidation::valid()
        } else {
            AllocationValidation::invalid(format!(
                "Allocation amounts must total {:.2}, got {:.2}",
                transaction_amount, total
            ))
        }
    }

    /// Replace the entire allocation set for a building.
    ///
    /// A validation failure is returned as a structured value and writes
    /// nothing. An empty allocation list clears the building's set.
    pub fn upsert_building_allocations(
        &self,
        command: UpsertBuildingAllocationsCommand,
    ) -> Result<UpsertBuildingAllocationsResult> {
        info!(
            "Upserting {} building allocations for building {} (user {})",
            command.allocations.len(),
            command.building_id,
            command.acting_user_id
        );

        let validation = Self::validate_percentage_sum(&command.allocations);
        if !validation.valid {
            warn!(
                "Building allocation validation failed for {}: {:?}",
                command.building_id, validation.error
            );
            return Ok(UpsertBuildingAllocationsResult {
                validation,
                allocations: Vec::new(),
            });
        }

        let rows: Vec<BuildingAllocation> = command
            .allocations
            .iter()
            .map(|input| BuildingAllocation {
                building_id: command.building_id.clone(),
                unit_id: input.unit_id.clone(),
                percentage: input.percentage,
            })
            .collect();

        // Replace wholesale: clear, then insert. Each phase fails with its
        // own error so the caller knows whether the building was left
        // allocation-less or untouched.
        self.building_allocation_repository
            .clear_allocations(&command.building_id)
            .context(DomainError::ClearFailed {
                scope: format!("building {}", command.building_id),
            })?;

        if !rows.is_empty() {
            self.building_allocation_repository
                .store_allocations(&command.building_id, &rows)
                .context(DomainError::SaveFailed {
                    scope: format!("building {}", command.building_id),
                })?;
        }

        info!(
            "Saved {} allocations for building {}",
            rows.len(),
            command.building_id
        );

        Ok(UpsertBuildingAllocationsResult {
            validation,
            allocations: rows,
        })
    }

    /// Get the persisted percentage allocation for a building as a
    /// unit_id -> percentage map. Row order is irrelevant to callers.
    pub fn get_allocations_map(&self, building_id: &str) -> Result<HashMap<String, f64>> {
        let rows = self
            .building_allocation_repository
            .list_allocations(building_id)?;

        let map: HashMap<String, f64> = rows
            .into_iter()
            .map(|row| (row.unit_id, row.percentage))
            .collect();

        info!(
            "Loaded allocation map with {} entries for building {}",
            map.len(),
            building_id
        );
        Ok(map)
    }

    /// Replace the entire allocation set for a financial transaction.
    ///
    /// The informational percentage on each row is derived from the
    /// transaction amount; it carries no invariant of its own.
    pub fn upsert_transaction_allocations(
        &self,
        command: UpsertTransactionAllocationsCommand,
    ) -> Result<UpsertTransactionAllocationsResult> {
        info!(
            "Upserting {} transaction allocations for transaction {} (user {})",
            command.allocations.len(),
            command.transaction_id,
            command.acting_user_id
        );

        let validation =
            Self::validate_amount_sum(&command.allocations, command.transaction_amount);
        if !validation.valid {
            warn!(
                "Transaction allocation validation failed for {}: {:?}",
                command.transaction_id, validation.error
            );
            return Ok(UpsertTransactionAllocationsResult {
                validation,
                allocations: Vec::new(),
            });
        }

        let rows: Vec<TransactionAllocation> = command
            .allocations
            .iter()
            .map(|input| TransactionAllocation {
                transaction_id: command.transaction_id.clone(),
                unit_id: input.unit_id.clone(),
                amount: input.amount,
                percentage: Self::derive_percentage(input.amount, command.transaction_amount),
            })
            .collect();

        self.transaction_allocation_repository
            .clear_allocations(&command.transaction_id)
            .context(DomainError::ClearFailed {
                scope: format!("transaction {}", command.transaction_id),
            })?;

        if !rows.is_empty() {
            self.transaction_allocation_repository
                .store_allocations(&command.transaction_id, &rows)
                .context(DomainError::SaveFailed {
                    scope: format!("transaction {}", command.transaction_id),
                })?;
        }

        info!(
            "Saved {} allocations for transaction {}",
            rows.len(),
            command.transaction_id
        );

        Ok(UpsertTransactionAllocationsResult {
            validation,
            allocations: rows,
        })
    }

    /// Get a transaction's allocation rows joined with each unit's address
    /// for presentation. Units missing from the directory render with an
    /// empty address rather than failing the whole read.
    pub fn get_transaction_allocations(
        &self,
        transaction_id: &str,
    ) -> Result<Vec<TransactionAllocationView>> {
        let rows = self
            .transaction_allocation_repository
            .list_allocations(transaction_id)?;

        let mut views = Vec::with_capacity(rows.len());
        for row in rows {
            let unit_address = match self.unit_repository.get_unit(&row.unit_id)? {
                Some(unit) => unit.address,
                None => {
                    warn!(
                        "Unit {} referenced by allocation for transaction {} not found",
                        row.unit_id, transaction_id
                    );
                    String::new()
                }
            };
            views.push(TransactionAllocationView {
                unit_id: row.unit_id,
                unit_address,
                amount: row.amount,
                percentage: row.percentage,
            });
        }

        Ok(views)
    }

    /// Prefill an equal split of `total_amount` across every unit of a
    /// building, in unit-id order. Pure preview for the allocation form; the
    /// user still saves through one of the upsert paths.
    pub fn equal_split_for_building(
        &self,
        building_id: &str,
        total_amount: f64,
    ) -> Result<Vec<SplitShare>> {
        let units = self.unit_repository.list_units_for_building(building_id)?;
        let unit_ids: Vec<String> = units.into_iter().map(|unit| unit.id).collect();
        Ok(equal_split(&unit_ids, total_amount))
    }

    fn derive_percentage(amount: f64, transaction_amount: f64) -> Option<f64> {
        if transaction_amount > 0.0 {
            Some((amount / transaction_amount * 100.0 * 100.0).round() / 100.0)
        } else {
            None
        }
    }
}
