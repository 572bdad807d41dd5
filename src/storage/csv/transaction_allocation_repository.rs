//! # CSV Transaction Allocation Repository
//!
//! One CSV file per financial transaction under `transaction_allocations/`.
//! Same replace-wholesale shape as the building repository, keyed by
//! transaction. The derived percentage column is optional and stored empty
//! when absent.
//!
//! File format (`transaction_allocations/{transaction_id}.csv`):
//! ```csv
//! transaction_id,unit_id,amount,percentage
//! tx::1,unit::1,150,75
//! tx::1,unit::2,50,25
//! ```

use anyhow::{Context, Result};
use csv::{Reader, Writer};
use log::{debug, info};
use std::fs::File;
use std::io::BufReader;

use super::connection::CsvConnection;
use crate::domain::models::allocation::TransactionAllocation;
use crate::storage::traits::TransactionAllocationStorage;

/// CSV-based transaction allocation repository
#[derive(Clone)]
pub struct TransactionAllocationRepository {
    connection: CsvConnection,
}

impl TransactionAllocationRepository {
    /// Create a new CSV transaction allocation repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }
}

impl TransactionAllocationStorage for TransactionAllocationRepository {
    fn clear_allocations(&self, transaction_id: &str) -> Result<()> {
        let file_path = self
            .connection
            .transaction_allocations_file_path(transaction_id);
        if file_path.exists() {
            std::fs::remove_file(&file_path)?;
            info!("Cleared allocations for transaction {}", transaction_id);
        } else {
            debug!("No allocations to clear for transaction {}", transaction_id);
        }
        Ok(())
    }

    fn store_allocations(
        &self,
        transaction_id: &str,
        allocations: &[TransactionAllocation],
    ) -> Result<()> {
        let mut csv_writer = Writer::from_writer(Vec::new());
        csv_writer.write_record(["transaction_id", "unit_id", "amount", "percentage"])?;
        for allocation in allocations {
            let percentage = allocation
                .percentage
                .map(|p| p.to_string())
                .unwrap_or_default();
            csv_writer.write_record([
                &allocation.transaction_id,
                &allocation.unit_id,
                &allocation.amount.to_string(),
                &percentage,
            ])?;
        }
        let bytes = csv_writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to finish CSV write: {}", e))?;

        let file_path = self
            .connection
            .transaction_allocations_file_path(transaction_id);
        self.connection.write_atomically(&file_path, &bytes)?;

        info!(
            "Stored {} allocations for transaction {}",
            allocations.len(),
            transaction_id
        );
        Ok(())
    }

    fn list_allocations(&self, transaction_id: &str) -> Result<Vec<TransactionAllocation>> {
        let file_path = self
            .connection
            .transaction_allocations_file_path(transaction_id);
        if !file_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&file_path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut allocations = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            let percentage_field = record.get(3).unwrap_or("");
            let percentage = if percentage_field.is_empty() {
                None
            } else {
                Some(
                    percentage_field
                        .parse::<f64>()
                        .context("Invalid percentage value")?,
                )
            };
            allocations.push(TransactionAllocation {
                transaction_id: record
                    .get(0)
                    .context("Missing transaction_id column")?
                    .to_string(),
                unit_id: record
                    .get(1)
                    .context("Missing unit_id column")?
                    .to_string(),
                amount: record
                    .get(2)
                    .context("Missing amount column")?
                    .parse::<f64>()
                    .context("Invalid amount value")?,
                percentage,
            });
        }

        Ok(allocations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_repo() -> (TransactionAllocationRepository, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let connection = CsvConnection::new(temp_dir.path()).expect("Failed to create connection");
        (TransactionAllocationRepository::new(connection), temp_dir)
    }

    #[test]
    fn test_store_and_list_round_trip_with_optional_percentage() {
        let (repo, _temp_dir) = setup_test_repo();

        let allocations = vec![
            TransactionAllocation {
                transaction_id: "tx::1".to_string(),
                unit_id: "unit::1".to_string(),
                amount: 150.0,
                percentage: Some(75.0),
            },
            TransactionAllocation {
                transaction_id: "tx::1".to_string(),
                unit_id: "unit::2".to_string(),
                amount: 50.0,
                percentage: None,
            },
        ];
        repo.store_allocations("tx::1", &allocations).unwrap();

        let loaded = repo.list_allocations("tx::1").unwrap();
        assert_eq!(loaded, allocations);
    }

    #[test]
    fn test_clear_then_list_is_empty() {
        let (repo, _temp_dir) = setup_test_repo();

        repo.store_allocations(
            "tx::1",
            &[TransactionAllocation {
                transaction_id: "tx::1".to_string(),
                unit_id: "unit::1".to_string(),
                amount: 10.0,
                percentage: Some(100.0),
            }],
        )
        .unwrap();

        repo.clear_allocations("tx::1").unwrap();
        assert!(repo.list_allocations("tx::1").unwrap().is_empty());
    }
}
