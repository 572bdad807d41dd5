//! # CSV Building Allocation Repository
//!
//! One CSV file per building under `building_allocations/`. Replacing a
//! building's allocation set maps onto the two trait phases directly:
//! clearing removes the file, storing writes a fresh one atomically.
//!
//! File format (`building_allocations/{building_id}.csv`):
//! ```csv
//! building_id,unit_id,percentage
//! building::1,unit::1,60
//! building::1,unit::2,40
//! ```

use anyhow::{Context, Result};
use csv::{Reader, Writer};
use log::{debug, info};
use std::fs::File;
use std::io::BufReader;

use super::connection::CsvConnection;
use crate::domain::models::allocation::BuildingAllocation;
use crate::storage::traits::BuildingAllocationStorage;

/// CSV-based building allocation repository
#[derive(Clone)]
pub struct BuildingAllocationRepository {
    connection: CsvConnection,
}

impl BuildingAllocationRepository {
    /// Create a new CSV building allocation repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }
}

impl BuildingAllocationStorage for BuildingAllocationRepository {
    fn clear_allocations(&self, building_id: &str) -> Result<()> {
        let file_path = self.connection.building_allocations_file_path(building_id);
        if file_path.exists() {
            std::fs::remove_file(&file_path)?;
            info!("Cleared allocations for building {}", building_id);
        } else {
            debug!("No allocations to clear for building {}", building_id);
        }
        Ok(())
    }

    fn store_allocations(
        &self,
        building_id: &str,
        allocations: &[BuildingAllocation],
    ) -> Result<()> {
        let mut csv_writer = Writer::from_writer(Vec::new());
        csv_writer.write_record(["building_id", "unit_id", "percentage"])?;
        for allocation in allocations {
            csv_writer.write_record([
                &allocation.building_id,
                &allocation.unit_id,
                &allocation.percentage.to_string(),
            ])?;
        }
        let bytes = csv_writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to finish CSV write: {}", e))?;

        let file_path = self.connection.building_allocations_file_path(building_id);
        self.connection.write_atomically(&file_path, &bytes)?;

        info!(
            "Stored {} allocations for building {}",
            allocations.len(),
            building_id
        );
        Ok(())
    }

    fn list_allocations(&self, building_id: &str) -> Result<Vec<BuildingAllocation>> {
        let file_path = self.connection.building_allocations_file_path(building_id);
        if !file_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&file_path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut allocations = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            allocations.push(BuildingAllocation {
                building_id: record
                    .get(0)
                    .context("Missing building_id column")?
                    .to_string(),
                unit_id: record
                    .get(1)
                    .context("Missing unit_id column")?
                    .to_string(),
                percentage: record
                    .get(2)
                    .context("Missing percentage column")?
                    .parse::<f64>()
                    .context("Invalid percentage value")?,
            });
        }

        Ok(allocations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_repo() -> (BuildingAllocationRepository, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let connection = CsvConnection::new(temp_dir.path()).expect("Failed to create connection");
        (BuildingAllocationRepository::new(connection), temp_dir)
    }

    fn rows(building_id: &str, pairs: &[(&str, f64)]) -> Vec<BuildingAllocation> {
        pairs
            .iter()
            .map(|(unit_id, percentage)| BuildingAllocation {
                building_id: building_id.to_string(),
                unit_id: unit_id.to_string(),
                percentage: *percentage,
            })
            .collect()
    }

    #[test]
    fn test_store_and_list_round_trip() {
        let (repo, _temp_dir) = setup_test_repo();

        let allocations = rows("building::1", &[("unit::1", 60.5), ("unit::2", 39.5)]);
        repo.store_allocations("building::1", &allocations).unwrap();

        let loaded = repo.list_allocations("building::1").unwrap();
        assert_eq!(loaded, allocations);
    }

    #[test]
    fn test_list_missing_building_is_empty() {
        let (repo, _temp_dir) = setup_test_repo();
        assert!(repo.list_allocations("building::ghost").unwrap().is_empty());
    }

    #[test]
    fn test_clear_removes_all_rows() {
        let (repo, _temp_dir) = setup_test_repo();

        repo.store_allocations("building::1", &rows("building::1", &[("unit::1", 100.0)]))
            .unwrap();
        repo.clear_allocations("building::1").unwrap();

        assert!(repo.list_allocations("building::1").unwrap().is_empty());

        // Clearing an already-empty scope is not an error
        repo.clear_allocations("building::1").unwrap();
    }

    #[test]
    fn test_buildings_are_isolated() {
        let (repo, _temp_dir) = setup_test_repo();

        repo.store_allocations("building::1", &rows("building::1", &[("unit::1", 100.0)]))
            .unwrap();
        repo.store_allocations("building::2", &rows("building::2", &[("unit::9", 100.0)]))
            .unwrap();

        repo.clear_allocations("building::1").unwrap();

        assert!(repo.list_allocations("building::1").unwrap().is_empty());
        assert_eq!(repo.list_allocations("building::2").unwrap().len(), 1);
    }
}
