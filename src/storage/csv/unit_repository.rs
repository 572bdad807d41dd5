//! # CSV Unit Repository
//!
//! File-backed view of the unit directory. The surrounding CRM owns unit
//! CRUD; `store_unit` exists so a host application (or a test) can seed the
//! directory, and is deliberately not part of the `UnitStorage` trait the
//! domain layer sees.
//!
//! File format (`units.csv`):
//! ```csv
//! id,building_id,address
//! unit::1,building::1,"12 Elm St, Apt 1"
//! ```

use anyhow::{Context, Result};
use csv::{Reader, Writer};
use log::debug;
use std::fs::File;
use std::io::BufReader;

use super::connection::CsvConnection;
use crate::domain::models::unit::Unit;
use crate::storage::traits::UnitStorage;

/// CSV-based unit repository
#[derive(Clone)]
pub struct UnitRepository {
    connection: CsvConnection,
}

impl UnitRepository {
    /// Create a new CSV unit repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Add a unit to the directory (host-application seam, not domain API)
    pub fn store_unit(&self, unit: &Unit) -> Result<()> {
        let mut units = self.read_units()?;
        units.retain(|existing| existing.id != unit.id);
        units.push(unit.clone());
        self.write_units(&units)
    }

    fn read_units(&self) -> Result<Vec<Unit>> {
        let file_path = self.connection.units_file_path();
        if !file_path.exists() {
            debug!("No units file yet at {:?}", file_path);
            return Ok(Vec::new());
        }

        let file = File::open(&file_path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut units = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            units.push(Unit {
                id: record
                    .get(0)
                    .context("Missing unit id column")?
                    .to_string(),
                building_id: record
                    .get(1)
                    .context("Missing building_id column")?
                    .to_string(),
                address: record.get(2).unwrap_or("").to_string(),
            });
        }

        Ok(units)
    }

    fn write_units(&self, units: &[Unit]) -> Result<()> {
        let mut csv_writer = Writer::from_writer(Vec::new());
        csv_writer.write_record(["id", "building_id", "address"])?;
        for unit in units {
            csv_writer.write_record([&unit.id, &unit.building_id, &unit.address])?;
        }
        let bytes = csv_writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to finish CSV write: {}", e))?;
        self.connection
            .write_atomically(&self.connection.units_file_path(), &bytes)
    }
}

impl UnitStorage for UnitRepository {
    fn get_unit(&self, unit_id: &str) -> Result<Option<Unit>> {
        let units = self.read_units()?;
        Ok(units.into_iter().find(|unit| unit.id == unit_id))
    }

    fn list_units_for_building(&self, building_id: &str) -> Result<Vec<Unit>> {
        let mut units: Vec<Unit> = self
            .read_units()?
            .into_iter()
            .filter(|unit| unit.building_id == building_id)
            .collect();
        units.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(units)
    }
}
