//! # CSV Connection
//!
//! Holds the base data directory and hands out the file paths the
//! repositories work with. The "connection" naming mirrors a database
//! connection even though this backend is plain files; the domain layer never
//! sees paths, only repositories.

use anyhow::Result;
use log::debug;
use std::path::{Path, PathBuf};

/// Connection to the file-based storage rooted at a data directory
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Create a new connection, creating the base directory if needed
    pub fn new<P: Into<PathBuf>>(base_directory: P) -> Result<Self> {
        let base_directory = base_directory.into();
        std::fs::create_dir_all(&base_directory)?;
        debug!("CSV storage rooted at {:?}", base_directory);
        Ok(Self { base_directory })
    }

    /// The base data directory
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Path of the unit directory file
    pub fn units_file_path(&self) -> PathBuf {
        self.base_directory.join("units.csv")
    }

    /// Path of the work-order file
    pub fn tasks_file_path(&self) -> PathBuf {
        self.base_directory.join("tasks.csv")
    }

    /// Per-building allocation file
    pub fn building_allocations_file_path(&self, building_id: &str) -> PathBuf {
        self.base_directory
            .join("building_allocations")
            .join(format!("{}.csv", Self::safe_file_name(building_id)))
    }

    /// Per-transaction allocation file
    pub fn transaction_allocations_file_path(&self, transaction_id: &str) -> PathBuf {
        self.base_directory
            .join("transaction_allocations")
            .join(format!("{}.csv", Self::safe_file_name(transaction_id)))
    }

    /// Directory holding one YAML document per recurring-task template
    pub fn recurring_tasks_directory(&self) -> PathBuf {
        self.base_directory.join("recurring_tasks")
    }

    /// Per-template YAML file
    pub fn recurring_task_file_path(&self, template_id: &str) -> PathBuf {
        self.recurring_tasks_directory()
            .join(format!("{}.yaml", Self::safe_file_name(template_id)))
    }

    /// Turn an entity ID into a file-system-safe name.
    /// IDs use `::` separators which some file systems reject.
    pub fn safe_file_name(id: &str) -> String {
        id.chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    /// Atomic write pattern: write to a temp file, then rename into place.
    /// Creates the parent directory if it does not exist yet.
    pub fn write_atomically(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, contents)?;
        std::fs::rename(&temp_path, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_creates_base_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("deep").join("data");
        let conn = CsvConnection::new(nested.clone()).unwrap();
        assert!(nested.exists());
        assert_eq!(conn.base_directory(), nested.as_path());
    }

    #[test]
    fn test_safe_file_name_replaces_separators() {
        assert_eq!(
            CsvConnection::safe_file_name("building::1/2"),
            "building__1_2"
        );
        assert_eq!(CsvConnection::safe_file_name("plain-id_9"), "plain-id_9");
    }

    #[test]
    fn test_write_atomically_creates_parents_and_no_temp_leftover() {
        let temp_dir = TempDir::new().unwrap();
        let conn = CsvConnection::new(temp_dir.path()).unwrap();

        let path = temp_dir.path().join("sub").join("file.csv");
        conn.write_atomically(&path, b"a,b\n1,2\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a,b\n1,2\n");
        assert!(!path.with_extension("tmp").exists());
    }
}
