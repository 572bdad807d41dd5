//! # CSV Recurring Task Repository
//!
//! One YAML document per template under `recurring_tasks/`, mirroring how a
//! template is edited as a whole: load, mutate, save. Atomic writes via temp
//! file and rename.
//!
//! ## File Structure
//!
//! ```text
//! data/
//! └── recurring_tasks/
//!     ├── template__unit__1__1700000000000-a3f1.yaml
//!     └── template__unit__2__1700000000001-9bc2.yaml
//! ```

use anyhow::Result;
use log::{debug, info, warn};

use super::connection::CsvConnection;
use crate::domain::models::recurring_task::RecurringTaskTemplate;
use crate::storage::traits::RecurringTaskStorage;

/// YAML-file-based recurring task template repository
#[derive(Clone)]
pub struct RecurringTaskRepository {
    connection: CsvConnection,
}

impl RecurringTaskRepository {
    /// Create a new recurring task repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn save_template(&self, template: &RecurringTaskTemplate) -> Result<()> {
        let yaml_content = serde_yaml::to_string(template)?;
        let path = self.connection.recurring_task_file_path(&template.id);
        self.connection
            .write_atomically(&path, yaml_content.as_bytes())?;
        debug!("Saved recurring task template {} to {:?}", template.id, path);
        Ok(())
    }
}

impl RecurringTaskStorage for RecurringTaskRepository {
    fn store_template(&self, template: &RecurringTaskTemplate) -> Result<()> {
        self.save_template(template)?;
        info!("Stored recurring task template: {}", template.id);
        Ok(())
    }

    fn get_template(&self, template_id: &str) -> Result<Option<RecurringTaskTemplate>> {
        let path = self.connection.recurring_task_file_path(template_id);
        if !path.exists() {
            debug!("No recurring task template found: {}", template_id);
            return Ok(None);
        }

        let yaml_content = std::fs::read_to_string(&path)?;
        let template: RecurringTaskTemplate = serde_yaml::from_str(&yaml_content)?;
        Ok(Some(template))
    }

    fn update_template(&self, template: &RecurringTaskTemplate) -> Result<()> {
        // Update is the same as store for YAML files
        self.save_template(template)
    }

    fn delete_template(&self, template_id: &str) -> Result<bool> {
        let path = self.connection.recurring_task_file_path(template_id);
        if path.exists() {
            std::fs::remove_file(&path)?;
            info!("Deleted recurring task template: {}", template_id);
            Ok(true)
        } else {
            debug!("No recurring task template to delete: {}", template_id);
            Ok(false)
        }
    }

    fn list_templates(&self) -> Result<Vec<RecurringTaskTemplate>> {
        let dir = self.connection.recurring_tasks_directory();
        let mut templates = Vec::new();

        if !dir.exists() {
            return Ok(templates);
        }

        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
                continue;
            }
            match std::fs::read_to_string(&path)
                .map_err(anyhow::Error::from)
                .and_then(|content| Ok(serde_yaml::from_str::<RecurringTaskTemplate>(&content)?))
            {
                Ok(template) => templates.push(template),
                Err(e) => warn!("Skipping unreadable template file {:?}: {}", path, e),
            }
        }

        // Most recently created first
        templates.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        info!("Listed {} recurring task templates", templates.len());
        Ok(templates)
    }
}
