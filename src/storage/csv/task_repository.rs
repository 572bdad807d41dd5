//! # CSV Task Repository
//!
//! All work orders live in one `tasks.csv`, rewritten wholesale on every
//! mutation (the write volume here is one row per user action). Optional
//! columns are stored empty; every populated column is validated on read
//! rather than cast through loosely.
//!
//! File format (`tasks.csv`):
//! ```csv
//! id,unit_id,title,description,priority,due_date,assigned_contractor_id,status,estimated_cost,actual_cost,completed_at,completed_by,created_at
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use csv::{Reader, StringRecord, Writer};
use log::debug;
use std::fs::File;
use std::io::BufReader;

use super::connection::CsvConnection;
use crate::domain::models::task::{Task, TaskPriority, TaskStatus};
use crate::storage::traits::TaskStorage;

const HEADER: [&str; 13] = [
    "id",
    "unit_id",
    "title",
    "description",
    "priority",
    "due_date",
    "assigned_contractor_id",
    "status",
    "estimated_cost",
    "actual_cost",
    "completed_at",
    "completed_by",
    "created_at",
];

/// CSV-based task repository
#[derive(Clone)]
pub struct TaskRepository {
    connection: CsvConnection,
}

impl TaskRepository {
    /// Create a new CSV task repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_tasks(&self) -> Result<Vec<Task>> {
        let file_path = self.connection.tasks_file_path();
        if !file_path.exists() {
            debug!("No tasks file yet at {:?}", file_path);
            return Ok(Vec::new());
        }

        let file = File::open(&file_path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut tasks = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            tasks.push(Self::parse_record(&record)?);
        }

        Ok(tasks)
    }

    fn write_tasks(&self, tasks: &[Task]) -> Result<()> {
        let mut csv_writer = Writer::from_writer(Vec::new());
        csv_writer.write_record(HEADER)?;
        for task in tasks {
            csv_writer.write_record([
                task.id.clone(),
                task.unit_id.clone(),
                task.title.clone(),
                task.description.clone(),
                task.priority.to_string(),
                task.due_date.format("%Y-%m-%d").to_string(),
                task.assigned_contractor_id.clone().unwrap_or_default(),
                task.status.to_string(),
                task.estimated_cost.map(|c| c.to_string()).unwrap_or_default(),
                task.actual_cost.map(|c| c.to_string()).unwrap_or_default(),
                task.completed_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
                task.completed_by.clone().unwrap_or_default(),
                task.created_at.to_rfc3339(),
            ])?;
        }
        let bytes = csv_writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to finish CSV write: {}", e))?;
        self.connection
            .write_atomically(&self.connection.tasks_file_path(), &bytes)
    }

    fn parse_record(record: &StringRecord) -> Result<Task> {
        let field = |index: usize, name: &'static str| -> Result<&str> {
            record
                .get(index)
                .with_context(|| format!("Missing {} column", name))
        };

        let priority = TaskPriority::from_string(field(4, "priority")?)
            .map_err(|e| anyhow::anyhow!(e))?;
        let due_date = NaiveDate::parse_from_str(field(5, "due_date")?, "%Y-%m-%d")
            .context("Invalid due_date value")?;
        let status =
            TaskStatus::from_string(field(7, "status")?).map_err(|e| anyhow::anyhow!(e))?;
        let estimated_cost = Self::parse_optional_f64(field(8, "estimated_cost")?)?;
        let actual_cost = Self::parse_optional_f64(field(9, "actual_cost")?)?;
        let completed_at = Self::parse_optional_timestamp(field(10, "completed_at")?)?;
        let created_at = DateTime::parse_from_rfc3339(field(12, "created_at")?)
            .context("Invalid created_at value")?
            .with_timezone(&Utc);

        Ok(Task {
            id: field(0, "id")?.to_string(),
            unit_id: field(1, "unit_id")?.to_string(),
            title: field(2, "title")?.to_string(),
            description: field(3, "description")?.to_string(),
            priority,
            due_date,
            assigned_contractor_id: Self::empty_as_none(field(6, "assigned_contractor_id")?),
            status,
            estimated_cost,
            actual_cost,
            completed_at,
            completed_by: Self::empty_as_none(field(11, "completed_by")?),
            created_at,
        })
    }

    fn empty_as_none(value: &str) -> Option<String> {
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }

    fn parse_optional_f64(value: &str) -> Result<Option<f64>> {
        if value.is_empty() {
            Ok(None)
        } else {
            Ok(Some(value.parse::<f64>().context("Invalid cost value")?))
        }
    }

    fn parse_optional_timestamp(value: &str) -> Result<Option<DateTime<Utc>>> {
        if value.is_empty() {
            Ok(None)
        } else {
            Ok(Some(
                DateTime::parse_from_rfc3339(value)
                    .context("Invalid timestamp value")?
                    .with_timezone(&Utc),
            ))
        }
    }
}

impl TaskStorage for TaskRepository {
    fn store_task(&self, task: &Task) -> Result<()> {
        let mut tasks = self.read_tasks()?;
        tasks.push(task.clone());
        self.write_tasks(&tasks)
    }

    fn get_task(&self, task_id: &str) -> Result<Option<Task>> {
        let tasks = self.read_tasks()?;
        Ok(tasks.into_iter().find(|task| task.id == task_id))
    }

    fn update_task(&self, task: &Task) -> Result<()> {
        let mut tasks = self.read_tasks()?;
        let position = tasks
            .iter()
            .position(|existing| existing.id == task.id)
            .with_context(|| format!("Cannot update unknown task: {}", task.id))?;
        tasks[position] = task.clone();
        self.write_tasks(&tasks)
    }

    fn delete_task(&self, task_id: &str) -> Result<bool> {
        let mut tasks = self.read_tasks()?;
        let before = tasks.len();
        tasks.retain(|task| task.id != task_id);
        if tasks.len() == before {
            return Ok(false);
        }
        self.write_tasks(&tasks)?;
        Ok(true)
    }

    fn list_tasks_for_unit(&self, unit_id: &str) -> Result<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .read_tasks()?
            .into_iter()
            .filter(|task| task.unit_id == unit_id)
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_repo() -> (TaskRepository, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let connection = CsvConnection::new(temp_dir.path()).expect("Failed to create connection");
        (TaskRepository::new(connection), temp_dir)
    }

    fn task(id: &str) -> Task {
        Task {
            id: id.to_string(),
            unit_id: "unit::1".to_string(),
            title: "Fix leaking faucet".to_string(),
            description: "Kitchen faucet drips, tenant reported 2x".to_string(),
            priority: TaskPriority::High,
            due_date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            assigned_contractor_id: Some("contractor::1".to_string()),
            status: TaskStatus::Open,
            estimated_cost: Some(150.0),
            actual_cost: None,
            completed_at: None,
            completed_by: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_store_and_get_round_trip() {
        let (repo, _temp_dir) = setup_test_repo();

        let task = task("task::1");
        repo.store_task(&task).unwrap();

        let loaded = repo.get_task("task::1").unwrap().unwrap();
        assert_eq!(loaded.title, task.title);
        assert_eq!(loaded.priority, task.priority);
        assert_eq!(loaded.due_date, task.due_date);
        assert_eq!(loaded.estimated_cost, Some(150.0));
        assert!(loaded.actual_cost.is_none());
        assert!(loaded.completed_at.is_none());
    }

    #[test]
    fn test_update_task_persists_completion_fields() {
        let (repo, _temp_dir) = setup_test_repo();

        let mut task = task("task::1");
        repo.store_task(&task).unwrap();

        task.status = TaskStatus::Completed;
        task.completed_at = Some(Utc::now());
        task.completed_by = Some("user::1".to_string());
        task.actual_cost = Some(275.0);
        repo.update_task(&task).unwrap();

        let loaded = repo.get_task("task::1").unwrap().unwrap();
        assert_eq!(loaded.status, TaskStatus::Completed);
        assert!(loaded.completed_at.is_some());
        assert_eq!(loaded.completed_by, Some("user::1".to_string()));
        assert_eq!(loaded.actual_cost, Some(275.0));
    }

    #[test]
    fn test_update_unknown_task_fails() {
        let (repo, _temp_dir) = setup_test_repo();
        let result = repo.update_task(&task("task::ghost"));
        assert!(result.is_err());
    }

    #[test]
    fn test_delete_task() {
        let (repo, _temp_dir) = setup_test_repo();

        repo.store_task(&task("task::1")).unwrap();
        repo.store_task(&task("task::2")).unwrap();

        assert!(repo.delete_task("task::1").unwrap());
        assert!(repo.get_task("task::1").unwrap().is_none());
        assert!(repo.get_task("task::2").unwrap().is_some());
        assert!(!repo.delete_task("task::1").unwrap());
    }

    #[test]
    fn test_list_tasks_for_unit_most_recent_first() {
        let (repo, _temp_dir) = setup_test_repo();

        let mut older = task("task::1");
        older.created_at = Utc::now() - chrono::Duration::hours(2);
        let newer = task("task::2");
        let mut other_unit = task("task::3");
        other_unit.unit_id = "unit::2".to_string();

        repo.store_task(&older).unwrap();
        repo.store_task(&newer).unwrap();
        repo.store_task(&other_unit).unwrap();

        let tasks = repo.list_tasks_for_unit("unit::1").unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, "task::2");
        assert_eq!(tasks[1].id, "task::1");
    }

    #[test]
    fn test_descriptions_with_commas_survive_round_trip() {
        let (repo, _temp_dir) = setup_test_repo();

        let mut task = task("task::1");
        task.description = "Check boiler, bleed radiators, \"note\" pressure".to_string();
        repo.store_task(&task).unwrap();

        let loaded = repo.get_task("task::1").unwrap().unwrap();
        assert_eq!(loaded.description, task.description);
    }
}
