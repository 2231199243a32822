use super::types::{sample_tasks, Task};
use crate::shared::errors::StorageError;
use crate::shared::paths::ensure_dir;
use std::path::Path;

pub fn load_tasks(path: &Path) -> Result<Vec<Task>, StorageError> {
    let content = std::fs::read_to_string(path)?;
    let tasks: Vec<Task> = serde_json::from_str(&content)?;
    Ok(tasks)
}

/// Writes the full task list, replacing the file atomically: the JSON is
/// written to a sibling `.tmp` file first and renamed over the target, so a
/// crash mid-write never leaves a truncated task file behind.
pub fn save_tasks(path: &Path, tasks: &[Task]) -> Result<(), StorageError> {
    if let Some(dir) = path.parent() {
        ensure_dir(dir)?;
    }

    let content = serde_json::to_string_pretty(tasks)?;
    let tmp_path = path.with_extension("tmp");
    std::fs::write(&tmp_path, content)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Startup load. A missing file is not an error: the fixed sample dataset is
/// seeded and written out. An unreadable or malformed file leaves the list
/// empty with a logged diagnostic; nothing propagates to the caller.
pub fn load_or_seed(path: &Path) -> Vec<Task> {
    if !path.exists() {
        let tasks = sample_tasks();
        match save_tasks(path, &tasks) {
            Ok(()) => tracing::info!(
                target: "tasks::storage",
                "No task file at {:?}, seeded {} sample tasks",
                path,
                tasks.len()
            ),
            Err(e) => tracing::warn!(
                target: "tasks::storage",
                "Could not write seeded task list to {:?}: {}",
                path,
                e
            ),
        }
        return tasks;
    }

    match load_tasks(path) {
        Ok(tasks) => {
            tracing::debug!(
                target: "tasks::storage",
                "Loaded {} tasks from {:?}",
                tasks.len(),
                path
            );
            tasks
        }
        Err(e) => {
            tracing::warn!(
                target: "tasks::storage",
                "Failed to load tasks from {:?}: {}",
                path,
                e
            );
            Vec::new()
        }
    }
}
