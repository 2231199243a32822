use super::storage;
use super::types::{start_of_day, Task};
use crate::shared::paths::storage_dir;
use std::collections::HashSet;
use std::path::PathBuf;
use uuid::Uuid;

pub const DEFAULT_FILE_NAME: &str = "tasks.json";

/// Constructor-level configuration: where the task file lives and what it is
/// called. No other configuration surface exists.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub directory: PathBuf,
    pub file_name: String,
}

impl StoreConfig {
    /// Store backed by the application data directory.
    pub fn persistent() -> Self {
        Self {
            directory: storage_dir(),
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }

    /// Store backed by the OS temp directory, for throwaway sessions. Still
    /// file-backed; the file just does not survive cleanup.
    pub fn ephemeral() -> Self {
        Self {
            directory: std::env::temp_dir(),
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }

    pub fn save_path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::persistent()
    }
}

/// Handle returned by [`TaskStore::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&[Task])>;

/// Sole owner of the authoritative task list and its on-disk file.
///
/// Every mutation rewrites the whole file (small personal lists, so the O(n)
/// write is fine) and then notifies subscribers with the new list. All access
/// is single-threaded; callers needing cross-thread access wrap the store
/// themselves.
pub struct TaskStore {
    tasks: Vec<Task>,
    save_path: PathBuf,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl TaskStore {
    pub fn new(config: StoreConfig) -> Self {
        let mut store = Self {
            tasks: Vec::new(),
            save_path: config.save_path(),
            listeners: Vec::new(),
            next_subscription: 0,
        };
        store.load();
        tracing::info!(
            target: "tasks",
            "Task store initialized with {} tasks from {:?}",
            store.tasks.len(),
            store.save_path
        );
        store
    }

    /// The canonical list, in insertion/reorder order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn find_task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Appends the task to the end of the list. The due date, if any, is
    /// normalized to the start of its calendar day.
    pub fn add(&mut self, mut task: Task) {
        normalize_due_date(&mut task);
        self.tasks.push(task);
        self.after_mutation();
    }

    /// Replaces the entry matching the task's id; no-op when absent.
    pub fn update(&mut self, mut task: Task) {
        normalize_due_date(&mut task);
        let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task.id) else {
            tracing::debug!(target: "tasks", "Update ignored, no task with id {}", task.id);
            return;
        };
        *slot = task;
        self.after_mutation();
    }

    /// Flips the completion flag of the matching entry; no-op when absent.
    pub fn toggle_completion(&mut self, id: Uuid) {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            tracing::debug!(target: "tasks", "Toggle ignored, no task with id {}", id);
            return;
        };
        task.is_completed = !task.is_completed;
        self.after_mutation();
    }

    /// Removes every entry whose id is in the set.
    pub fn delete(&mut self, ids: &HashSet<Uuid>) {
        self.tasks.retain(|task| !ids.contains(&task.id));
        self.after_mutation();
    }

    /// Removes the entries at the given store positions. Out-of-range
    /// positions are skipped silently.
    pub fn delete_at(&mut self, positions: &[usize]) {
        let mut sorted: Vec<usize> = positions
            .iter()
            .copied()
            .filter(|&p| p < self.tasks.len())
            .collect();
        sorted.sort_unstable();
        sorted.dedup();

        for position in sorted.into_iter().rev() {
            self.tasks.remove(position);
        }
        self.after_mutation();
    }

    /// Relocates the entries at `from_positions` so the block lands at offset
    /// `to`, where `to` is an insertion offset into the list as it was before
    /// removal. The moved entries keep their relative order. Callers are
    /// expected to invoke this only from the reorderable view, where view
    /// positions equal store positions.
    pub fn move_tasks(&mut self, from_positions: &[usize], to: usize) {
        let mut sources: Vec<usize> = from_positions
            .iter()
            .copied()
            .filter(|&p| p < self.tasks.len())
            .collect();
        sources.sort_unstable();
        sources.dedup();
        if sources.is_empty() {
            return;
        }

        let mut moved = Vec::with_capacity(sources.len());
        for position in sources.iter().rev() {
            moved.push(self.tasks.remove(*position));
        }
        moved.reverse();

        // The destination was expressed against the pre-removal list; shift
        // it left by the removed entries that preceded it.
        let shift = sources.iter().filter(|&&p| p < to).count();
        let insert_at = to.saturating_sub(shift).min(self.tasks.len());
        for (offset, task) in moved.into_iter().enumerate() {
            self.tasks.insert(insert_at + offset, task);
        }
        self.after_mutation();
    }

    /// Reads the task file, seeding sample data when it does not exist yet.
    /// Read or parse failures leave the list empty; the diagnostic is logged
    /// rather than surfaced.
    pub fn load(&mut self) {
        self.tasks = storage::load_or_seed(&self.save_path);
        self.notify();
    }

    /// Serializes the entire list over the task file. On failure the
    /// in-memory list stays authoritative and the error is only logged.
    pub fn persist(&self) {
        if let Err(e) = storage::save_tasks(&self.save_path, &self.tasks) {
            tracing::error!(
                target: "tasks",
                "Failed to persist {} tasks to {:?}: {}",
                self.tasks.len(),
                self.save_path,
                e
            );
        }
    }

    /// Registers a callback invoked with the full list after every mutation.
    pub fn subscribe(&mut self, listener: impl Fn(&[Task]) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.retain(|(existing, _)| *existing != id);
    }

    fn after_mutation(&mut self) {
        self.persist();
        self.notify();
    }

    fn notify(&self) {
        for (_, listener) in &self.listeners {
            listener(&self.tasks);
        }
    }
}

fn normalize_due_date(task: &mut Task) {
    if let Some(due) = task.due_date {
        task.due_date = Some(start_of_day(due));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::types::local_day;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn test_store(dir: &tempfile::TempDir) -> TaskStore {
        let config = StoreConfig {
            directory: dir.path().to_path_buf(),
            file_name: DEFAULT_FILE_NAME.to_string(),
        };
        // Pre-create an empty list so tests start without the sample data
        storage::save_tasks(&config.save_path(), &[]).expect("write empty list");
        TaskStore::new(config)
    }

    #[test]
    fn test_store_config_composes_save_path() {
        let config = StoreConfig {
            directory: PathBuf::from("/somewhere"),
            file_name: "custom.json".to_string(),
        };
        assert_eq!(config.save_path(), PathBuf::from("/somewhere/custom.json"));

        let ephemeral = StoreConfig::ephemeral();
        assert!(ephemeral.save_path().starts_with(std::env::temp_dir()));
        assert!(ephemeral.save_path().ends_with(DEFAULT_FILE_NAME));
    }

    #[test]
    fn test_fresh_store_seeds_sample_data() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = TaskStore::new(StoreConfig {
            directory: dir.path().to_path_buf(),
            file_name: DEFAULT_FILE_NAME.to_string(),
        });

        let titles: Vec<&str> = store.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Plan the week",
                "Pick up groceries",
                "Schedule dentist appointment",
                "Read 20 pages",
            ]
        );
    }

    #[test]
    fn test_add_appends_and_normalizes_due_date() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = test_store(&dir);

        store.add(Task::new("first"));
        let mut second = Task::new("second");
        let due = chrono::Utc::now();
        second.due_date = Some(due);
        store.add(second);

        assert_eq!(store.tasks().len(), 2);
        assert_eq!(store.tasks()[1].title, "second");

        let stored_due = store.tasks()[1].due_date.expect("due date kept");
        assert_eq!(local_day(stored_due), local_day(due));
        let local = stored_due.with_timezone(&chrono::Local);
        assert_eq!(local.time(), chrono::NaiveTime::MIN);
    }

    #[test]
    fn test_add_then_delete_restores_prior_id_set() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = test_store(&dir);
        store.add(Task::new("keep"));

        let before: Vec<Uuid> = store.tasks().iter().map(|t| t.id).collect();

        let extra = Task::new("temporary");
        let extra_id = extra.id;
        store.add(extra);
        store.delete(&HashSet::from([extra_id]));

        let after: Vec<Uuid> = store.tasks().iter().map(|t| t.id).collect();
        assert_eq!(after, before);
    }

    #[test]
    fn test_update_replaces_matching_entry_only() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = test_store(&dir);
        store.add(Task::new("original"));

        let mut edited = store.tasks()[0].clone();
        edited.title = "edited".to_string();
        edited.notes = "now with notes".to_string();
        store.update(edited);

        assert_eq!(store.tasks()[0].title, "edited");

        let mut phantom = Task::new("never stored");
        phantom.title = "phantom".to_string();
        store.update(phantom);
        assert_eq!(store.tasks().len(), 1, "unknown id update is a no-op");
    }

    #[test]
    fn test_toggle_completion_is_an_involution() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = test_store(&dir);
        store.add(Task::new("flip me"));
        let id = store.tasks()[0].id;

        store.toggle_completion(id);
        assert!(store.tasks()[0].is_completed);

        store.toggle_completion(id);
        assert!(!store.tasks()[0].is_completed);

        store.toggle_completion(Uuid::new_v4());
        assert!(!store.tasks()[0].is_completed, "unknown id is a no-op");
    }

    #[test]
    fn test_delete_at_ignores_out_of_range_positions() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = test_store(&dir);
        for title in ["a", "b", "c"] {
            store.add(Task::new(title));
        }

        store.delete_at(&[1, 99]);
        let titles: Vec<&str> = store.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "c"]);

        store.delete_at(&[42]);
        assert_eq!(store.tasks().len(), 2);
    }

    #[test]
    fn test_move_tasks_preserves_block_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = test_store(&dir);
        for title in ["a", "b", "c", "d"] {
            store.add(Task::new(title));
        }

        // Move the leading pair after "c": destination offset is expressed
        // against the pre-removal list.
        store.move_tasks(&[0, 1], 3);
        let titles: Vec<&str> = store.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["c", "a", "b", "d"]);

        store.move_tasks(&[3], 0);
        let titles: Vec<&str> = store.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["d", "c", "a", "b"]);
    }

    #[test]
    fn test_move_single_task_toward_end() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = test_store(&dir);
        for title in ["a", "b", "c"] {
            store.add(Task::new(title));
        }

        store.move_tasks(&[0], 2);
        let titles: Vec<&str> = store.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_mutations_notify_subscribers() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = test_store(&dir);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let subscription = store.subscribe(move |tasks| {
            sink.borrow_mut().push(tasks.len());
        });

        store.add(Task::new("one"));
        store.add(Task::new("two"));
        assert_eq!(*seen.borrow(), vec![1, 2]);

        store.unsubscribe(subscription);
        store.add(Task::new("three"));
        assert_eq!(*seen.borrow(), vec![1, 2], "unsubscribed listener stays quiet");
    }

    #[test]
    fn test_mutations_are_persisted_immediately() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = StoreConfig {
            directory: dir.path().to_path_buf(),
            file_name: DEFAULT_FILE_NAME.to_string(),
        };
        storage::save_tasks(&config.save_path(), &[]).expect("write empty list");

        let mut store = TaskStore::new(config.clone());
        store.add(Task::new("durable"));
        drop(store);

        let reopened = TaskStore::new(config);
        assert_eq!(reopened.tasks().len(), 1);
        assert_eq!(reopened.tasks()[0].title, "durable");
    }
}
