//! Task repository over the `"todos"` key.
//!
//! # Invariants
//! - Snapshot order is insertion order; updates keep a task's position.
//! - The in-memory snapshot only advances after the store accepted the write.
//! - After a failed store read, nothing is written until a re-read succeeds.

use super::{read_collection, write_collection, RepoError, RepoResult, StoredCollection};
use crate::model::task::{validate_title, Task};
use crate::store::KeyValueStore;
use log::{debug, info, warn};

/// Store key holding the serialized task list.
pub const TODOS_KEY: &str = "todos";

/// Owns the task collection and its persisted copy.
pub struct TaskRepository<S: KeyValueStore> {
    store: S,
    tasks: Vec<Task>,
    /// Set when the last load could not read the store.
    degraded: bool,
}

impl<S: KeyValueStore> TaskRepository<S> {
    /// Creates a repository and loads the stored tasks.
    pub fn open(store: S) -> Self {
        let mut repo = Self {
            store,
            tasks: Vec::new(),
            degraded: false,
        };
        repo.load();
        repo
    }

    /// Re-reads the stored tasks.
    ///
    /// Absent, undecodable or unreadable data all yield an empty list.
    /// Undecodable records inside an otherwise valid list are skipped.
    pub fn load(&mut self) -> Vec<Task> {
        let stored = read_collection::<Task>(&self.store, TODOS_KEY);
        self.degraded = matches!(stored, StoredCollection::ReadFailed);
        self.tasks = match stored {
            StoredCollection::Records(tasks) => tasks,
            StoredCollection::Absent
            | StoredCollection::Undecodable
            | StoredCollection::ReadFailed => Vec::new(),
        };
        debug!(
            "event=tasks_load module=repo status=ok count={}",
            self.tasks.len()
        );
        self.snapshot()
    }

    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Appends a task with a fresh id.
    ///
    /// # Errors
    /// - `Validation` when `title` is blank.
    pub fn create(&mut self, title: &str, category_id: Option<&str>) -> RepoResult<Vec<Task>> {
        self.reload_if_degraded();
        let task = Task::create(title, category_id.map(str::to_string), |candidate| {
            self.get(candidate).is_some()
        })?;
        let task_id = task.id.clone();

        let mut next = self.tasks.clone();
        next.push(task);
        self.commit("task_create", &task_id, next);
        Ok(self.snapshot())
    }

    /// Replaces a task's title in place.
    ///
    /// # Errors
    /// - `NotFound` when no task has `id`.
    /// - `Validation` when `title` is blank.
    pub fn update(&mut self, id: &str, title: &str) -> RepoResult<Vec<Task>> {
        self.reload_if_degraded();
        let index = self.position(id)?;
        validate_title(title)?;

        let mut next = self.tasks.clone();
        next[index].title = title.to_string();
        self.commit("task_update", id, next);
        Ok(self.snapshot())
    }

    /// Sets or clears a task's category reference in place.
    ///
    /// The referenced category is not checked; dangling ids are tolerated.
    ///
    /// # Errors
    /// - `NotFound` when no task has `id`.
    pub fn update_category(&mut self, id: &str, category_id: Option<&str>) -> RepoResult<Vec<Task>> {
        self.reload_if_degraded();
        let index = self.position(id)?;

        let mut next = self.tasks.clone();
        next[index].category_id = category_id.map(str::to_string);
        self.commit("task_set_category", id, next);
        Ok(self.snapshot())
    }

    /// Removes a task. Deleting an unknown id is a no-op that still persists.
    pub fn delete(&mut self, id: &str) -> Vec<Task> {
        self.reload_if_degraded();
        let next = self
            .tasks
            .iter()
            .filter(|task| task.id != id)
            .cloned()
            .collect();
        self.commit("task_delete", id, next);
        self.snapshot()
    }

    fn reload_if_degraded(&mut self) {
        if self.degraded {
            self.load();
        }
    }

    fn position(&self, id: &str) -> RepoResult<usize> {
        self.tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| RepoError::NotFound(id.to_string()))
    }

    fn commit(&mut self, event: &str, task_id: &str, next: Vec<Task>) {
        if self.degraded {
            warn!("event={event} module=repo status=skipped task_id={task_id} reason=store_unreadable");
            return;
        }
        if write_collection(&self.store, TODOS_KEY, &next) {
            self.tasks = next;
            info!(
                "event={} module=repo status=ok task_id={} count={}",
                event,
                task_id,
                self.tasks.len()
            );
        } else {
            warn!("event={event} module=repo status=skipped task_id={task_id} reason=not_persisted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{TaskRepository, TODOS_KEY};
    use crate::store::MemoryKvStore;

    #[test]
    fn update_keeps_position() {
        let store = MemoryKvStore::new();
        let mut repo = TaskRepository::open(&store);
        repo.create("first", None).unwrap();
        let tasks = repo.create("second", None).unwrap();
        let first_id = tasks[0].id.clone();

        let tasks = repo.update(&first_id, "first, edited").unwrap();
        assert_eq!(tasks[0].id, first_id);
        assert_eq!(tasks[0].title, "first, edited");
        assert_eq!(tasks[1].title, "second");
    }

    #[test]
    fn failed_write_leaves_snapshot_unchanged() {
        let store = MemoryKvStore::new();
        let mut repo = TaskRepository::open(&store);
        repo.create("kept", None).unwrap();

        store.fail_writes(true);
        let tasks = repo.create("lost", None).unwrap();

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "kept");
        assert_eq!(repo.snapshot(), tasks);
        assert!(store.raw(TODOS_KEY).unwrap().contains("kept"));
    }

    #[test]
    fn corrupt_value_loads_as_empty() {
        let store = MemoryKvStore::with_entry(TODOS_KEY, "{not json");
        let repo = TaskRepository::open(&store);
        assert!(repo.snapshot().is_empty());
        assert_eq!(store.write_count(), 0);
    }
}
