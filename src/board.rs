//! The task board: single owner of the task list.
//!
//! Every mutation goes through a pure operation from [`crate::ops`] and then
//! replaces the list in one step. Persisting is explicit via [`TaskBoard::save`]
//! so that a failed write never loses the in-memory list.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::{BoardError, Result, StoreError};
use crate::fields::View;
use crate::ops::*;
use crate::store::{KeyValueStore, TaskStore};
use crate::task::{NewTask, Task, TaskFilterOptions, TaskStats, TaskUpdate};

pub struct TaskBoard<S> {
    tasks: Vec<Task>,
    store: TaskStore<S>,
    seeded: bool,
}

impl<S: KeyValueStore> TaskBoard<S> {
    /// Load the stored list, seeding sample tasks when nothing usable is stored.
    ///
    /// Seeded samples are written back straight away so their ids stay valid
    /// across runs. A failed write is logged and the samples stay in memory.
    pub fn open(backend: S, now: DateTime<Utc>) -> Self {
        let store = TaskStore::new(backend);
        if let Some(tasks) = store.load() {
            return TaskBoard { tasks, store, seeded: false };
        }

        info!("no stored tasks, starting with sample data");
        let mut board = TaskBoard { tasks: sample_tasks(now), store, seeded: true };
        if let Err(e) = board.save() {
            warn!(error = %e, "failed to save sample tasks");
        }
        board
    }

    /// A board over an explicit list, without touching the store.
    pub fn with_tasks(backend: S, tasks: Vec<Task>) -> Self {
        TaskBoard { tasks, store: TaskStore::new(backend), seeded: false }
    }

    /// True when `open` found nothing usable and started from sample tasks.
    pub fn seeded(&self) -> bool {
        self.seeded
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn replace_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| BoardError::NotFound(id.to_string()))
    }

    fn replace_at(&mut self, idx: usize, task: Task) {
        let mut next = self.tasks.clone();
        next[idx] = task;
        self.replace_tasks(next);
    }

    pub fn create(&mut self, input: NewTask, now: DateTime<Utc>) -> Result<Task> {
        if input.title.trim().is_empty() {
            return Err(BoardError::EmptyTitle);
        }
        let mut task = create_task(input, now);
        while self.get(&task.id).is_some() {
            task.id = generate_id(now);
        }
        debug!(id = %task.id, "created task");
        let mut next = self.tasks.clone();
        next.push(task.clone());
        self.replace_tasks(next);
        Ok(task)
    }

    pub fn update(&mut self, id: &str, update: &TaskUpdate, now: DateTime<Utc>) -> Result<Task> {
        if update.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(BoardError::EmptyTitle);
        }
        let idx = self.position(id)?;
        let task = update_task(&self.tasks[idx], update, now);
        debug!(id, "updated task");
        self.replace_at(idx, task.clone());
        Ok(task)
    }

    pub fn toggle(&mut self, id: &str, now: DateTime<Utc>) -> Result<Task> {
        let idx = self.position(id)?;
        let task = toggle_status(&self.tasks[idx], now);
        debug!(id, status = ?task.status, "toggled task");
        self.replace_at(idx, task.clone());
        Ok(task)
    }

    pub fn delete(&mut self, id: &str) -> Result<Task> {
        let idx = self.position(id)?;
        let removed = self.tasks[idx].clone();
        let next = self.tasks.iter().filter(|t| t.id != id).cloned().collect();
        self.replace_tasks(next);
        debug!(id, "deleted task");
        Ok(removed)
    }

    /// Tab filter, then `options`, then display order.
    pub fn visible(&self, view: View, options: &TaskFilterOptions, now: DateTime<Utc>) -> Vec<Task> {
        let in_view: Vec<Task> = self.tasks.iter().filter(|t| view.admits(t.status)).cloned().collect();
        sort_tasks(&filter_tasks(&in_view, options), now)
    }

    pub fn stats(&self, now: DateTime<Utc>) -> TaskStats {
        calculate_stats(&self.tasks, now)
    }

    /// Persist the current list. On failure the list is kept and saving can be retried.
    pub fn save(&mut self) -> std::result::Result<(), StoreError> {
        self.store.save(&self.tasks)
    }
}
