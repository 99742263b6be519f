//! Task data structure and related types.
//!
//! `Task` is the persisted record. `NewTask` and `TaskUpdate` are the inputs to
//! the create and update operations, `TaskFilterOptions` is a transient list
//! query, and `TaskStats` is the derived dashboard summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fields::*;

/// A single task.
///
/// Serialises with camelCase field names and RFC 3339 timestamps; `due_date`
/// is written as `null` when the task has no deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub status: Status,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Pending with a deadline strictly before `now`.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status == Status::Pending && self.due_date.is_some_and(|due| due < now)
    }
}

/// Fields supplied when creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
}

impl NewTask {
    /// A task with the given title, no description, no due date, `work`/`medium`.
    pub fn titled(title: impl Into<String>) -> Self {
        NewTask {
            title: title.into(),
            description: String::new(),
            category: Category::Work,
            priority: Priority::Medium,
            due_date: None,
        }
    }
}

/// Partial update. `None` leaves the field unchanged.
///
/// `due_date` is doubly optional: `Some(None)` clears the deadline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }
}

/// List query. The default matches every task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilterOptions {
    pub category: Selector<Category>,
    pub priority: Selector<Priority>,
    pub status: Selector<Status>,
    pub search_query: String,
}

impl TaskFilterOptions {
    /// True when any dimension narrows the result.
    pub fn is_active(&self) -> bool {
        !self.category.is_all()
            || !self.priority.is_all()
            || !self.status.is_all()
            || !self.search_query.is_empty()
    }
}

/// Per-category counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub work: usize,
    pub personal: usize,
    pub urgent: usize,
}

impl CategoryCounts {
    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::Work => self.work,
            Category::Personal => self.personal,
            Category::Urgent => self.urgent,
        }
    }

    pub(crate) fn bump(&mut self, category: Category) {
        match category {
            Category::Work => self.work += 1,
            Category::Personal => self.personal += 1,
            Category::Urgent => self.urgent += 1,
        }
    }
}

/// Per-priority counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PriorityCounts {
    pub fn get(&self, priority: Priority) -> usize {
        match priority {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }

    pub(crate) fn bump(&mut self, priority: Priority) {
        match priority {
            Priority::High => self.high += 1,
            Priority::Medium => self.medium += 1,
            Priority::Low => self.low += 1,
        }
    }
}

/// Aggregate counts over a task collection at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
    pub by_category: CategoryCounts,
    pub by_priority: PriorityCounts,
}

impl TaskStats {
    /// Completed share of all tasks as a rounded whole percentage; 0 for no tasks.
    pub fn completion_rate(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed as f64 / self.total as f64) * 100.0).round() as u32
    }
}
