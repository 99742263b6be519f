//! Enumerations and field types for task management.
//!
//! This module defines the structured values used to categorise tasks
//! (category, priority, status), the `all`-or-value selector used by list
//! filters, and the list view tabs.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Area of life a task belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Personal,
    Urgent,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Work, Category::Personal, Category::Urgent];
}

/// Task importance. Declaration order is severity order: `High` sorts first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];
}

/// Task completion status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Completed,
}

impl Status {
    /// The other status. Toggling twice is the identity.
    pub fn toggled(self) -> Status {
        match self {
            Status::Pending => Status::Completed,
            Status::Completed => Status::Pending,
        }
    }
}

/// A filter dimension: either the wildcard `all` or one concrete value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<T> {
    All,
    Only(T),
}

impl<T> Default for Selector<T> {
    fn default() -> Self {
        Selector::All
    }
}

impl<T: PartialEq> Selector<T> {
    /// True when the wildcard is selected or `value` equals the selected value.
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selector::All => true,
            Selector::Only(v) => v == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selector::All)
    }
}

impl<T> From<Option<T>> for Selector<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Selector::Only(v),
            None => Selector::All,
        }
    }
}

impl<T: ValueEnum> FromStr for Selector<T> {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Selector::All);
        }
        <T as ValueEnum>::from_str(s.trim(), true).map(Selector::Only)
    }
}

impl<T: ValueEnum> fmt::Display for Selector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::All => f.write_str("all"),
            Selector::Only(v) => match v.to_possible_value() {
                Some(pv) => f.write_str(pv.get_name()),
                None => f.write_str("?"),
            },
        }
    }
}

/// List tabs. Applied before the filter options.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    All,
    Pending,
    Completed,
}

impl View {
    pub fn admits(self, status: Status) -> bool {
        match self {
            View::All => true,
            View::Pending => status == Status::Pending,
            View::Completed => status == Status::Completed,
        }
    }
}
