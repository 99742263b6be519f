//! # taskboard
//!
//! A local task manager: create, edit, filter and complete tasks, and get a
//! dashboard of aggregate statistics.
//!
//! - [`task`] and [`fields`] hold the data model.
//! - [`ops`] holds the pure operations (create, update, toggle, filter,
//!   sort, stats, sample data). Time is always passed in as `now`.
//! - [`store`] persists the task list as one JSON blob in a key-value slot.
//! - [`board`] owns the authoritative list and routes every change through
//!   the operations above.
//!
//! ```no_run
//! use chrono::Utc;
//! use taskboard::board::TaskBoard;
//! use taskboard::store::FileStore;
//! use taskboard::task::NewTask;
//!
//! let mut board = TaskBoard::open(FileStore::new("/tmp/tasks"), Utc::now());
//! board.create(NewTask::titled("Buy milk"), Utc::now()).unwrap();
//! board.save().unwrap();
//! ```

pub mod board;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod display;
pub mod error;
pub mod fields;
pub mod ops;
pub mod store;
pub mod task;
