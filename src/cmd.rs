//! Command implementations for the CLI interface.
//!
//! Each handler runs one operation through the [`TaskBoard`], saves after a
//! mutation and prints the result.

use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use tracing::warn;

use crate::board::TaskBoard;
use crate::cli::Cli;
use crate::display::*;
use crate::error::{BoardError, Result};
use crate::fields::*;
use crate::store::KeyValueStore;
use crate::task::{NewTask, TaskFilterOptions, TaskUpdate};

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Category: work | personal | urgent.
        #[arg(long, value_enum, default_value_t = Category::Work)]
        category: Category,
        /// Priority: high | medium | low.
        #[arg(long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        /// Due date: YYYY-MM-DD, RFC 3339, "today", "tomorrow", "in Nd" or "in Nw".
        #[arg(long)]
        due: Option<String>,
    },

    /// List tasks, overdue first.
    List {
        /// Tab: all | pending | completed.
        #[arg(long, value_enum, default_value_t = View::All)]
        view: View,
        /// Filter by category, or "all".
        #[arg(long, default_value = "all")]
        category: Selector<Category>,
        /// Filter by priority, or "all".
        #[arg(long, default_value = "all")]
        priority: Selector<Priority>,
        /// Filter by status, or "all".
        #[arg(long, default_value = "all")]
        status: Selector<Status>,
        /// Case-insensitive text to find in title or description.
        #[arg(long, short)]
        search: Option<String>,
    },

    /// View a single task.
    View {
        /// Task ID.
        id: String,
    },

    /// Update fields on a task.
    Update {
        /// Task ID.
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long, value_enum)]
        category: Option<Category>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        /// Clear due date.
        #[arg(long)]
        clear_due: bool,
    },

    /// Flip a task between pending and completed.
    Toggle {
        /// Task ID.
        id: String,
    },

    /// Delete a task.
    Delete {
        /// Task ID.
        id: String,
    },

    /// Show the statistics dashboard.
    Stats,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Parse human due date input relative to `now` (local time).
///
/// Supports "today", "tomorrow", "yesterday", "in 3d", "in 2w", `YYYY-MM-DD`
/// and RFC 3339 timestamps. Calendar days resolve to local midnight.
/// Offsets that leave chrono's date range yield `None`.
pub fn parse_due_input(s: &str, now: DateTime<Local>) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s.trim()) {
        return Some(ts.with_timezone(&Utc));
    }
    let s = s.trim().to_lowercase();

    let today = now.date_naive();
    let day = match s.as_str() {
        "today" => Some(today),
        "tomorrow" => today.succ_opt(),
        "yesterday" => today.pred_opt(),
        _ => relative_day(&s, today).or_else(|| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
    }?;

    start_of_day(&Local, day)
}

/// "in Nd" / "in Nw" counted from `today`.
fn relative_day(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let rest = s.strip_prefix("in ")?.trim();
    let offset = if let Some(n) = rest.strip_suffix('d') {
        Duration::try_days(n.trim().parse().ok()?)?
    } else if let Some(n) = rest.strip_suffix('w') {
        Duration::try_weeks(n.trim().parse().ok()?)?
    } else {
        return None;
    };
    today.checked_add_signed(offset)
}

/// First existing instant of `day` in `tz`.
///
/// When a DST jump skips local midnight this is the first whole hour that
/// exists, and UTC midnight if none of them does.
fn start_of_day<Tz: TimeZone>(tz: &Tz, day: NaiveDate) -> Option<DateTime<Utc>> {
    let midnight = day.and_hms_opt(0, 0, 0)?;
    let local = (0..24).find_map(|h| {
        let t = midnight.checked_add_signed(Duration::hours(h))?;
        tz.from_local_datetime(&t).earliest()
    });
    Some(match local {
        Some(t) => t.with_timezone(&Utc),
        None => Utc.from_utc_datetime(&midnight),
    })
}

fn due_arg(due: Option<String>) -> Result<Option<DateTime<Utc>>> {
    match due {
        None => Ok(None),
        Some(raw) => parse_due_input(&raw, Local::now())
            .map(Some)
            .ok_or_else(|| BoardError::InvalidInput(format!("Unrecognised due date '{raw}'"))),
    }
}

/// Persist after a mutation. The change stays in memory when this fails.
fn save<S: KeyValueStore>(board: &mut TaskBoard<S>) -> Result<()> {
    board.save().map_err(|e| {
        warn!(error = %e, "failed to save tasks");
        BoardError::Store(e)
    })
}

pub fn cmd_add<S: KeyValueStore>(
    board: &mut TaskBoard<S>,
    title: String,
    desc: Option<String>,
    category: Category,
    priority: Priority,
    due: Option<String>,
) -> Result<()> {
    let input = NewTask {
        title,
        description: desc.unwrap_or_default(),
        category,
        priority,
        due_date: due_arg(due)?,
    };
    let task = board.create(input, Utc::now())?;
    save(board)?;
    println!("Added task {} \"{}\"", task.id, task.title);
    Ok(())
}

pub fn cmd_list<S: KeyValueStore>(
    board: &TaskBoard<S>,
    view: View,
    category: Selector<Category>,
    priority: Selector<Priority>,
    status: Selector<Status>,
    search: Option<String>,
) -> Result<()> {
    let options = TaskFilterOptions {
        category,
        priority,
        status,
        search_query: search.unwrap_or_default(),
    };
    let now = Utc::now();
    let tasks = board.visible(view, &options, now);
    if tasks.is_empty() {
        if options.is_active() || view != View::All {
            println!("No tasks match the current filters.");
        } else {
            println!("No tasks yet. Add one with `tm add <title>`.");
        }
        return Ok(());
    }
    print_table(&tasks, now);
    println!("\n{} task{}", tasks.len(), if tasks.len() == 1 { "" } else { "s" });
    Ok(())
}

pub fn cmd_view<S: KeyValueStore>(board: &TaskBoard<S>, id: String) -> Result<()> {
    let task = board.get(&id).ok_or(BoardError::NotFound(id))?;
    print_task(task, Utc::now());
    Ok(())
}

pub fn cmd_update<S: KeyValueStore>(
    board: &mut TaskBoard<S>,
    id: String,
    title: Option<String>,
    desc: Option<String>,
    category: Option<Category>,
    priority: Option<Priority>,
    due: Option<String>,
    clear_due: bool,
) -> Result<()> {
    let due_date = if clear_due { Some(None) } else { due_arg(due)?.map(Some) };
    let update = TaskUpdate { title, description: desc, category, priority, due_date };
    if update.is_empty() {
        return Err(BoardError::InvalidInput("Nothing to update".into()));
    }
    let task = board.update(&id, &update, Utc::now())?;
    save(board)?;
    println!("Updated task {} \"{}\"", task.id, task.title);
    Ok(())
}

pub fn cmd_toggle<S: KeyValueStore>(board: &mut TaskBoard<S>, id: String) -> Result<()> {
    let task = board.toggle(&id, Utc::now())?;
    save(board)?;
    match task.status {
        Status::Completed => println!("Task completed: \"{}\"", task.title),
        Status::Pending => println!("Task reopened: \"{}\"", task.title),
    }
    Ok(())
}

pub fn cmd_delete<S: KeyValueStore>(board: &mut TaskBoard<S>, id: String) -> Result<()> {
    let task = board.delete(&id)?;
    save(board)?;
    println!("Deleted task {} \"{}\"", task.id, task.title);
    Ok(())
}

pub fn cmd_stats<S: KeyValueStore>(board: &TaskBoard<S>) -> Result<()> {
    print_dashboard(&board.stats(Utc::now()));
    Ok(())
}

pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "tm", &mut std::io::stdout());
}
