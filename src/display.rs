//! Text rendering of tasks and statistics for the terminal.

use chrono::{DateTime, Local, Utc};

use crate::fields::*;
use crate::task::{Task, TaskStats};

const BAR_WIDTH: usize = 30;

pub fn format_category(c: Category) -> &'static str {
    match c {
        Category::Work => "Work",
        Category::Personal => "Personal",
        Category::Urgent => "Urgent",
    }
}

pub fn format_priority(p: Priority) -> &'static str {
    match p {
        Priority::High => "High",
        Priority::Medium => "Medium",
        Priority::Low => "Low",
    }
}

pub fn format_status(s: Status) -> &'static str {
    match s {
        Status::Pending => "Pending",
        Status::Completed => "Completed",
    }
}

/// Calendar date of `due` in local time, e.g. "Mar 5, 2024".
pub fn format_due(due: Option<DateTime<Utc>>) -> String {
    match due {
        None => "-".into(),
        Some(d) => d.with_timezone(&Local).format("%b %-d, %Y").to_string(),
    }
}

/// Due date relative to `now` ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(d) = due else {
        return "-".into();
    };
    let today = now.with_timezone(&Local).date_naive();
    let days = (d.with_timezone(&Local).date_naive() - today).num_days();
    if d < now && days == 0 {
        "overdue".into()
    } else if days == 0 {
        "today".into()
    } else if days == 1 {
        "tomorrow".into()
    } else if days > 1 {
        format!("in {days}d")
    } else {
        format!("{}d late", -days)
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

/// Print tasks as a table, flagging overdue rows with `!`.
pub fn print_table(tasks: &[Task], now: DateTime<Utc>) {
    println!(
        "  {:<20} {:<10} {:<9} {:<7} {:<12} {}",
        "ID", "Status", "Category", "Pri", "Due", "Title"
    );
    for t in tasks {
        let flag = if t.is_overdue(now) { '!' } else { ' ' };
        println!(
            "{} {:<20} {:<10} {:<9} {:<7} {:<12} {}",
            flag,
            truncate(&t.id, 20),
            format_status(t.status),
            format_category(t.category),
            format_priority(t.priority),
            format_due_relative(t.due_date, now),
            t.title
        );
    }
}

pub fn print_task(t: &Task, now: DateTime<Utc>) {
    println!("ID:           {}", t.id);
    println!("Title:        {}", t.title);
    println!("Status:       {}", format_status(t.status));
    println!("Category:     {}", format_category(t.category));
    println!("Priority:     {}", format_priority(t.priority));
    println!(
        "Due:          {}",
        match t.due_date {
            Some(_) => format!("{} ({})", format_due(t.due_date), format_due_relative(t.due_date, now)),
            None => "-".into(),
        }
    );
    println!("Created UTC:  {}", t.created_at.to_rfc3339());
    println!("Updated UTC:  {}", t.updated_at.to_rfc3339());
    println!("Description:\n{}\n", if t.description.is_empty() { "-" } else { t.description.as_str() });
}

/// Horizontal bar proportional to `value / max`.
pub fn bar(value: usize, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    "#".repeat(value * BAR_WIDTH / max)
}

pub fn print_dashboard(stats: &TaskStats) {
    println!("Total tasks:  {}", stats.total);
    println!("Completed:    {} ({}% completion rate)", stats.completed, stats.completion_rate());
    println!("Pending:      {}", stats.pending);
    println!("Overdue:      {}", stats.overdue);

    println!("\nCategory distribution");
    let max = Category::ALL.iter().map(|&c| stats.by_category.get(c)).max().unwrap_or(0);
    for c in Category::ALL {
        let n = stats.by_category.get(c);
        println!("  {:<9} {:>4} {}", format_category(c), n, bar(n, max));
    }

    println!("\nPriority distribution");
    let max = Priority::ALL.iter().map(|&p| stats.by_priority.get(p)).max().unwrap_or(0);
    for p in Priority::ALL {
        let n = stats.by_priority.get(p);
        println!("  {:<9} {:>4} {}", format_priority(p), n, bar(n, max));
    }
}
