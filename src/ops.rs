//! Pure operations over tasks.
//!
//! Nothing here mutates its input or reads the clock: every function that
//! depends on the current time takes it as `now`.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::fields::*;
use crate::task::{NewTask, Task, TaskFilterOptions, TaskStats, TaskUpdate};

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn base36(mut n: u64) -> String {
    if n == 0 {
        return "0".into();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// Time-ordered prefix (epoch millis) followed by a random suffix, both base 36.
pub fn generate_id(now: DateTime<Utc>) -> String {
    let millis = now.timestamp_millis().max(0) as u64;
    let suffix: u64 = rand::thread_rng().gen();
    format!("{}{}", base36(millis), base36(suffix))
}

/// Build a new pending task. Title emptiness is checked by the caller.
pub fn create_task(input: NewTask, now: DateTime<Utc>) -> Task {
    Task {
        id: generate_id(now),
        title: input.title,
        description: input.description,
        category: input.category,
        priority: input.priority,
        status: Status::Pending,
        due_date: input.due_date,
        created_at: now,
        updated_at: now,
    }
}

/// Copy of `task` with every present field of `update` applied.
pub fn update_task(task: &Task, update: &TaskUpdate, now: DateTime<Utc>) -> Task {
    let mut next = task.clone();
    if let Some(title) = &update.title {
        next.title = title.clone();
    }
    if let Some(description) = &update.description {
        next.description = description.clone();
    }
    if let Some(category) = update.category {
        next.category = category;
    }
    if let Some(priority) = update.priority {
        next.priority = priority;
    }
    if let Some(due_date) = update.due_date {
        next.due_date = due_date;
    }
    next.updated_at = now;
    next
}

/// Copy of `task` with its status flipped.
pub fn toggle_status(task: &Task, now: DateTime<Utc>) -> Task {
    Task {
        status: task.status.toggled(),
        updated_at: now,
        ..task.clone()
    }
}

fn matches_filter(task: &Task, options: &TaskFilterOptions, query: &str) -> bool {
    if !options.category.matches(&task.category) {
        return false;
    }
    if !options.priority.matches(&task.priority) {
        return false;
    }
    if !options.status.matches(&task.status) {
        return false;
    }
    if query.is_empty() {
        return true;
    }
    task.title.to_lowercase().contains(query) || task.description.to_lowercase().contains(query)
}

/// Tasks matching every dimension of `options`, in input order.
pub fn filter_tasks(tasks: &[Task], options: &TaskFilterOptions) -> Vec<Task> {
    let query = options.search_query.to_lowercase();
    tasks
        .iter()
        .filter(|t| matches_filter(t, options, &query))
        .cloned()
        .collect()
}

/// Display order: overdue first, then pending, then by priority, then newest.
fn display_order(a: &Task, b: &Task, now: DateTime<Utc>) -> Ordering {
    let status_rank = |t: &Task| match t.status {
        Status::Pending => 0,
        Status::Completed => 1,
    };
    b.is_overdue(now)
        .cmp(&a.is_overdue(now))
        .then_with(|| status_rank(a).cmp(&status_rank(b)))
        .then_with(|| a.priority.cmp(&b.priority))
        .then_with(|| b.created_at.cmp(&a.created_at))
}

/// Sorted copy of `tasks`. The sort is stable.
pub fn sort_tasks(tasks: &[Task], now: DateTime<Utc>) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by(|a, b| display_order(a, b, now));
    sorted
}

/// Single pass count of statuses, overdue tasks, categories and priorities.
pub fn calculate_stats(tasks: &[Task], now: DateTime<Utc>) -> TaskStats {
    let mut stats = TaskStats { total: tasks.len(), ..Default::default() };
    for task in tasks {
        match task.status {
            Status::Completed => stats.completed += 1,
            Status::Pending => {
                stats.pending += 1;
                if task.is_overdue(now) {
                    stats.overdue += 1;
                }
            }
        }
        stats.by_category.bump(task.category);
        stats.by_priority.bump(task.priority);
    }
    stats
}

/// Demonstration data for a first run.
pub fn sample_tasks(now: DateTime<Utc>) -> Vec<Task> {
    let yesterday = now - Duration::days(1);
    let tomorrow = now + Duration::days(1);
    let next_week = now + Duration::days(7);

    let sample = |title: &str,
                  description: &str,
                  category: Category,
                  priority: Priority,
                  status: Status,
                  due: DateTime<Utc>,
                  created: DateTime<Utc>| Task {
        id: generate_id(now),
        title: title.into(),
        description: description.into(),
        category,
        priority,
        status,
        due_date: Some(due),
        created_at: created,
        updated_at: yesterday,
    };

    vec![
        sample(
            "Complete project proposal",
            "Finalize the Q3 marketing campaign proposal with budget estimates.",
            Category::Work,
            Priority::High,
            Status::Pending,
            tomorrow,
            yesterday,
        ),
        sample(
            "Schedule dentist appointment",
            "Call Dr. Smith's office to schedule a check-up.",
            Category::Personal,
            Priority::Medium,
            Status::Completed,
            yesterday,
            now - Duration::days(3),
        ),
        sample(
            "Pay electricity bill",
            "The bill is due by the end of the week.",
            Category::Urgent,
            Priority::High,
            Status::Pending,
            tomorrow,
            yesterday,
        ),
        sample(
            "Review team presentation",
            "Provide feedback on the quarterly report presentation.",
            Category::Work,
            Priority::Medium,
            Status::Pending,
            next_week,
            yesterday,
        ),
        sample(
            "Buy groceries",
            "Milk, eggs, bread, fruits, and vegetables.",
            Category::Personal,
            Priority::Low,
            Status::Pending,
            tomorrow,
            yesterday,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn mk(id: &str, status: Status, priority: Priority, due: Option<DateTime<Utc>>, created: DateTime<Utc>) -> Task {
        Task {
            id: id.into(),
            title: format!("task {id}"),
            description: String::new(),
            category: Category::Work,
            priority,
            status,
            due_date: due,
            created_at: created,
            updated_at: created,
        }
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn base36_encodes() {
        assert_eq!(base36(0), "0");
        assert_eq!(base36(35), "z");
        assert_eq!(base36(36), "10");
        assert_eq!(base36(36 * 36 + 1), "101");
    }

    #[test]
    fn ids_start_with_time_component_and_differ() {
        let a = generate_id(now());
        let b = generate_id(now());
        let prefix = base36(now().timestamp_millis() as u64);
        assert!(a.starts_with(&prefix));
        assert!(a.len() > prefix.len());
        assert_ne!(a, b);
    }

    #[test]
    fn create_sets_pending_and_timestamps() {
        let input = NewTask {
            title: "Buy milk".into(),
            description: String::new(),
            category: Category::Personal,
            priority: Priority::Low,
            due_date: None,
        };
        let t = create_task(input, now());
        assert_eq!(t.status, Status::Pending);
        assert!(!t.id.is_empty());
        assert_eq!(t.created_at, t.updated_at);
        assert_eq!(t.created_at, now());
        assert_eq!(t.due_date, None);
    }

    #[test]
    fn create_does_not_reject_empty_title() {
        let t = create_task(NewTask::titled(""), now());
        assert_eq!(t.title, "");
    }

    #[test]
    fn update_applies_only_present_fields() {
        let t = mk("a", Status::Pending, Priority::Low, Some(now()), now() - Duration::days(1));
        let later = now() + Duration::minutes(5);
        let upd = TaskUpdate { priority: Some(Priority::High), due_date: Some(None), ..Default::default() };
        let u = update_task(&t, &upd, later);
        assert_eq!(u.priority, Priority::High);
        assert_eq!(u.due_date, None);
        assert_eq!(u.title, t.title);
        assert_eq!(u.category, t.category);
        assert_eq!(u.id, t.id);
        assert_eq!(u.created_at, t.created_at);
        assert_eq!(u.status, t.status);
        assert_eq!(u.updated_at, later);
        // input untouched
        assert_eq!(t.priority, Priority::Low);
    }

    #[test]
    fn empty_update_only_touches_timestamp() {
        let t = mk("a", Status::Pending, Priority::Low, None, now() - Duration::hours(1));
        let u = update_task(&t, &TaskUpdate::default(), now());
        assert_eq!(u.title, t.title);
        assert!(u.updated_at >= t.updated_at);
        assert_eq!(Task { updated_at: t.updated_at, ..u }, t);
    }

    #[test]
    fn double_toggle_restores_status() {
        let t = mk("a", Status::Pending, Priority::Low, None, now());
        let once = toggle_status(&t, now());
        assert_eq!(once.status, Status::Completed);
        let twice = toggle_status(&once, now() + Duration::seconds(1));
        assert_eq!(twice.status, t.status);
        assert_eq!(twice.updated_at, now() + Duration::seconds(1));
    }

    #[test]
    fn wildcard_filter_is_identity() {
        let tasks = sample_tasks(now());
        let out = filter_tasks(&tasks, &TaskFilterOptions::default());
        assert_eq!(out, tasks);
    }

    #[test]
    fn filter_is_conjunctive_and_order_preserving() {
        let tasks = sample_tasks(now());
        let opts = TaskFilterOptions {
            category: Selector::Only(Category::Work),
            status: Selector::Only(Status::Pending),
            ..Default::default()
        };
        let out = filter_tasks(&tasks, &opts);
        let titles: Vec<_> = out.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Complete project proposal", "Review team presentation"]);

        let opts = TaskFilterOptions { priority: Selector::Only(Priority::High), ..opts };
        assert_eq!(filter_tasks(&tasks, &opts).len(), 1);
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_description() {
        let tasks = sample_tasks(now());
        let by_title = TaskFilterOptions { search_query: "GROCERIES".into(), ..Default::default() };
        assert_eq!(filter_tasks(&tasks, &by_title).len(), 1);
        let by_desc = TaskFilterOptions { search_query: "dr. smith".into(), ..Default::default() };
        let out = filter_tasks(&tasks, &by_desc);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "Schedule dentist appointment");
        let none = TaskFilterOptions { search_query: "zebra".into(), ..Default::default() };
        assert!(filter_tasks(&tasks, &none).is_empty());
    }

    #[test]
    fn filter_result_is_subset_of_input() {
        let tasks = sample_tasks(now());
        let input: HashSet<_> = tasks.iter().map(|t| t.id.clone()).collect();
        for status in [Status::Pending, Status::Completed] {
            let opts = TaskFilterOptions { status: Selector::Only(status), ..Default::default() };
            for t in filter_tasks(&tasks, &opts) {
                assert!(input.contains(&t.id));
            }
        }
    }

    #[test]
    fn sort_overdue_then_pending_then_completed() {
        let a = mk("A", Status::Pending, Priority::High, Some(now() - Duration::days(1)), now() - Duration::days(5));
        let b = mk("B", Status::Pending, Priority::Low, Some(now() + Duration::days(1)), now() - Duration::days(5));
        let c = mk("C", Status::Completed, Priority::High, None, now() - Duration::days(5));
        let sorted = sort_tasks(&[c.clone(), b.clone(), a.clone()], now());
        assert_eq!(ids(&sorted), ["A", "B", "C"]);
        let sorted = sort_tasks(&[a, b, c], now());
        assert_eq!(ids(&sorted), ["A", "B", "C"]);
    }

    #[test]
    fn sort_priority_then_newest() {
        let old = now() - Duration::days(3);
        let new = now() - Duration::days(1);
        let tasks = vec![
            mk("low-new", Status::Pending, Priority::Low, None, new),
            mk("high-old", Status::Pending, Priority::High, None, old),
            mk("high-new", Status::Pending, Priority::High, None, new),
            mk("med", Status::Pending, Priority::Medium, None, old),
        ];
        let sorted = sort_tasks(&tasks, now());
        assert_eq!(ids(&sorted), ["high-new", "high-old", "med", "low-new"]);
    }

    #[test]
    fn sort_orders_by_priority_inside_overdue_tier() {
        let past = Some(now() - Duration::hours(2));
        let tasks = vec![
            mk("late-low", Status::Pending, Priority::Low, past, now() - Duration::days(1)),
            mk("late-high", Status::Pending, Priority::High, past, now() - Duration::days(2)),
            mk("fresh-high", Status::Pending, Priority::High, None, now()),
        ];
        let sorted = sort_tasks(&tasks, now());
        assert_eq!(ids(&sorted), ["late-high", "late-low", "fresh-high"]);
    }

    #[test]
    fn completed_past_due_is_not_overdue_first() {
        let tasks = vec![
            mk("done-late", Status::Completed, Priority::High, Some(now() - Duration::days(3)), now()),
            mk("pending", Status::Pending, Priority::Low, None, now()),
        ];
        assert_eq!(ids(&sort_tasks(&tasks, now())), ["pending", "done-late"]);
    }

    #[test]
    fn sort_is_stable_and_preserves_ids() {
        let created = now() - Duration::days(1);
        let tasks = vec![
            mk("x", Status::Pending, Priority::Medium, None, created),
            mk("y", Status::Pending, Priority::Medium, None, created),
            mk("z", Status::Pending, Priority::Medium, None, created),
        ];
        let sorted = sort_tasks(&tasks, now());
        assert_eq!(ids(&sorted), ["x", "y", "z"]);
        assert_eq!(ids(&tasks), ["x", "y", "z"]);

        let sample = sample_tasks(now());
        let mut before: Vec<_> = sample.iter().map(|t| t.id.clone()).collect();
        let mut after: Vec<_> = sort_tasks(&sample, now()).into_iter().map(|t| t.id).collect();
        before.sort();
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    fn stats_on_empty_collection() {
        let stats = calculate_stats(&[], now());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.completion_rate(), 0);
    }

    #[test]
    fn stats_ten_tasks() {
        let mut tasks = Vec::new();
        for i in 0..4 {
            tasks.push(mk(&format!("done{i}"), Status::Completed, Priority::Low, Some(now() - Duration::days(1)), now()));
        }
        for i in 0..2 {
            tasks.push(mk(&format!("late{i}"), Status::Pending, Priority::High, Some(now() - Duration::days(1)), now()));
        }
        for i in 0..4 {
            tasks.push(mk(&format!("open{i}"), Status::Pending, Priority::Medium, None, now()));
        }
        let stats = calculate_stats(&tasks, now());
        assert_eq!(stats.total, 10);
        assert_eq!(stats.completed, 4);
        assert_eq!(stats.pending, 6);
        assert_eq!(stats.overdue, 2);
        assert_eq!(stats.completion_rate(), 40);
        assert_eq!(stats.by_category.work, 10);
        assert_eq!(stats.by_priority.get(Priority::Low), 4);
        assert_eq!(stats.by_priority.high, 2);
        assert_eq!(stats.by_priority.medium, 4);
    }

    #[test]
    fn sample_set_shape() {
        let tasks = sample_tasks(now());
        assert_eq!(tasks.len(), 5);
        let unique: HashSet<_> = tasks.iter().map(|t| &t.id).collect();
        assert_eq!(unique.len(), 5);
        let stats = calculate_stats(&tasks, now());
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 4);
        assert_eq!(stats.overdue, 0);
        assert_eq!(stats.by_category.personal, 2);
        assert!(tasks.iter().all(|t| t.updated_at >= t.created_at));
    }
}
