use chrono::{DateTime, Duration, TimeZone, Utc};

use taskboard::board::TaskBoard;
use taskboard::fields::*;
use taskboard::ops::{calculate_stats, filter_tasks, sort_tasks};
use taskboard::store::{FileStore, KeyValueStore, MemoryStore, TaskStore, TASKS_KEY};
use taskboard::task::{NewTask, Task, TaskFilterOptions, TaskUpdate};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 1, 9, 0, 0).unwrap()
}

fn task(id: &str, status: Status, priority: Priority, due: Option<DateTime<Utc>>) -> Task {
    Task {
        id: id.into(),
        title: id.into(),
        description: String::new(),
        category: Category::Work,
        priority,
        status,
        due_date: due,
        created_at: now() - Duration::days(2),
        updated_at: now() - Duration::days(2),
    }
}

#[test]
fn first_run_seeds_and_persists_samples() {
    let dir = tempfile::tempdir().unwrap();
    let board = TaskBoard::open(FileStore::new(dir.path()), now());
    assert_eq!(board.tasks().len(), 5);
    assert!(board.seeded());

    let mut reopened = TaskBoard::open(FileStore::new(dir.path()), now() + Duration::days(10));
    assert!(!reopened.seeded());
    assert_eq!(reopened.tasks(), board.tasks());

    let first = board.visible(View::All, &TaskFilterOptions::default(), now())[0].id.clone();
    let toggled = reopened.toggle(&first, now() + Duration::days(10)).unwrap();
    assert_eq!(toggled.id, first);
}

#[test]
fn sort_and_filter_scenarios() {
    let a = task("A", Status::Pending, Priority::High, Some(now() - Duration::days(1)));
    let b = task("B", Status::Pending, Priority::Low, Some(now() + Duration::days(1)));
    let c = task("C", Status::Completed, Priority::High, None);
    let tasks = vec![a, b, c];

    let sorted: Vec<_> = sort_tasks(&tasks, now()).into_iter().map(|t| t.id).collect();
    assert_eq!(sorted, ["A", "B", "C"]);

    let opts = TaskFilterOptions { status: Selector::Only(Status::Completed), ..Default::default() };
    let filtered: Vec<_> = filter_tasks(&tasks, &opts).into_iter().map(|t| t.id).collect();
    assert_eq!(filtered, ["C"]);
}

#[test]
fn edits_survive_a_reload() {
    let dir = tempfile::tempdir().unwrap();
    let mut board = TaskBoard::with_tasks(FileStore::new(dir.path()), Vec::new());

    let input = NewTask {
        title: "Renew passport".into(),
        description: "Photos first".into(),
        category: Category::Personal,
        priority: Priority::High,
        due_date: Some(now() + Duration::days(30)),
    };
    let t = board.create(input, now()).unwrap();
    board.toggle(&t.id, now() + Duration::hours(1)).unwrap();
    let upd = TaskUpdate { due_date: Some(None), category: Some(Category::Urgent), ..Default::default() };
    board.update(&t.id, &upd, now() + Duration::hours(2)).unwrap();
    board.save().unwrap();

    let loaded = TaskStore::new(FileStore::new(dir.path())).load().unwrap();
    assert_eq!(loaded.len(), 1);
    let got = &loaded[0];
    assert_eq!(got.status, Status::Completed);
    assert_eq!(got.category, Category::Urgent);
    assert_eq!(got.due_date, None);
    assert_eq!(got.created_at, now());
    assert_eq!(got.updated_at, now() + Duration::hours(2));
}

#[test]
fn deleting_everything_does_not_reseed() {
    let mut board = TaskBoard::open(MemoryStore::new(), now());
    let ids: Vec<_> = board.tasks().iter().map(|t| t.id.clone()).collect();
    for id in ids {
        board.delete(&id).unwrap();
    }
    board.save().unwrap();
    let blob = board.store().backend().get(TASKS_KEY).unwrap().unwrap();

    let mut backend = MemoryStore::new();
    backend.set(TASKS_KEY, &blob).unwrap();
    let reopened = TaskBoard::open(backend, now());
    assert!(reopened.tasks().is_empty());
    let stats = calculate_stats(reopened.tasks(), now());
    assert_eq!(stats.total, 0);
    assert_eq!(stats.completion_rate(), 0);
}

#[test]
fn loads_blob_written_by_the_browser_app() {
    let raw = r#"[
      {"id":"lxk2a1b9f3q","title":"Pay rent","description":"","category":"urgent","priority":"high",
       "status":"pending","dueDate":"2024-08-30T00:00:00.000Z",
       "createdAt":"2024-08-20T10:15:00.000Z","updatedAt":"2024-08-21T11:00:00.000Z"},
      {"id":"lxk2a1b9f3r","title":"Gym","description":"Leg day","category":"personal","priority":"low",
       "status":"completed","dueDate":null,
       "createdAt":"2024-08-20T10:16:00.000Z","updatedAt":"2024-08-20T10:16:00.000Z"}
    ]"#;
    let mut backend = MemoryStore::new();
    backend.set(TASKS_KEY, raw).unwrap();
    let board = TaskBoard::open(backend, now());
    assert_eq!(board.tasks().len(), 2);

    let stats = board.stats(now());
    assert_eq!(stats.overdue, 1);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.completion_rate(), 50);
    assert_eq!(stats.by_category.urgent, 1);
}
