#![no_main]

//! Fuzz target for repository operation sequences.
//!
//! Drives random create/update/toggle/delete calls (with missing and
//! recycled ids) against an in-memory store, failing writes at random, and
//! checks that the task index never points at a task that is not there.

use arbitrary::Arbitrary;
use chrono::{TimeZone, Utc};
use libfuzzer_sys::fuzz_target;
use std::rc::Rc;

use taskdeck::clock::ManualClock;
use taskdeck::db::{MemoryBackend, Store};
use taskdeck::filters::{filter_projects_by_text, filter_tasks_by_status, StatusFilter};
use taskdeck::models::{NewTask, Priority, ProjectPatch, TaskPatch};
use taskdeck::repository::Repository;
use taskdeck::session::Theme;

#[derive(Arbitrary, Debug)]
enum Op {
    CreateProject { title: String, description: String },
    UpdateProject { pick: u8, title: Option<String> },
    DeleteProject { pick: u8 },
    CreateTask { pick: u8, title: String, priority: u8 },
    UpdateTask { pick: u8, title: Option<String>, due: Option<String> },
    ToggleTask { pick: u8 },
    DeleteTask { pick: u8 },
    Search { term: String },
    FailWrites(bool),
    Tick(u16),
}

fn priority(n: u8) -> Priority {
    match n % 3 {
        0 => Priority::Low,
        1 => Priority::Medium,
        _ => Priority::High,
    }
}

fuzz_target!(|ops: Vec<Op>| {
    let backend = Rc::new(MemoryBackend::new());
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    let mut repo = Repository::open(
        Store::new(Box::new(backend.clone())),
        Rc::new(clock.clone()),
        Theme::Light,
    );

    for op in ops.into_iter().take(64) {
        let project_ids: Vec<String> = repo.list_projects().iter().map(|p| p.id.clone()).collect();
        let task_ids: Vec<String> = repo.all_tasks().iter().map(|t| t.id.clone()).collect();
        // Index one past the end to exercise the not-found paths
        let project_at = |n: u8| {
            project_ids
                .get(n as usize % (project_ids.len() + 1))
                .cloned()
                .unwrap_or_else(|| "missing".to_string())
        };
        let task_at = |n: u8| {
            task_ids
                .get(n as usize % (task_ids.len() + 1))
                .cloned()
                .unwrap_or_else(|| "missing".to_string())
        };

        match op {
            Op::CreateProject { title, description } => {
                let created = repo.create_project(&title, &description);
                assert!(repo.get_project(&created.id).is_ok());
            }
            Op::UpdateProject { pick, title } => {
                let patch = ProjectPatch {
                    title,
                    description: None,
                };
                let _ = repo.update_project(&project_at(pick), &patch);
            }
            Op::DeleteProject { pick } => {
                let id = project_at(pick);
                if repo.delete_project(&id).is_ok() {
                    assert!(repo.get_project(&id).is_err());
                }
            }
            Op::CreateTask {
                pick,
                title,
                priority: p,
            } => {
                let fields = NewTask {
                    title,
                    priority: priority(p),
                    ..NewTask::default()
                };
                if let Ok(task) = repo.create_task(&project_at(pick), &fields) {
                    assert_eq!(repo.get_task(&task.id).map(|t| t.id.clone()).ok(), Some(task.id));
                }
            }
            Op::UpdateTask { pick, title, due } => {
                let patch = TaskPatch {
                    title,
                    due_date: due,
                    ..TaskPatch::default()
                };
                let _ = repo.update_task(&task_at(pick), &patch);
            }
            Op::ToggleTask { pick } => {
                let _ = repo.toggle_task_status(&task_at(pick));
            }
            Op::DeleteTask { pick } => {
                let id = task_at(pick);
                if repo.delete_task(&id).is_ok() {
                    assert!(repo.get_task(&id).is_err());
                }
            }
            Op::Search { term } => {
                let hits = filter_projects_by_text(repo.list_projects(), &term);
                assert!(hits.len() <= repo.list_projects().len());
            }
            Op::FailWrites(fail) => backend.set_simulate_write_error(fail),
            Op::Tick(ms) => clock.advance_ms(i64::from(ms)),
        }

        // Every indexed task resolves to a task inside its owning project
        for project in repo.list_projects() {
            for task in &project.tasks {
                let found = repo.get_task(&task.id);
                assert!(found.is_ok());
                let _ = filter_tasks_by_status(&project.tasks, StatusFilter::All);
            }
        }
    }
});
