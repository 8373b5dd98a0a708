//! The simulated API boundary.
//!
//! Every call pauses for a fixed, per-operation latency and then resolves to an
//! [`Envelope`]. Failures come back as `Err`; `success` is true on every `Ok`.

use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::error::Result;
use crate::models::{NewTask, Project, ProjectPatch, Task, TaskPatch, User};
use crate::repository::Repository;
use crate::session::Theme;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// How the simulated latency is spent.
pub trait Pacer {
    fn pause(&self, duration: Duration);
}

/// Blocks the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Returns immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPause;

impl Pacer for NoPause {
    fn pause(&self, _duration: Duration) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    Logout,
    ListProjects,
    GetProject,
    CreateProject,
    UpdateProject,
    DeleteProject,
    CreateTask,
    UpdateTask,
    DeleteTask,
    ToggleTask,
}

impl Operation {
    pub fn latency(self) -> Duration {
        let ms = match self {
            Operation::Login => 800,
            Operation::Logout => 300,
            Operation::ListProjects => 500,
            Operation::GetProject => 300,
            Operation::CreateProject => 600,
            Operation::UpdateProject => 500,
            Operation::DeleteProject => 400,
            Operation::CreateTask => 500,
            Operation::UpdateTask => 400,
            Operation::DeleteTask => 300,
            Operation::ToggleTask => 300,
        };
        Duration::from_millis(ms)
    }
}

pub struct MockApi {
    repo: Repository,
    pacer: Box<dyn Pacer>,
}

impl MockApi {
    pub fn new(repo: Repository, pacer: Box<dyn Pacer>) -> Self {
        Self { repo, pacer }
    }

    /// Direct access for synchronous, non-network reads (current user, theme).
    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    fn wait(&self, op: Operation) {
        let latency = op.latency();
        debug!(?op, ms = latency.as_millis() as u64, "simulating latency");
        self.pacer.pause(latency);
    }

    // Auth

    pub fn login(&mut self, email: &str, password: &str) -> Result<Envelope<User>> {
        self.wait(Operation::Login);
        let user = self.repo.login(email, password)?;
        Ok(Envelope::ok(user).with_message("Login successful"))
    }

    pub fn logout(&mut self) -> Result<Envelope<()>> {
        self.wait(Operation::Logout);
        self.repo.logout();
        Ok(Envelope::ok(()))
    }

    pub fn current_user(&self) -> Option<&User> {
        self.repo.session().user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.repo.is_authenticated()
    }

    // Preferences are local; no simulated round trip.

    pub fn theme(&self) -> Theme {
        self.repo.session().theme()
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.repo.set_theme(theme);
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.repo.toggle_theme()
    }

    // Projects

    pub fn list_projects(&self) -> Result<Envelope<Vec<Project>>> {
        self.wait(Operation::ListProjects);
        Ok(Envelope::ok(self.repo.list_projects().to_vec()))
    }

    pub fn get_project(&self, id: &str) -> Result<Envelope<Project>> {
        self.wait(Operation::GetProject);
        let project = self.repo.get_project(id)?.clone();
        Ok(Envelope::ok(project))
    }

    pub fn create_project(&mut self, title: &str, description: &str) -> Result<Envelope<Project>> {
        self.wait(Operation::CreateProject);
        let project = self.repo.create_project(title, description);
        Ok(Envelope::ok(project).with_message("Project created successfully"))
    }

    pub fn update_project(&mut self, id: &str, patch: &ProjectPatch) -> Result<Envelope<Project>> {
        self.wait(Operation::UpdateProject);
        let project = self.repo.update_project(id, patch)?;
        Ok(Envelope::ok(project).with_message("Project updated successfully"))
    }

    pub fn delete_project(&mut self, id: &str) -> Result<Envelope<()>> {
        self.wait(Operation::DeleteProject);
        self.repo.delete_project(id)?;
        Ok(Envelope::ok(()).with_message("Project deleted successfully"))
    }

    // Tasks

    pub fn create_task(&mut self, project_id: &str, fields: &NewTask) -> Result<Envelope<Task>> {
        self.wait(Operation::CreateTask);
        let task = self.repo.create_task(project_id, fields)?;
        Ok(Envelope::ok(task).with_message("Task created successfully"))
    }

    pub fn update_task(&mut self, task_id: &str, patch: &TaskPatch) -> Result<Envelope<Task>> {
        self.wait(Operation::UpdateTask);
        let task = self.repo.update_task(task_id, patch)?;
        Ok(Envelope::ok(task).with_message("Task updated successfully"))
    }

    pub fn delete_task(&mut self, task_id: &str) -> Result<Envelope<()>> {
        self.wait(Operation::DeleteTask);
        self.repo.delete_task(task_id)?;
        Ok(Envelope::ok(()).with_message("Task deleted successfully"))
    }

    pub fn toggle_task_status(&mut self, task_id: &str) -> Result<Envelope<Task>> {
        self.wait(Operation::ToggleTask);
        let task = self.repo.toggle_task_status(task_id)?;
        let message = format!("Task marked as {}", task.status);
        Ok(Envelope::ok(task).with_message(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};
    use crate::db::{MemoryBackend, Store};
    use crate::error::Error;
    use crate::guard::{Fingerprint, SubmissionGuard};
    use crate::models::TaskStatus;
    use crate::repository::PROJECTS_KEY;
    use chrono::{TimeZone, Utc};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every pause instead of sleeping.
    #[derive(Default, Clone)]
    struct RecordingPacer {
        pauses: Rc<RefCell<Vec<Duration>>>,
    }

    impl Pacer for RecordingPacer {
        fn pause(&self, duration: Duration) {
            self.pauses.borrow_mut().push(duration);
        }
    }

    struct Harness {
        api: MockApi,
        backend: Rc<MemoryBackend>,
        clock: ManualClock,
        pauses: Rc<RefCell<Vec<Duration>>>,
    }

    fn setup() -> Harness {
        let backend = Rc::new(MemoryBackend::new());
        backend.insert_raw(PROJECTS_KEY, "[]");
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap());
        let repo = Repository::open(
            Store::new(Box::new(backend.clone())),
            Rc::new(clock.clone()),
            Theme::Light,
        );
        let pacer = RecordingPacer::default();
        let pauses = pacer.pauses.clone();
        Harness {
            api: MockApi::new(repo, Box::new(pacer)),
            backend,
            clock,
            pauses,
        }
    }

    fn stored_projects(backend: &MemoryBackend) -> Vec<Project> {
        let raw = crate::db::KvBackend::get(backend, PROJECTS_KEY)
            .unwrap()
            .unwrap_or_default();
        serde_json::from_str(&raw).unwrap_or_default()
    }

    // ==================== Unit Tests ====================

    #[test]
    fn test_envelope_shape() {
        let mut h = setup();
        let env = h.api.create_project("T", "D").unwrap();

        assert!(env.success);
        assert_eq!(env.message.as_deref(), Some("Project created successfully"));
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["title"], "T");

        let listed = serde_json::to_value(h.api.list_projects().unwrap()).unwrap();
        assert!(listed.get("message").is_none());
    }

    #[test]
    fn test_each_call_pauses_for_its_latency() {
        let mut h = setup();
        let project = h.api.create_project("T", "D").unwrap().data;
        h.api.get_project(&project.id).unwrap();
        h.api.list_projects().unwrap();

        assert_eq!(
            *h.pauses.borrow(),
            vec![
                Duration::from_millis(600),
                Duration::from_millis(300),
                Duration::from_millis(500),
            ]
        );
    }

    #[test]
    fn test_failure_pauses_once_then_errors() {
        let h = setup();
        let err = h.api.get_project("missing").unwrap_err();

        assert!(matches!(err, Error::NotFound { kind: "Project", .. }));
        assert_eq!(h.pauses.borrow().len(), 1);
    }

    #[test]
    fn test_toggle_message_reports_new_status() {
        let mut h = setup();
        let project = h.api.create_project("P", "").unwrap().data;
        let task = h
            .api
            .create_task(&project.id, &NewTask::default())
            .unwrap()
            .data;

        let env = h.api.toggle_task_status(&task.id).unwrap();
        assert_eq!(env.data.status, TaskStatus::Completed);
        assert_eq!(env.message.as_deref(), Some("Task marked as completed"));

        let env = h.api.toggle_task_status(&task.id).unwrap();
        assert_eq!(env.message.as_deref(), Some("Task marked as pending"));
    }

    #[test]
    fn test_login_logout_cycle() {
        let mut h = setup();
        assert!(!h.api.is_authenticated());
        assert!(matches!(
            h.api.login("", "pw"),
            Err(Error::InvalidCredentials)
        ));

        let env = h.api.login("me@example.com", "pw").unwrap();
        assert_eq!(env.message.as_deref(), Some("Login successful"));
        assert!(h.api.is_authenticated());
        assert_eq!(h.api.current_user().unwrap().email, "me@example.com");

        h.api.logout().unwrap();
        assert!(!h.api.is_authenticated());
        assert!(h.api.current_user().is_none());
    }

    #[test]
    fn test_create_task_missing_project_no_write() {
        let mut h = setup();
        let fields = NewTask {
            title: "A".to_string(),
            due_date: "2024-01-01".to_string(),
            ..NewTask::default()
        };
        let err = h.api.create_task("nope", &fields).unwrap_err();

        assert_eq!(err.to_string(), "Project not found");
        assert_eq!(h.backend.write_count(), 0);
    }

    #[test]
    fn test_guarded_double_submit_persists_once() {
        let mut h = setup();
        let mut guard = SubmissionGuard::with_default_grace(Rc::new(h.clock.clone()));
        let drafted_at = h.clock.now();
        let key = Fingerprint::new(["X", "Y"], drafted_at);

        let first = guard.submit(key.clone(), || h.api.create_project("X", "Y"));
        h.clock.advance_ms(200);
        let second = guard.submit(key.clone(), || h.api.create_project("X", "Y"));

        assert!(first.unwrap().is_ok());
        assert!(second.is_none());
        assert_eq!(stored_projects(&h.backend).len(), 1);

        h.clock.advance_ms(1000);
        let third = guard.submit(key, || h.api.create_project("X", "Y"));
        let third = third.unwrap().unwrap();

        let stored = stored_projects(&h.backend);
        assert_eq!(stored.len(), 2);
        assert_ne!(stored[0].id, third.data.id);
    }

    #[test]
    fn test_guarded_task_double_submit_persists_once() {
        let mut h = setup();
        let project = h.api.create_project("P", "").unwrap().data;
        let mut guard = SubmissionGuard::with_default_grace(Rc::new(h.clock.clone()));
        let fields = NewTask {
            title: "X".to_string(),
            description: "Y".to_string(),
            ..NewTask::default()
        };
        let key = Fingerprint::new(
            [fields.title.as_str(), fields.description.as_str()],
            h.clock.now(),
        );

        for _ in 0..3 {
            guard.submit(key.clone(), || h.api.create_task(&project.id, &fields));
        }

        assert_eq!(stored_projects(&h.backend)[0].tasks.len(), 1);
    }

    #[test]
    fn test_theme_is_local_and_persisted() {
        let mut h = setup();
        assert_eq!(h.api.theme(), Theme::Light);
        h.api.set_theme(Theme::Dark);
        assert_eq!(h.api.toggle_theme(), Theme::Light);
        assert!(h.pauses.borrow().is_empty());
    }
}
