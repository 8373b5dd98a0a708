//! Projects with their embedded tasks, held in memory and flushed to the
//! store after every mutation.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::db::Store;
use crate::error::{Error, Result};
use crate::ids::Stamper;
use crate::models::{NewTask, Project, ProjectPatch, Task, TaskPatch, TaskStatus, User};
use crate::session::{Session, Theme};

pub const PROJECTS_KEY: &str = "taskdeck_projects";

const SEED_PROJECTS: &str = include_str!("../resources/seed.json");

/// The demo dataset used when the store holds no projects yet.
pub fn demo_projects() -> Vec<Project> {
    serde_json::from_str(SEED_PROJECTS).unwrap_or_else(|e| {
        warn!(error = %e, "bundled demo dataset is unreadable");
        Vec::new()
    })
}

pub struct Repository {
    store: Store,
    session: Session,
    stamper: Stamper,
    projects: Vec<Project>,
    // task id -> owning project id
    task_owners: HashMap<String, String>,
}

impl Repository {
    pub fn open(store: Store, clock: Rc<dyn Clock>, default_theme: Theme) -> Self {
        let projects = store.load(PROJECTS_KEY, demo_projects());
        let session = Session::restore(&store, default_theme);
        let task_owners = index_tasks(&projects);
        let floor = latest_stamp(&projects);
        debug!(
            projects = projects.len(),
            tasks = task_owners.len(),
            "repository loaded"
        );
        Self {
            store,
            session,
            stamper: Stamper::with_floor(clock, floor),
            projects,
            task_owners,
        }
    }

    // Session

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<User> {
        self.session.login(&self.store, email, password)
    }

    pub fn logout(&mut self) {
        self.session.logout(&self.store);
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated(&self.store)
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.session.set_theme(&self.store, theme);
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.session.toggle_theme(&self.store)
    }

    // Projects

    pub fn list_projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn get_project(&self, id: &str) -> Result<&Project> {
        self.projects
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::project_not_found(id))
    }

    pub fn create_project(&mut self, title: &str, description: &str) -> Project {
        let id = self.fresh_id("project", |repo, id| {
            repo.projects.iter().any(|p| p.id == id)
        });
        let now = self.stamper.now();
        let project = Project {
            id,
            title: title.to_string(),
            description: description.to_string(),
            created_at: now,
            updated_at: now,
            user_id: self.session.owner_id().to_string(),
            tasks: Vec::new(),
        };

        self.projects.push(project.clone());
        self.persist();
        debug!(id = %project.id, "created project");
        project
    }

    pub fn update_project(&mut self, id: &str, patch: &ProjectPatch) -> Result<Project> {
        let now = self.stamper.now();
        let project = self.project_mut(id)?;

        if let Some(title) = &patch.title {
            project.title = title.clone();
        }
        if let Some(description) = &patch.description {
            project.description = description.clone();
        }
        project.updated_at = now;

        let updated = project.clone();
        self.persist();
        debug!(id, "updated project");
        Ok(updated)
    }

    pub fn delete_project(&mut self, id: &str) -> Result<()> {
        let pos = self
            .projects
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| Error::project_not_found(id))?;

        let removed = self.projects.remove(pos);
        for task in &removed.tasks {
            self.task_owners.remove(&task.id);
        }
        self.persist();
        debug!(id, tasks = removed.tasks.len(), "deleted project");
        Ok(())
    }

    // Tasks

    pub fn all_tasks(&self) -> Vec<&Task> {
        self.projects.iter().flat_map(|p| p.tasks.iter()).collect()
    }

    pub fn get_task(&self, task_id: &str) -> Result<&Task> {
        let (p, t) = self.locate_task(task_id)?;
        Ok(&self.projects[p].tasks[t])
    }

    pub fn create_task(&mut self, project_id: &str, fields: &NewTask) -> Result<Task> {
        // Resolve the owner before generating anything: a miss must not write.
        self.get_project(project_id)?;

        let id = self.fresh_id("task", |repo, id| repo.task_owners.contains_key(id));
        let now = self.stamper.now();
        let task = Task {
            id,
            title: fields.title.clone(),
            description: fields.description.clone(),
            status: TaskStatus::Pending,
            priority: fields.priority,
            due_date: fields.due_date.clone(),
            project_id: project_id.to_string(),
            created_at: now,
            updated_at: now,
        };

        let project = self.project_mut(project_id)?;
        project.tasks.push(task.clone());
        project.updated_at = now;
        self.task_owners
            .insert(task.id.clone(), project_id.to_string());

        self.persist();
        debug!(id = %task.id, project_id, "created task");
        Ok(task)
    }

    pub fn update_task(&mut self, task_id: &str, patch: &TaskPatch) -> Result<Task> {
        self.mutate_task(task_id, |task| {
            if let Some(title) = &patch.title {
                task.title = title.clone();
            }
            if let Some(description) = &patch.description {
                task.description = description.clone();
            }
            if let Some(priority) = patch.priority {
                task.priority = priority;
            }
            if let Some(due_date) = &patch.due_date {
                task.due_date = due_date.clone();
            }
            if let Some(status) = patch.status {
                task.status = status;
            }
        })
    }

    pub fn toggle_task_status(&mut self, task_id: &str) -> Result<Task> {
        self.mutate_task(task_id, |task| task.status = task.status.toggled())
    }

    pub fn delete_task(&mut self, task_id: &str) -> Result<()> {
        let (p, t) = self.locate_task(task_id)?;
        let now = self.stamper.now();

        let project = &mut self.projects[p];
        project.tasks.remove(t);
        project.updated_at = now;
        self.task_owners.remove(task_id);

        self.persist();
        debug!(id = task_id, "deleted task");
        Ok(())
    }

    fn mutate_task<F>(&mut self, task_id: &str, apply: F) -> Result<Task>
    where
        F: FnOnce(&mut Task),
    {
        let (p, t) = self.locate_task(task_id)?;
        let now = self.stamper.now();

        let project = &mut self.projects[p];
        project.updated_at = now;
        let task = &mut project.tasks[t];
        apply(task);
        task.updated_at = now;

        let updated = task.clone();
        self.persist();
        debug!(id = task_id, status = %updated.status, "updated task");
        Ok(updated)
    }

    /// (project position, task position) of the task's current home.
    fn locate_task(&self, task_id: &str) -> Result<(usize, usize)> {
        let owner = self
            .task_owners
            .get(task_id)
            .ok_or_else(|| Error::task_not_found(task_id))?;

        self.projects
            .iter()
            .enumerate()
            .filter(|(_, p)| &p.id == owner)
            .find_map(|(pi, p)| {
                p.tasks
                    .iter()
                    .position(|t| t.id == task_id)
                    .map(|ti| (pi, ti))
            })
            .ok_or_else(|| Error::task_not_found(task_id))
    }

    fn project_mut(&mut self, id: &str) -> Result<&mut Project> {
        self.projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::project_not_found(id))
    }

    fn fresh_id<F>(&self, prefix: &str, taken: F) -> String
    where
        F: Fn(&Self, &str) -> bool,
    {
        loop {
            let id = self.stamper.new_id(prefix);
            if !taken(self, &id) {
                return id;
            }
            warn!(id = %id, "generated id collided, retrying");
        }
    }

    fn persist(&self) {
        self.store.save(PROJECTS_KEY, &self.projects);
    }
}

/// Latest `createdAt`/`updatedAt` across projects and their tasks.
fn latest_stamp(projects: &[Project]) -> Option<DateTime<Utc>> {
    projects
        .iter()
        .flat_map(|p| {
            let own = [p.created_at, p.updated_at];
            let tasks = p.tasks.iter().flat_map(|t| [t.created_at, t.updated_at]);
            own.into_iter().chain(tasks)
        })
        .max()
}

fn index_tasks(projects: &[Project]) -> HashMap<String, String> {
    let mut owners = HashMap::new();
    for project in projects {
        for task in &project.tasks {
            if owners
                .insert(task.id.clone(), project.id.clone())
                .is_some()
            {
                warn!(id = %task.id, "duplicate task id in stored data");
            }
        }
    }
    owners
}
