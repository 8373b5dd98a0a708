use anyhow::{bail, Result};

use taskdeck::api::MockApi;
use taskdeck::models::{Priority, ProjectPatch, TaskPatch, TaskStatus};

use super::{accept, require_login, require_text, validate_due_date};

pub fn project(
    api: &mut MockApi,
    id: &str,
    title: Option<&str>,
    description: Option<&str>,
) -> Result<()> {
    require_login(api)?;
    let patch = ProjectPatch {
        title: title.map(str::to_string),
        description: description.map(str::to_string),
    };
    if patch.is_empty() {
        bail!("Nothing to update. Use --title or --description");
    }
    if let Some(t) = title {
        require_text("Project title", t)?;
    }
    if let Some(d) = description {
        require_text("Project description", d)?;
    }

    let project = accept(api.update_project(id, &patch)?)?;
    println!("Updated project {}", project.id);
    Ok(())
}

pub struct TaskChanges<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub priority: Option<&'a str>,
    pub due_date: Option<&'a str>,
    pub status: Option<&'a str>,
}

pub fn task(api: &mut MockApi, id: &str, changes: &TaskChanges<'_>) -> Result<()> {
    require_login(api)?;
    if let Some(t) = changes.title {
        require_text("Task title", t)?;
    }
    if let Some(due) = changes.due_date {
        validate_due_date(due)?;
    }

    let patch = TaskPatch {
        title: changes.title.map(str::to_string),
        description: changes.description.map(str::to_string),
        priority: changes.priority.map(str::parse::<Priority>).transpose()?,
        due_date: changes.due_date.map(str::to_string),
        status: changes.status.map(str::parse::<TaskStatus>).transpose()?,
    };
    if patch.is_empty() {
        bail!("Nothing to update. Use --title, --description, --priority, --due or --status");
    }

    let task = accept(api.update_task(id, &patch)?)?;
    println!("Updated task {}", task.id);
    Ok(())
}
