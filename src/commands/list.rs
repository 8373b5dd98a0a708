use anyhow::Result;

use taskdeck::api::MockApi;
use taskdeck::filters::{filter_projects_by_text, filter_tasks_by_status, StatusFilter};
use taskdeck::models::{Task, TaskStatus};

use super::{accept, require_login, truncate};

pub fn projects(api: &MockApi, search: Option<&str>) -> Result<()> {
    require_login(api)?;
    let projects = accept(api.list_projects()?)?;
    let term = search.unwrap_or("");
    let matches = filter_projects_by_text(&projects, term);

    if matches.is_empty() {
        if term.is_empty() {
            println!("No projects yet. Create one with 'taskdeck project create'.");
        } else {
            println!("No projects found matching '{}'.", term);
        }
        return Ok(());
    }

    for project in matches {
        let progress = project.progress();
        println!(
            "{:<32} {:<40} {:>3}/{:<3} {:>3}%  {}",
            truncate(&project.id, 32),
            truncate(&project.title, 40),
            progress.completed,
            progress.total,
            progress.percent(),
            project.updated_at.format("%Y-%m-%d")
        );
    }

    Ok(())
}

pub fn tasks(api: &MockApi, project_id: &str, status: &str) -> Result<()> {
    require_login(api)?;
    let filter: StatusFilter = status.parse()?;
    let project = accept(api.get_project(project_id)?)?;
    let tasks = filter_tasks_by_status(&project.tasks, filter);

    if tasks.is_empty() {
        println!("No {} tasks in '{}'.", filter, project.title);
        return Ok(());
    }

    for task in tasks {
        print_task_line(task);
    }

    Ok(())
}

pub fn print_task_line(task: &Task) {
    let checkbox = match task.status {
        TaskStatus::Completed => "[x]",
        TaskStatus::Pending => "[ ]",
    };
    let due = if task.due_date.is_empty() {
        "-".to_string()
    } else {
        task.due_date.chars().take(10).collect()
    };
    println!(
        "{} {:<30} {:<40} {:8} due {}",
        checkbox,
        truncate(&task.id, 30),
        truncate(&task.title, 40),
        task.priority,
        due
    );
}
