use anyhow::Result;

use taskdeck::api::MockApi;

use super::list::print_task_line;
use super::{accept, require_login};

pub fn run(api: &MockApi, id: &str) -> Result<()> {
    require_login(api)?;
    let project = accept(api.get_project(id)?)?;
    let progress = project.progress();

    println!("Project {}: {}", project.id, project.title);
    println!("Owner: {}", project.user_id);
    println!("Created: {}", project.created_at.format("%Y-%m-%d %H:%M:%S"));
    println!("Updated: {}", project.updated_at.format("%Y-%m-%d %H:%M:%S"));
    println!(
        "Progress: {}/{} tasks ({}%)",
        progress.completed,
        progress.total,
        progress.percent()
    );

    if !project.description.is_empty() {
        println!("\nDescription:");
        for line in project.description.lines() {
            println!("  {}", line);
        }
    }

    if project.tasks.is_empty() {
        println!("\nNo tasks yet.");
    } else {
        println!("\nTasks:");
        for task in &project.tasks {
            print_task_line(task);
        }
    }

    Ok(())
}
