use anyhow::Result;
use std::io::{self, Write};

use taskdeck::api::MockApi;

use super::{accept, require_login};

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

pub fn project(api: &mut MockApi, id: &str, force: bool) -> Result<()> {
    require_login(api)?;
    // Local lookups fail on a missing id before prompting; only the delete is a round trip
    let project = api.repository().get_project(id)?;

    if !force {
        let prompt = format!(
            "Delete project {} \"{}\" and its {} task(s)? This cannot be undone.",
            id,
            project.title,
            project.tasks.len()
        );
        if !confirm(&prompt)? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    accept(api.delete_project(id)?)?;
    println!("Deleted project {}", id);
    Ok(())
}

pub fn task(api: &mut MockApi, id: &str, force: bool) -> Result<()> {
    require_login(api)?;
    let task = api.repository().get_task(id)?;

    if !force && !confirm(&format!("Delete task {} \"{}\"?", id, task.title))? {
        println!("Cancelled.");
        return Ok(());
    }

    accept(api.delete_task(id)?)?;
    println!("Deleted task {}", id);
    Ok(())
}
