use anyhow::Result;

use taskdeck::api::MockApi;

use super::{accept, require_login};

pub fn toggle(api: &mut MockApi, id: &str) -> Result<()> {
    require_login(api)?;
    let envelope = api.toggle_task_status(id)?;
    let message = envelope.message.clone();
    let task = accept(envelope)?;
    match message {
        Some(m) => println!("{} ({})", m, task.id),
        None => println!("Task {} is now {}", task.id, task.status),
    }
    Ok(())
}
