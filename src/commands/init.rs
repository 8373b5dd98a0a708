use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use taskdeck::config::{DATA_DIR_NAME, DB_FILE_NAME};
use taskdeck::db::{Database, KvBackend};
use taskdeck::repository::{demo_projects, PROJECTS_KEY};

/// Writes the demo projects unless projects are already stored (or `reset`).
/// Unlike the runtime store, a failed write here is an error.
fn seed(backend: &dyn KvBackend, reset: bool) -> Result<()> {
    if !reset && backend.get(PROJECTS_KEY)?.is_some() {
        return Ok(());
    }
    let json = serde_json::to_string(&demo_projects())?;
    backend
        .set(PROJECTS_KEY, &json)
        .context("Failed to seed demo projects")?;
    Ok(())
}

pub fn run(path: &Path, reset: bool) -> Result<()> {
    let data_dir = path.join(DATA_DIR_NAME);
    let exists = data_dir.exists();

    if exists && !reset {
        println!("Already initialized at {}", path.display());
        println!("Use --reset to restore the demo projects.");
        return Ok(());
    }

    fs::create_dir_all(&data_dir).context("Failed to create .taskdeck directory")?;
    let db = Database::open(&data_dir.join(DB_FILE_NAME))?;
    seed(&db, reset)?;

    if exists {
        println!("Restored demo projects in {}", data_dir.display());
    } else {
        println!("Created {}", data_dir.display());
    }

    println!("Taskdeck initialized successfully!");
    println!("\nNext steps:");
    println!("  taskdeck login you@example.com --password secret");
    println!("  taskdeck project list");
    println!("  taskdeck project create \"Title\" --description \"...\"");

    Ok(())
}
