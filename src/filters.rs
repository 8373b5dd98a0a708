use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::models::{Project, Task, TaskStatus};

/// Status selector for task lists; `All` passes everything through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl FromStr for StatusFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(StatusFilter::All),
            other => other.parse::<TaskStatus>().map(StatusFilter::Only).map_err(|_| {
                Error::Validation(format!(
                    "Invalid status filter '{}'. Must be one of: all, pending, completed",
                    other
                ))
            }),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => status.fmt(f),
        }
    }
}

/// Case-insensitive substring match on title or description. Empty term matches all.
pub fn filter_projects_by_text<'a>(projects: &'a [Project], term: &str) -> Vec<&'a Project> {
    let needle = term.to_lowercase();
    projects
        .iter()
        .filter(|p| {
            needle.is_empty()
                || p.title.to_lowercase().contains(&needle)
                || p.description.to_lowercase().contains(&needle)
        })
        .collect()
}

pub fn filter_tasks_by_status(tasks: &[Task], status: StatusFilter) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|t| match status {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => t.status == wanted,
        })
        .collect()
}
