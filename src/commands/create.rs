use anyhow::Result;
use chrono::{DateTime, Utc};

use taskdeck::api::MockApi;
use taskdeck::guard::{Fingerprint, SubmissionGuard};
use taskdeck::models::{NewTask, Priority};

use super::{accept, require_login, require_text, validate_due_date};

/// Outcome of a guarded create.
#[derive(Debug, PartialEq, Eq)]
pub enum Created {
    New(String),
    Duplicate,
}

pub fn project(
    api: &mut MockApi,
    guard: &mut SubmissionGuard,
    drafted_at: DateTime<Utc>,
    title: &str,
    description: &str,
) -> Result<Created> {
    require_login(api)?;
    require_text("Project title", title)?;
    require_text("Project description", description)?;

    let fingerprint = Fingerprint::new([title, description], drafted_at);
    let outcome = guard.submit(fingerprint, || api.create_project(title, description));

    match outcome {
        Some(result) => {
            let project = accept(result?)?;
            println!("Created project {}", project.id);
            Ok(Created::New(project.id))
        }
        None => Ok(Created::Duplicate),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn task(
    api: &mut MockApi,
    guard: &mut SubmissionGuard,
    drafted_at: DateTime<Utc>,
    project_id: &str,
    title: &str,
    description: Option<&str>,
    priority: &str,
    due_date: Option<&str>,
) -> Result<Created> {
    require_login(api)?;
    require_text("Task title", title)?;
    let priority: Priority = priority.parse()?;
    if let Some(due) = due_date {
        validate_due_date(due)?;
    }

    let fields = NewTask {
        title: title.to_string(),
        description: description.unwrap_or_default().to_string(),
        priority,
        due_date: due_date.unwrap_or_default().to_string(),
    };
    let fingerprint = Fingerprint::new(
        [
            project_id,
            fields.title.as_str(),
            fields.description.as_str(),
            fields.priority.as_str(),
            fields.due_date.as_str(),
        ],
        drafted_at,
    );
    let outcome = guard.submit(fingerprint, || api.create_task(project_id, &fields));

    match outcome {
        Some(result) => {
            let task = accept(result?)?;
            println!("Created task {} in project {}", task.id, project_id);
            Ok(Created::New(task.id))
        }
        None => Ok(Created::Duplicate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{setup_anonymous_runtime, setup_runtime};
    use proptest::prelude::*;

    // ==================== Unit Tests ====================

    #[test]
    fn test_create_project() {
        let (mut rt, _dir) = setup_runtime();
        let created = project(&mut rt.api, &mut rt.guard, Utc::now(), "Website", "Rebuild it").unwrap();

        let Created::New(id) = created else {
            panic!("expected a new project");
        };
        let fetched = rt.api.get_project(&id).unwrap().data;
        assert_eq!(fetched.title, "Website");
        assert_eq!(fetched.user_id, "1");
    }

    #[test]
    fn test_create_project_requires_login() {
        let (mut rt, _dir) = setup_anonymous_runtime();
        let result = project(&mut rt.api, &mut rt.guard, Utc::now(), "T", "D");
        assert!(result.unwrap_err().to_string().contains("Not logged in"));
    }

    #[test]
    fn test_create_project_requires_fields() {
        let (mut rt, _dir) = setup_runtime();
        let err = project(&mut rt.api, &mut rt.guard, Utc::now(), "  ", "D").unwrap_err();
        assert!(err.to_string().contains("Project title is required"));
        let err = project(&mut rt.api, &mut rt.guard, Utc::now(), "T", "").unwrap_err();
        assert!(err.to_string().contains("Project description is required"));
        assert_eq!(rt.api.list_projects().unwrap().data.len(), 3);
    }

    #[test]
    fn test_double_submit_creates_once() {
        let (mut rt, _dir) = setup_runtime();
        let drafted_at = Utc::now();

        let first = project(&mut rt.api, &mut rt.guard, drafted_at, "X", "Y").unwrap();
        let second = project(&mut rt.api, &mut rt.guard, drafted_at, "X", "Y").unwrap();

        assert!(matches!(first, Created::New(_)));
        assert_eq!(second, Created::Duplicate);
        let matching = rt
            .api
            .list_projects()
            .unwrap()
            .data
            .into_iter()
            .filter(|p| p.title == "X")
            .count();
        assert_eq!(matching, 1);
    }

    #[test]
    fn test_create_task() {
        let (mut rt, _dir) = setup_runtime();
        let created = task(
            &mut rt.api,
            &mut rt.guard,
            Utc::now(),
            "1",
            "Write tests",
            Some("all of them"),
            "high",
            Some("2024-01-01"),
        )
        .unwrap();

        let Created::New(id) = created else {
            panic!("expected a new task");
        };
        let project = rt.api.get_project("1").unwrap().data;
        let stored = project.tasks.iter().find(|t| t.id == id).unwrap();
        assert_eq!(stored.priority, Priority::High);
        assert_eq!(stored.due_date, "2024-01-01");
        assert_eq!(project.tasks.last().unwrap().id, id);
    }

    #[test]
    fn test_create_task_missing_project() {
        let (mut rt, _dir) = setup_runtime();
        let err = task(
            &mut rt.api,
            &mut rt.guard,
            Utc::now(),
            "missing",
            "A",
            None,
            "medium",
            Some("2024-01-01"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Project not found"));
    }

    #[test]
    fn test_create_task_invalid_priority() {
        let (mut rt, _dir) = setup_runtime();
        let err = task(&mut rt.api, &mut rt.guard, Utc::now(), "1", "A", None, "urgent", None)
            .unwrap_err();
        assert!(err.to_string().contains("Invalid priority"));
    }

    #[test]
    fn test_create_task_invalid_due_date() {
        let (mut rt, _dir) = setup_runtime();
        let err = task(&mut rt.api, &mut rt.guard, Utc::now(), "1", "A", None, "low", Some("soon"))
            .unwrap_err();
        assert!(err.to_string().contains("Invalid due date"));
    }

    // ==================== Property-Based Tests ====================

    proptest! {
        #[test]
        fn prop_create_project_roundtrip(title in "[a-zA-Z0-9]{1,30}", desc in "[a-zA-Z0-9][a-zA-Z0-9 ]{0,49}") {
            let (mut rt, _dir) = setup_runtime();
            let created = project(&mut rt.api, &mut rt.guard, Utc::now(), &title, &desc).unwrap();
            let Created::New(id) = created else {
                return Err(TestCaseError::fail("duplicate on first submit"));
            };
            let fetched = rt.api.get_project(&id).unwrap().data;
            prop_assert_eq!(fetched.title, title);
            prop_assert_eq!(fetched.created_at, fetched.updated_at);
        }

        #[test]
        fn prop_blank_description_rejected(desc in " {0,10}") {
            let (mut rt, _dir) = setup_runtime();
            let before = rt.api.list_projects().unwrap().data.len();
            let result = project(&mut rt.api, &mut rt.guard, Utc::now(), "T", &desc);
            prop_assert!(result.is_err());
            prop_assert_eq!(rt.api.list_projects().unwrap().data.len(), before);
        }

        #[test]
        fn prop_priority_valid(priority in "low|medium|high") {
            let (mut rt, _dir) = setup_runtime();
            let result = task(&mut rt.api, &mut rt.guard, Utc::now(), "1", "T", None, &priority, None);
            prop_assert!(result.is_ok());
        }
    }
}
