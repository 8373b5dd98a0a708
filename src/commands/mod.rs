pub mod auth;
pub mod create;
pub mod delete;
pub mod init;
pub mod list;
pub mod show;
pub mod status;
pub mod theme;
pub mod update;

use anyhow::{bail, Result};
use chrono::{DateTime, NaiveDate};

use taskdeck::api::{Envelope, MockApi};

/// Unwraps an envelope, treating `success: false` as a failure even though the
/// API currently reports failures as errors.
pub fn accept<T>(envelope: Envelope<T>) -> Result<T> {
    if !envelope.success {
        bail!(
            "{}",
            envelope
                .message
                .unwrap_or_else(|| "Request failed".to_string())
        );
    }
    Ok(envelope.data)
}

pub fn require_login(api: &MockApi) -> Result<()> {
    if !api.is_authenticated() {
        bail!("Not logged in. Run 'taskdeck login <email> --password <password>' first.");
    }
    Ok(())
}

pub fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        bail!("{} is required", field);
    }
    Ok(())
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub fn validate_due_date(due: &str) -> Result<()> {
    if NaiveDate::parse_from_str(due, "%Y-%m-%d").is_ok() || DateTime::parse_from_rfc3339(due).is_ok()
    {
        return Ok(());
    }
    bail!(
        "Invalid due date '{}'. Use YYYY-MM-DD or an RFC 3339 timestamp",
        due
    )
}

pub fn truncate(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars - 3).collect();
        format!("{}...", truncated)
    }
}
