//! Duplicate-submission suppression for create operations.
//!
//! Each submission is keyed by a [`Fingerprint`] derived from its field values and
//! the instant the draft was started. A fingerprint moves through
//! `absent -> in-flight -> grace -> absent`; while it is in flight or in grace, an
//! identical submission is dropped without an error. Grace expiry is evaluated
//! against the guard's clock, so pending expiries live and die with the guard.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

use crate::clock::Clock;
use crate::ids::format_timestamp;

pub const DEFAULT_GRACE_MS: i64 = 1000;
/// Upper bound accepted from configuration (one day).
pub const MAX_GRACE_MS: i64 = 86_400_000;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new<I, S>(fields: I, drafted_at: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut key = String::new();
        for field in fields {
            // Length-prefix so ("a-b", "c") and ("a", "b-c") stay distinct.
            let field = field.as_ref();
            key.push_str(&field.len().to_string());
            key.push(':');
            key.push_str(field);
            key.push('|');
        }
        key.push_str(&format_timestamp(&drafted_at));
        Fingerprint(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    InFlight,
    Grace { expires_at: DateTime<Utc> },
}

/// Token proving a submission was admitted; hand it back to [`SubmissionGuard::finish`].
#[derive(Debug)]
#[must_use]
pub struct Admission {
    fingerprint: Fingerprint,
}

pub struct SubmissionGuard {
    clock: Rc<dyn Clock>,
    grace: Duration,
    entries: HashMap<Fingerprint, Phase>,
}

impl SubmissionGuard {
    pub fn new(clock: Rc<dyn Clock>, grace: Duration) -> Self {
        Self {
            clock,
            grace,
            entries: HashMap::new(),
        }
    }

    pub fn with_default_grace(clock: Rc<dyn Clock>) -> Self {
        Self::new(clock, Duration::milliseconds(DEFAULT_GRACE_MS))
    }

    /// Admits a fingerprint that is currently absent and marks it in flight.
    pub fn begin(&mut self, fingerprint: Fingerprint) -> Option<Admission> {
        self.expire_due();
        if let Some(phase) = self.entries.get(&fingerprint) {
            debug!(fingerprint = fingerprint.as_str(), ?phase, "dropping duplicate submission");
            return None;
        }
        self.entries.insert(fingerprint.clone(), Phase::InFlight);
        Some(Admission { fingerprint })
    }

    /// Moves an admitted submission into its grace window.
    pub fn finish(&mut self, admission: Admission) {
        let now = self.clock.now();
        // Saturate: an oversized window just means "never expires"
        let expires_at = now
            .checked_add_signed(self.grace)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.entries
            .insert(admission.fingerprint, Phase::Grace { expires_at });
    }

    /// Runs `op` unless the fingerprint is already known. Returns `None` when the
    /// submission was dropped; otherwise the operation's own result, which
    /// starts the grace window whether it succeeded or not.
    pub fn submit<T, F>(&mut self, fingerprint: Fingerprint, op: F) -> Option<T>
    where
        F: FnOnce() -> T,
    {
        let admission = self.begin(fingerprint)?;
        let outcome = op();
        self.finish(admission);
        Some(outcome)
    }

    pub fn phase(&mut self, fingerprint: &Fingerprint) -> Option<Phase> {
        self.expire_due();
        self.entries.get(fingerprint).copied()
    }

    /// Drops every grace entry whose window has closed.
    pub fn expire_due(&mut self) {
        let now = self.clock.now();
        self.entries.retain(|_, phase| match phase {
            Phase::InFlight => true,
            Phase::Grace { expires_at } => *expires_at > now,
        });
    }

    /// Ends every grace window immediately. In-flight entries are kept.
    pub fn flush(&mut self) {
        self.entries
            .retain(|_, phase| matches!(phase, Phase::InFlight));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
