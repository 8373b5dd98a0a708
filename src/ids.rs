//! Entity ids and record timestamps.

use chrono::{DateTime, Duration, SecondsFormat, SubsecRound, Utc};
use std::cell::Cell;
use std::rc::Rc;
use uuid::Uuid;

use crate::clock::Clock;

const SUFFIX_LEN: usize = 9;

/// Issues ids and timestamps for new and mutated records.
///
/// Timestamps carry millisecond precision and never repeat: if the clock has not
/// moved past the last issued instant, the next one is bumped by a millisecond.
pub struct Stamper {
    clock: Rc<dyn Clock>,
    last: Cell<Option<DateTime<Utc>>>,
}

impl Stamper {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self::with_floor(clock, None)
    }

    /// Every issued timestamp will be strictly after `floor`, even if the clock
    /// reads earlier (records persisted by a run whose clock was ahead).
    pub fn with_floor(clock: Rc<dyn Clock>, floor: Option<DateTime<Utc>>) -> Self {
        Self {
            clock,
            last: Cell::new(floor.map(|at| at.trunc_subsecs(3))),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        let mut now = self.clock.now().trunc_subsecs(3);
        if let Some(last) = self.last.get() {
            if now <= last {
                now = last + Duration::milliseconds(1);
            }
        }
        self.last.set(Some(now));
        now
    }

    /// `<prefix>_<epoch millis>_<random suffix>`. Uniqueness is likely, not guaranteed.
    pub fn new_id(&self, prefix: &str) -> String {
        format!(
            "{}_{}_{}",
            prefix,
            self.clock.now().timestamp_millis(),
            random_suffix()
        )
    }
}

fn random_suffix() -> String {
    Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(SUFFIX_LEN)
        .collect()
}

pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
