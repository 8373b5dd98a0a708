use chrono::Duration;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::api::{MockApi, NoPause, Pacer, ThreadPacer};
use crate::clock::{Clock, SystemClock};
use crate::db::{Database, Store};
use crate::error::Result;
use crate::guard::{SubmissionGuard, DEFAULT_GRACE_MS};
use crate::repository::Repository;
use crate::session::Theme;

pub const DATA_DIR_NAME: &str = ".taskdeck";
pub const DB_FILE_NAME: &str = "store.db";

/// Resolved runtime settings for one process run.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub simulate_latency: bool,
    pub grace: Duration,
    pub default_theme: Theme,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            simulate_latency: true,
            grace: Duration::milliseconds(DEFAULT_GRACE_MS),
            default_theme: Theme::default(),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    /// Opens the store under `data_dir` and wires the API over it.
    pub fn open(&self) -> Result<Runtime> {
        let clock: Rc<dyn Clock> = Rc::new(SystemClock);
        let db = Database::open(&self.db_path())?;
        let repo = Repository::open(Store::new(Box::new(db)), clock.clone(), self.default_theme);
        let pacer: Box<dyn Pacer> = if self.simulate_latency {
            Box::new(ThreadPacer)
        } else {
            Box::new(NoPause)
        };
        Ok(Runtime {
            api: MockApi::new(repo, pacer),
            guard: SubmissionGuard::new(clock, self.grace),
        })
    }
}

/// Everything a front end needs for one run.
pub struct Runtime {
    pub api: MockApi,
    pub guard: SubmissionGuard,
}

/// Walks up from `start` looking for a `.taskdeck` directory.
pub fn find_data_dir(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(DATA_DIR_NAME);
        if candidate.is_dir() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}
