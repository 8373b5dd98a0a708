//! Projects and tasks over a local key-value store, behind a simulated API.
//!
//! [`repository::Repository`] owns the data and persists through
//! [`db::Store`]; [`api::MockApi`] adds latency and response envelopes;
//! [`guard::SubmissionGuard`] keeps a double-submitted create from running twice.

pub mod api;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod guard;
pub mod ids;
pub mod models;
pub mod repository;
pub mod session;

pub use error::{Error, Result};
