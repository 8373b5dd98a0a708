use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{kind} not found")]
    NotFound { kind: &'static str, id: String },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),
}

impl Error {
    pub fn project_not_found(id: &str) -> Self {
        Error::NotFound {
            kind: "Project",
            id: id.to_string(),
        }
    }

    pub fn task_not_found(id: &str) -> Self {
        Error::NotFound {
            kind: "Task",
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
