use crate::TaskId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Task id {0} not found")]
    NotFound(String),
    #[error("No task ids left after {0}")]
    IdsExhausted(TaskId),
    #[error("Invalid {field} '{value}', expected {expected}")]
    InvalidValue {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("Task store {} is malformed", path.display())]
    MalformedStore {
        path: PathBuf,
        #[source]
        source: StoreError,
    },
    #[error("Cannot access task store {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reasons a task store file is rejected on load.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("not a valid task document")]
    Parse(#[from] serde_json::Error),
    #[error("task {id} is missing required fields: {}", fields.join(", "))]
    MissingFields { id: String, fields: Vec<&'static str> },
    #[error("key '{key}' is not a task id")]
    InvalidKey {
        key: String,
        #[source]
        source: InvalidTaskId,
    },
    #[error("task stored under key {key} has id {id}")]
    IdMismatch { key: TaskId, id: TaskId },
    #[error("task {0} appears more than once")]
    DuplicateId(TaskId),
    #[error("task {id} has an invalid record")]
    InvalidRecord {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{0}' is not a task id, expected a plain decimal number")]
pub struct InvalidTaskId(pub String);
