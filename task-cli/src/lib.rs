pub mod clock;
pub mod commands;
pub mod config;
mod error;
pub mod storage;
mod task;

pub use error::{Error, InvalidTaskId, StoreError};
pub use task::{Status, Task, TaskId};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// In-memory task store, keyed by id.
///
/// Iteration follows ascending numeric id, which is creation order since ids
/// are only ever handed out above the current maximum.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct TaskRepository {
    tasks: BTreeMap<TaskId, Task>,
}

impl TaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_tasks(tasks: BTreeMap<TaskId, Task>) -> Self {
        Self { tasks }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        let id = id.parse::<TaskId>().ok()?;
        self.tasks.get(&id)
    }

    fn next_id(&self) -> Result<TaskId, Error> {
        match self.tasks.keys().next_back() {
            Some(max) => max.next().ok_or(Error::IdsExhausted(*max)),
            None => Ok(TaskId::new(1)),
        }
    }

    fn existing_id(&self, id: &str) -> Result<TaskId, Error> {
        id.parse::<TaskId>()
            .ok()
            .filter(|id| self.tasks.contains_key(id))
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Adds a `todo` task and returns its id, one above the highest id in the store.
    #[tracing::instrument(skip(self))]
    pub fn add(&mut self, description: &str, now: DateTime<Utc>) -> Result<TaskId, Error> {
        if description.trim().is_empty() {
            return Err(Error::InvalidValue {
                field: "description",
                value: description.to_string(),
                expected: "a non-empty description",
            });
        }
        let id = self.next_id()?;
        self.tasks
            .insert(id, Task::new(id, description.to_string(), now));
        info!(%id, "Added task");
        Ok(id)
    }

    /// Removes a task, failing if the id is unknown.
    #[tracing::instrument(skip(self))]
    pub fn delete(&mut self, id: &str) -> Result<Task, Error> {
        let id = self.existing_id(id)?;
        let removed = self.tasks.remove(&id).ok_or_else(|| Error::NotFound(id.to_string()))?;
        info!(%id, "Deleted task");
        Ok(removed)
    }

    /// Replaces the description (when non-empty) and/or the status of a task.
    ///
    /// `updatedAt` is refreshed on every successful call, even when nothing changed.
    #[tracing::instrument(skip(self))]
    pub fn update(
        &mut self,
        id: &str,
        description: Option<&str>,
        status: Option<Status>,
        now: DateTime<Utc>,
    ) -> Result<&Task, Error> {
        let id = self.existing_id(id)?;
        let task = self
            .tasks
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        if let Some(description) = description.filter(|d| !d.trim().is_empty()) {
            task.description = description.to_string();
        }
        if let Some(status) = status {
            task.status = status;
        }
        task.touch(now);
        debug!(%id, status = %task.status, "Updated task");
        Ok(&*task)
    }

    /// All tasks, or only those with the given status.
    pub fn list(&self, status: Option<Status>) -> Vec<&Task> {
        self.tasks
            .values()
            .filter(|task| status.is_none_or(|status| task.status == status))
            .collect()
    }
}
