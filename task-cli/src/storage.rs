//! Loading and saving the task store as a single JSON document.
//!
//! Loading is strict: every record must carry all of [`Task::REQUIRED_FIELDS`],
//! otherwise the whole store is rejected. Saving writes a temporary file next
//! to the target and renames it into place, so a reader sees either the old
//! document or the new one.
//!
//! There is no locking. Two processes saving the same store race and the last
//! rename wins.

use crate::{Error, StoreError, Task, TaskId, TaskRepository};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tracing::{debug, info};

/// Reads the store at `path`. A missing file is an empty store.
#[tracing::instrument]
pub fn load(path: &Path) -> Result<TaskRepository, Error> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            debug!("No task store yet, starting empty");
            return Ok(TaskRepository::new());
        }
        Err(source) => {
            return Err(Error::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let repository = parse(&contents).map_err(|source| Error::MalformedStore {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(tasks = repository.len(), "Loaded task store");
    Ok(repository)
}

/// Parses and validates a store document.
///
/// Keys must be canonical task ids matching the `id` of their record, and
/// each id may appear only once.
pub fn parse(contents: &str) -> Result<TaskRepository, StoreError> {
    let Records(records) = serde_json::from_str(contents)?;
    let mut tasks = BTreeMap::new();
    for (key, record) in records {
        let fields = match &record {
            Value::Object(fields) => fields,
            _ => {
                return Err(StoreError::MissingFields {
                    id: key,
                    fields: Task::REQUIRED_FIELDS.to_vec(),
                });
            }
        };
        let missing: Vec<&'static str> = Task::REQUIRED_FIELDS
            .into_iter()
            .filter(|field| !fields.contains_key(*field))
            .collect();
        if !missing.is_empty() {
            return Err(StoreError::MissingFields {
                id: key,
                fields: missing,
            });
        }
        let id: TaskId = key
            .parse()
            .map_err(|source| StoreError::InvalidKey {
                key: key.clone(),
                source,
            })?;
        let task: Task = serde_json::from_value(record)
            .map_err(|source| StoreError::InvalidRecord { id: key, source })?;
        if task.id() != id {
            return Err(StoreError::IdMismatch { key: id, id: task.id() });
        }
        if tasks.insert(id, task).is_some() {
            return Err(StoreError::DuplicateId(id));
        }
    }
    Ok(TaskRepository::from_tasks(tasks))
}

/// Top-level entries in document order, duplicates included.
struct Records(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for Records {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RecordsVisitor)
    }
}

struct RecordsVisitor;

impl<'de> Visitor<'de> for RecordsVisitor {
    type Value = Records;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an object of task records keyed by id")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Records, A::Error> {
        let mut records = Vec::new();
        while let Some(entry) = map.next_entry::<String, Value>()? {
            records.push(entry);
        }
        Ok(Records(records))
    }
}

/// Writes the whole store to `path`, creating parent directories as needed.
#[tracing::instrument(skip(repository))]
pub fn save(repository: &TaskRepository, path: &Path) -> Result<(), Error> {
    let io_error = |source: std::io::Error| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(directory).map_err(io_error)?;

    let mut file = tempfile::NamedTempFile::new_in(directory).map_err(io_error)?;
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut file, formatter);
    repository
        .serialize(&mut serializer)
        .map_err(|error| io_error(error.into()))?;
    file.write_all(b"\n").map_err(io_error)?;
    file.persist(path).map_err(|error| io_error(error.error))?;
    info!(tasks = repository.len(), "Saved task store");
    Ok(())
}
