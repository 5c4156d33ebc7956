use crate::Error;
use crate::error::InvalidTaskId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Numeric task identifier, stored as a string (`"1"`) both as the store key and in the record.
///
/// Only the canonical decimal form parses: no sign, no padding, no leading zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId(u64);

impl TaskId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// The id after this one, or `None` once ids are exhausted.
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = InvalidTaskId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .parse()
            .map(Self)
            .map_err(|_| InvalidTaskId(s.to_string()))?;
        if id.to_string() == s {
            Ok(id)
        } else {
            Err(InvalidTaskId(s.to_string()))
        }
    }
}

impl TryFrom<String> for TaskId {
    type Error = InvalidTaskId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.to_string()
    }
}

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Todo, Status::InProgress, Status::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "in-progress",
            Status::Done => "done",
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| Error::InvalidValue {
                field: "status",
                value: s.to_string(),
                expected: "one of: todo, in-progress, done",
            })
    }
}

#[derive(Debug, Eq, PartialEq, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub(crate) id: TaskId,
    pub(crate) description: String,
    pub(crate) status: Status,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl Task {
    /// Field names every stored record must carry.
    pub const REQUIRED_FIELDS: [&'static str; 5] =
        ["id", "description", "status", "createdAt", "updatedAt"];

    pub(crate) fn new(id: TaskId, description: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            description,
            status: Status::Todo,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves `updated_at` forward to `now`. A clock reading older than the stored value is ignored.
    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = self.updated_at.max(now);
    }
}

impl Display for Task {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}. [{}] {} (created {}, updated {})",
            self.id,
            self.status,
            self.description,
            self.created_at.format("%Y-%m-%d %H:%M:%S"),
            self.updated_at.format("%Y-%m-%d %H:%M:%S"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).unwrap()
    }

    #[test]
    fn status_parses_every_known_value() {
        assert_eq!("todo".parse::<Status>().unwrap(), Status::Todo);
        assert_eq!("in-progress".parse::<Status>().unwrap(), Status::InProgress);
        assert_eq!("done".parse::<Status>().unwrap(), Status::Done);
    }

    #[test]
    fn status_rejects_unknown_values() {
        for value in ["", "Done", "in_progress", "1", "finished"] {
            let result = value.parse::<Status>();
            assert!(
                matches!(result, Err(Error::InvalidValue { field: "status", .. })),
                "'{value}' should be rejected"
            );
        }
    }

    #[test]
    fn status_serializes_as_kebab_case() {
        assert_eq!(
            serde_json::to_string(&Status::InProgress).unwrap(),
            "\"in-progress\""
        );
    }

    #[test]
    fn task_id_is_a_json_string() {
        assert_eq!(serde_json::to_string(&TaskId::new(12)).unwrap(), "\"12\"");
        assert_eq!(
            serde_json::from_str::<TaskId>("\"12\"").unwrap(),
            TaskId::new(12)
        );
        assert!(serde_json::from_str::<TaskId>("\"twelve\"").is_err());
    }

    #[test]
    fn task_id_accepts_only_canonical_decimals() {
        assert_eq!("0".parse::<TaskId>().unwrap(), TaskId::new(0));
        assert_eq!(
            "18446744073709551615".parse::<TaskId>().unwrap(),
            TaskId::new(u64::MAX)
        );

        for value in ["01", "+1", " 1", "1 ", "-1", "", "1e3", "18446744073709551616"] {
            assert!(value.parse::<TaskId>().is_err(), "'{value}' should be rejected");
        }
    }

    #[test]
    fn next_id_stops_at_the_maximum() {
        assert_eq!(TaskId::new(41).next(), Some(TaskId::new(42)));
        assert_eq!(TaskId::new(u64::MAX).next(), None);
    }

    #[test]
    fn new_task_starts_as_todo_with_equal_timestamps() {
        let task = Task::new(TaskId::new(1), "write spec".to_string(), at(100));

        assert_eq!(task.status(), Status::Todo);
        assert_eq!(task.created_at(), task.updated_at());
    }

    #[test]
    fn touch_never_moves_updated_at_backwards() {
        let mut task = Task::new(TaskId::new(1), "write spec".to_string(), at(100));

        task.touch(at(200));
        task.touch(at(150));

        assert_eq!(task.updated_at(), at(200));
        assert_eq!(task.created_at(), at(100));
    }

    #[test]
    fn task_serializes_with_camel_case_fields() {
        let task = Task::new(TaskId::new(3), "ship it".to_string(), at(0));

        let value = serde_json::to_value(&task).unwrap();

        for field in Task::REQUIRED_FIELDS {
            assert!(value.get(field).is_some(), "missing {field}");
        }
        assert_eq!(value["id"], "3");
        assert_eq!(value["status"], "todo");
    }

    #[test]
    fn task_display_is_one_line() {
        let task = Task::new(TaskId::new(4), "read book".to_string(), at(0));

        assert_eq!(
            task.to_string(),
            "4. [todo] read book (created 1970-01-01 00:00:00, updated 1970-01-01 00:00:00)"
        );
    }
}
