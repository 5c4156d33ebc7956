use crate::Error;
use crate::event::{Event, EventKind};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Event counts per repository and kind, both in first-seen order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ActivitySummary {
    repositories: IndexMap<String, IndexMap<EventKind, usize>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRow {
    pub kind: EventKind,
    pub count: usize,
    pub repository: String,
}

impl ActivityRow {
    pub fn new(kind: EventKind, count: usize, repository: impl Into<String>) -> Self {
        Self {
            kind,
            count,
            repository: repository.into(),
        }
    }
}

impl ActivitySummary {
    /// Counts `events` in a single pass. Any unknown event kind fails the whole summary.
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a Event>) -> Result<Self, Error> {
        let mut summary = Self::default();
        for event in events {
            let kind: EventKind = event.kind.parse()?;
            summary.record(kind, event.repository());
        }
        Ok(summary)
    }

    pub fn record(&mut self, kind: EventKind, repository: &str) {
        *self
            .repositories
            .entry(repository.to_string())
            .or_default()
            .entry(kind)
            .or_insert(0) += 1;
    }

    pub fn repositories(&self) -> impl Iterator<Item = &str> {
        self.repositories.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }

    /// Flattens the summary, repositories outermost. An empty `filter` keeps every kind.
    pub fn rows(&self, filter: &HashSet<EventKind>) -> Vec<ActivityRow> {
        self.repositories
            .iter()
            .flat_map(|(repository, kinds)| {
                kinds
                    .iter()
                    .filter(|(kind, _)| filter.is_empty() || filter.contains(*kind))
                    .map(move |(kind, count)| ActivityRow::new(*kind, *count, repository.as_str()))
            })
            .collect()
    }
}
