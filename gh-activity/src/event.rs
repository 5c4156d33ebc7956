use crate::Error;
use serde::Deserialize;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Activity types reported by the events API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    CommitComment,
    Create,
    Delete,
    Fork,
    Gollum,
    IssueComment,
    Issues,
    Member,
    Public,
    PullRequest,
    PullRequestReview,
    PullRequestReviewComment,
    Push,
    Release,
    Sponsorship,
    Watch,
}

impl EventKind {
    pub const ALL: [EventKind; 16] = [
        EventKind::CommitComment,
        EventKind::Create,
        EventKind::Delete,
        EventKind::Fork,
        EventKind::Gollum,
        EventKind::IssueComment,
        EventKind::Issues,
        EventKind::Member,
        EventKind::Public,
        EventKind::PullRequest,
        EventKind::PullRequestReview,
        EventKind::PullRequestReviewComment,
        EventKind::Push,
        EventKind::Release,
        EventKind::Sponsorship,
        EventKind::Watch,
    ];

    /// The `type` value used by the API, e.g. `PushEvent`.
    pub fn api_name(&self) -> &'static str {
        match self {
            EventKind::CommitComment => "CommitCommentEvent",
            EventKind::Create => "CreateEvent",
            EventKind::Delete => "DeleteEvent",
            EventKind::Fork => "ForkEvent",
            EventKind::Gollum => "GollumEvent",
            EventKind::IssueComment => "IssueCommentEvent",
            EventKind::Issues => "IssuesEvent",
            EventKind::Member => "MemberEvent",
            EventKind::Public => "PublicEvent",
            EventKind::PullRequest => "PullRequestEvent",
            EventKind::PullRequestReview => "PullRequestReviewEvent",
            EventKind::PullRequestReviewComment => "PullRequestReviewCommentEvent",
            EventKind::Push => "PushEvent",
            EventKind::Release => "ReleaseEvent",
            EventKind::Sponsorship => "SponsorshipEvent",
            EventKind::Watch => "WatchEvent",
        }
    }

    /// Human readable name, e.g. `pull request review`.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::CommitComment => "commit comment",
            EventKind::Create => "create",
            EventKind::Delete => "delete",
            EventKind::Fork => "fork",
            EventKind::Gollum => "gollum",
            EventKind::IssueComment => "issue comment",
            EventKind::Issues => "issues",
            EventKind::Member => "member",
            EventKind::Public => "public",
            EventKind::PullRequest => "pull request",
            EventKind::PullRequestReview => "pull request review",
            EventKind::PullRequestReviewComment => "pull request review comment",
            EventKind::Push => "push",
            EventKind::Release => "release",
            EventKind::Sponsorship => "sponsorship",
            EventKind::Watch => "watch",
        }
    }

    /// Name of the command line switch filtering on this kind, e.g. `pull-request-review`.
    pub fn flag_name(&self) -> &'static str {
        match self {
            EventKind::CommitComment => "commit-comment",
            EventKind::Create => "create",
            EventKind::Delete => "delete",
            EventKind::Fork => "fork",
            EventKind::Gollum => "gollum",
            EventKind::IssueComment => "issue-comment",
            EventKind::Issues => "issues",
            EventKind::Member => "member",
            EventKind::Public => "public",
            EventKind::PullRequest => "pull-request",
            EventKind::PullRequestReview => "pull-request-review",
            EventKind::PullRequestReviewComment => "pull-request-review-comment",
            EventKind::Push => "push",
            EventKind::Release => "release",
            EventKind::Sponsorship => "sponsorship",
            EventKind::Watch => "watch",
        }
    }
}

impl Display for EventKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EventKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.api_name() == s)
            .ok_or_else(|| Error::UnknownEventKind(s.to_string()))
    }
}

/// One entry of the events feed, as sent over the wire.
///
/// `kind` is kept as the raw string so that unknown kinds surface as an
/// [`Error::UnknownEventKind`] during aggregation rather than as a decoding error.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: String,
    pub repo: Repo,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Repo {
    pub name: String,
}

impl Event {
    pub fn new(kind: impl Into<String>, repository: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            repo: Repo {
                name: repository.into(),
            },
        }
    }

    pub fn repository(&self) -> &str {
        &self.repo.name
    }
}
