//! Summaries of the public activity of a GitHub user.
//!
//! Events are fetched page by page from the user events endpoint, counted
//! per repository and event kind, then optionally filtered by kind.

pub mod client;
pub mod commands;
pub mod config;
mod error;
mod event;
pub mod report;
mod summary;

pub use client::{ActivityClient, Quota, RateLimit};
pub use error::{Error, NetworkError};
pub use event::{Event, EventKind, Repo};
pub use summary::{ActivityRow, ActivitySummary};

use std::collections::HashSet;
use tracing::{debug, info};

const MAX_LOGIN_LEN: usize = 39;

fn is_login(username: &str) -> bool {
    username.len() <= MAX_LOGIN_LEN
        && !username.starts_with('-')
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Checks the inputs of [`fetch_activity`] and returns the page count to request.
pub fn validate_request(username: &str, page_count: i64) -> Result<u32, Error> {
    if username.trim().is_empty() {
        return Err(Error::InvalidInput("username must not be empty".to_string()));
    }
    if !is_login(username) {
        return Err(Error::InvalidInput(format!(
            "'{username}' is not a GitHub username, expected up to {MAX_LOGIN_LEN} letters, digits or hyphens"
        )));
    }
    u32::try_from(page_count)
        .ok()
        .filter(|pages| *pages >= 1)
        .ok_or_else(|| {
            Error::InvalidInput(format!(
                "number of pages must be a positive integer, got {page_count}"
            ))
        })
}

/// Fetches `page_count` pages of events of `username` and summarises them.
///
/// An empty `filter` keeps every kind. Inputs are validated before any request
/// is made, and any failed page or unknown event kind fails the whole call.
#[tracing::instrument(skip(client, filter))]
pub async fn fetch_activity(
    client: &ActivityClient,
    username: &str,
    page_count: i64,
    filter: &HashSet<EventKind>,
) -> Result<Vec<ActivityRow>, Error> {
    let pages = validate_request(username, page_count)?;
    let events = client.fetch_events(username, pages).await?;
    info!(events = events.len(), "Fetched events");
    let summary = ActivitySummary::from_events(&events)?;
    if summary.is_empty() {
        info!("No public activity");
    } else {
        debug!(repositories = summary.repositories().count(), "Summarised activity");
    }
    Ok(summary.rows(filter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn server_with_events(body: serde_json::Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;
        server
    }

    fn client_for(server: &MockServer) -> ActivityClient {
        let settings = Settings {
            api_url: server.uri(),
            ..Settings::default()
        };
        ActivityClient::new(&settings).unwrap()
    }

    #[test]
    fn rejects_blank_usernames() {
        assert!(matches!(validate_request("  ", 1), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn rejects_usernames_that_would_alter_the_url() {
        let too_long = "x".repeat(40);
        for username in ["a?x=#", "../orgs", "octo cat", "-octocat", "a/b", too_long.as_str()] {
            assert!(
                matches!(validate_request(username, 1), Err(Error::InvalidInput(_))),
                "'{username}' should be rejected"
            );
        }
        assert!(validate_request("octo-cat42", 1).is_ok());
    }

    #[test]
    fn rejects_non_positive_page_counts() {
        for pages in [0, -1, i64::MAX] {
            assert!(matches!(
                validate_request("octocat", pages),
                Err(Error::InvalidInput(_))
            ));
        }
        assert_eq!(validate_request("octocat", 3).unwrap(), 3);
    }

    #[tokio::test]
    async fn invalid_input_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let result = fetch_activity(&client_for(&server), "octocat", 0, &HashSet::new()).await;

        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn summarises_and_filters_activity() {
        // Arrange
        let server = server_with_events(json!([
            { "type": "PushEvent", "repo": { "name": "a/b" } },
            { "type": "ForkEvent", "repo": { "name": "c/d" } },
            { "type": "PushEvent", "repo": { "name": "a/b" } },
        ]))
        .await;
        let client = client_for(&server);

        // Act
        let all = fetch_activity(&client, "octocat", 1, &HashSet::new()).await.unwrap();
        let pushes = fetch_activity(&client, "octocat", 1, &HashSet::from([EventKind::Push]))
            .await
            .unwrap();

        // Assert
        assert_eq!(
            all,
            vec![
                ActivityRow::new(EventKind::Push, 2, "a/b"),
                ActivityRow::new(EventKind::Fork, 1, "c/d"),
            ]
        );
        assert_eq!(pushes, vec![ActivityRow::new(EventKind::Push, 2, "a/b")]);
    }

    #[tokio::test]
    async fn unknown_event_kind_fails_the_call() {
        let server = server_with_events(json!([
            { "type": "PushEvent", "repo": { "name": "a/b" } },
            { "type": "HoloportEvent", "repo": { "name": "a/b" } },
        ]))
        .await;

        let result = fetch_activity(&client_for(&server), "octocat", 1, &HashSet::new()).await;

        assert!(matches!(result, Err(Error::UnknownEventKind(kind)) if kind == "HoloportEvent"));
    }
}
