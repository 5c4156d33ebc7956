//! HTTP client for the events and rate limit endpoints.

use crate::config::Settings;
use crate::event::Event;
use crate::{Error, NetworkError};
use chrono::{DateTime, Utc};
use futures::{StreamExt, TryStreamExt, stream};
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const GITHUB_JSON: &str = "application/vnd.github+json";

/// Remaining API quota as reported by `/rate_limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RateLimit {
    pub remaining: i64,
    /// Epoch seconds at which the quota resets.
    pub reset: i64,
}

#[derive(Deserialize)]
struct RateLimitResponse {
    rate: RateLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quota {
    Plenty,
    Low,
    Exhausted,
}

impl RateLimit {
    pub const EXHAUSTED_AT: i64 = 1;
    pub const LOW_AT: i64 = 10;

    pub fn quota(&self) -> Quota {
        if self.remaining <= Self::EXHAUSTED_AT {
            Quota::Exhausted
        } else if self.remaining <= Self::LOW_AT {
            Quota::Low
        } else {
            Quota::Plenty
        }
    }

    pub fn reset_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.reset, 0).unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct ActivityClient {
    http: reqwest::Client,
    base_url: String,
    per_page: u32,
    max_concurrency: usize,
}

impl ActivityClient {
    pub fn new(settings: &Settings) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(Error::Client)?;
        Ok(Self {
            http,
            base_url: settings.api_url.trim_end_matches('/').to_string(),
            per_page: settings.per_page,
            max_concurrency: settings.max_concurrency.max(1),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches pages `1..=page_count` concurrently and concatenates them in page order.
    ///
    /// Pages are collected as they complete, so the first failing page aborts
    /// the fetch at once and pages still in flight are dropped.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_events(&self, username: &str, page_count: u32) -> Result<Vec<Event>, Error> {
        let mut pages: Vec<(u32, Vec<Event>)> = stream::iter(1..=page_count)
            .map(|page| self.fetch_page(username, page))
            .buffer_unordered(self.max_concurrency)
            .try_collect()
            .await?;
        pages.sort_unstable_by_key(|(page, _)| *page);
        Ok(pages.into_iter().flat_map(|(_, events)| events).collect())
    }

    async fn fetch_page(&self, username: &str, page: u32) -> Result<(u32, Vec<Event>), Error> {
        let url = format!("{}/users/{}/events", self.base_url, username);
        let query = [("per_page", self.per_page), ("page", page)];
        let events: Vec<Event> = self.get_json(&url, &query).await?;
        debug!(page, events = events.len(), "Fetched page");
        Ok((page, events))
    }

    /// Queries the remaining quota of the API.
    pub async fn remaining_calls(&self) -> Result<RateLimit, Error> {
        let url = format!("{}/rate_limit", self.base_url);
        let response: RateLimitResponse = self.get_json(&url, &[] as &[(&str, u32)]).await?;
        debug!(remaining = response.rate.remaining, "Fetched rate limit");
        Ok(response.rate)
    }

    /// Fails when the quota is exhausted and warns when it is running low.
    pub async fn check_quota(&self) -> Result<RateLimit, Error> {
        let limit = self.remaining_calls().await?;
        match limit.quota() {
            Quota::Exhausted => Err(Error::QuotaExhausted {
                remaining: limit.remaining,
                reset_at: limit.reset_at(),
            }),
            Quota::Low => {
                warn!(
                    remaining = limit.remaining,
                    reset_at = %limit.reset_at(),
                    "API rate limit is running low"
                );
                Ok(limit)
            }
            Quota::Plenty => Ok(limit),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, u32)],
    ) -> Result<T, NetworkError> {
        let transport = |source| NetworkError::Transport {
            url: url.to_string(),
            source,
        };
        let response = self
            .http
            .get(url)
            .query(query)
            .header(ACCEPT, GITHUB_JSON)
            .send()
            .await
            .map_err(transport)?;
        match response.status() {
            StatusCode::OK => response.json().await.map_err(transport),
            StatusCode::FORBIDDEN => Err(NetworkError::RateLimitExceeded {
                url: url.to_string(),
            }),
            status => Err(NetworkError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }),
        }
    }
}
