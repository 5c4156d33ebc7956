use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gh_activity(server: &MockServer) -> Command {
    let mut cmd = Command::cargo_bin("gh-activity").unwrap();
    cmd.env("GH_ACTIVITY_API_URL", server.uri())
        .env("GH_ACTIVITY_TIMEOUT_SECS", "5")
        .env_remove("GH_ACTIVITY_CHECK_RATE_LIMIT")
        .env_remove("RUST_LOG");
    cmd
}

async fn mount_rate_limit(server: &MockServer, remaining: i64) {
    Mock::given(method("GET"))
        .and(path("/rate_limit"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "rate": { "remaining": remaining, "reset": 1_700_000_000 } })),
        )
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, page: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/users/octocat/events"))
        .and(query_param("page", page))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn prints_activity_table() {
    let server = MockServer::start().await;
    mount_rate_limit(&server, 60).await;
    mount_page(
        &server,
        "1",
        json!([
            { "type": "PushEvent", "repo": { "name": "a/b" } },
            { "type": "ForkEvent", "repo": { "name": "c/d" } },
            { "type": "PushEvent", "repo": { "name": "a/b" } },
        ]),
    )
    .await;

    gh_activity(&server)
        .args(["hub-activity", "octocat"])
        .assert()
        .success()
        .stdout(
            "Activity  Count  Project name\n\
             --------  -----  ------------\n\
             push          2  a/b\n\
             fork          1  c/d\n",
        );
}

#[tokio::test(flavor = "multi_thread")]
async fn flags_filter_and_pages_accumulate() {
    let server = MockServer::start().await;
    mount_rate_limit(&server, 60).await;
    mount_page(&server, "1", json!([{ "type": "PushEvent", "repo": { "name": "a/b" } }])).await;
    mount_page(
        &server,
        "2",
        json!([
            { "type": "WatchEvent", "repo": { "name": "e/f" } },
            { "type": "PushEvent", "repo": { "name": "a/b" } },
        ]),
    )
    .await;

    gh_activity(&server)
        .args(["hub-activity", "octocat", "--p", "2", "--push"])
        .assert()
        .success()
        .stdout(predicate::str::contains("push          2  a/b").and(predicate::str::contains("watch").not()));
}

#[tokio::test(flavor = "multi_thread")]
async fn exhausted_quota_stops_before_fetching() {
    let server = MockServer::start().await;
    mount_rate_limit(&server, 0).await;
    Mock::given(method("GET"))
        .and(path("/users/octocat/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    gh_activity(&server)
        .args(["hub-activity", "octocat"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("rate limit exhausted"));
}

#[tokio::test(flavor = "multi_thread")]
async fn rate_limited_page_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat/events"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    gh_activity(&server)
        .env("GH_ACTIVITY_CHECK_RATE_LIMIT", "false")
        .args(["hub-activity", "octocat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Rate limit exceeded (HTTP 403)"))
        .stdout("");
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_event_kind_fails() {
    let server = MockServer::start().await;
    mount_page(&server, "1", json!([{ "type": "HoloportEvent", "repo": { "name": "a/b" } }])).await;

    gh_activity(&server)
        .env("GH_ACTIVITY_CHECK_RATE_LIMIT", "false")
        .args(["hub-activity", "octocat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Event is not recognized: HoloportEvent"));
}

#[tokio::test(flavor = "multi_thread")]
async fn shows_rate_limit() {
    let server = MockServer::start().await;
    mount_rate_limit(&server, 42).await;

    gh_activity(&server)
        .arg("rate-limit")
        .assert()
        .success()
        .stdout("Remaining calls: 42, resets at 2023-11-14 22:13:20 UTC\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_username_is_a_usage_error() {
    let server = MockServer::start().await;

    gh_activity(&server)
        .arg("hub-activity")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains(
            "the following required arguments were not provided",
        ));
}

#[tokio::test(flavor = "multi_thread")]
async fn non_positive_pages_are_rejected() {
    let server = MockServer::start().await;

    gh_activity(&server)
        .args(["hub-activity", "octocat", "--p", "-2"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid input"));
}
