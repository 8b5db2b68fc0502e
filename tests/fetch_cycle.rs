//! End-to-end fetch cycles against a mocked GitHub REST API.

use std::sync::Mutex;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ghwatch::config::AuthToken;
use ghwatch::data::{CycleId, StatusState};
use ghwatch::services::{fetch_repository, CycleSummary, RepositoryOutcome};
use ghwatch::{apply_event, FetchEvent, FetchOrchestrator, GitHubClient, RepositoryId, ViewState};

const ME: &str = "octocat";

fn pull_request(server: &MockServer, number: u64, author: &str) -> Value {
    let sha = format!("sha{number}");
    json!({
        "number": number,
        "title": format!("Change {number}"),
        "html_url": format!("https://github.com/a/b/pull/{number}"),
        "state": "open",
        "user": { "login": author },
        "comments": number,
        "labels": [{ "name": "bug", "color": "d73a4a" }],
        "updated_at": "2024-05-01T10:00:00Z",
        "statuses_url": format!("{}/repos/a/b/statuses/{sha}", server.uri()),
        "head": { "sha": sha },
    })
}

async fn mount_listing(server: &MockServer, pulls: Value) {
    Mock::given(method("GET"))
        .and(path("/repos/a/b/pulls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pulls))
        .mount(server)
        .await;
}

async fn mount_statuses(server: &MockServer, sha: &str, statuses: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/a/b/statuses/{sha}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(statuses))
        .mount(server)
        .await;
}

async fn mount_check_runs(server: &MockServer, sha: &str, runs: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/a/b/commits/{sha}/check-runs")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": runs.as_array().map_or(0, Vec::len),
            "check_runs": runs,
        })))
        .mount(server)
        .await;
}

async fn mount_not_found(server: &MockServer, route: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Not Found",
            "documentation_url": "https://docs.github.com/rest",
        })))
        .mount(server)
        .await;
}

fn client(server: &MockServer, timeout: Duration) -> GitHubClient {
    let token = AuthToken::new("test-token").expect("token is non-empty");
    GitHubClient::new(&token, &server.uri(), timeout).expect("client should build")
}

fn orchestrator(server: &MockServer) -> FetchOrchestrator {
    FetchOrchestrator::new(
        client(server, Duration::from_secs(5)),
        vec![repo()],
        ME.to_string(),
    )
}

fn two_repositories(server: &MockServer, timeout: Duration) -> FetchOrchestrator {
    FetchOrchestrator::new(client(server, timeout), vec![repo(), other()], ME.to_string())
}

fn other() -> RepositoryId {
    RepositoryId::new("c", "d")
}

fn repo() -> RepositoryId {
    RepositoryId::new("a", "b")
}

/// Run one cycle, returning the events in dispatch order.
async fn run(orchestrator: &mut FetchOrchestrator) -> (Vec<FetchEvent>, CycleSummary) {
    let events = Mutex::new(Vec::new());
    let summary = orchestrator
        .run_cycle(|event| events.lock().expect("not poisoned").push(event))
        .await;
    (events.into_inner().expect("not poisoned"), summary)
}

fn fold(state: &mut ViewState, events: Vec<FetchEvent>) {
    let now = Utc.with_ymd_and_hms(2024, 5, 4, 14, 3, 0).unwrap();
    for event in events {
        apply_event(state, event, &now);
    }
}

#[tokio::test]
async fn only_own_open_pull_requests_are_shown() {
    let server = MockServer::start().await;
    let mut closed = pull_request(&server, 3, ME);
    closed["state"] = json!("closed");
    mount_listing(
        &server,
        json!([
            pull_request(&server, 1, ME),
            pull_request(&server, 2, "OctoCat"),
            pull_request(&server, 4, "someone-else"),
            closed,
        ]),
    )
    .await;
    for sha in ["sha1", "sha2"] {
        mount_statuses(&server, sha, json!([])).await;
        mount_check_runs(&server, sha, json!([])).await;
    }

    let mut orchestrator = orchestrator(&server);
    let (events, summary) = run(&mut orchestrator).await;

    let fetched = events
        .iter()
        .filter(|e| matches!(e, FetchEvent::PrFetched { .. }))
        .count();
    assert_eq!(fetched, 2);
    assert!(matches!(
        events.last(),
        Some(FetchEvent::RepositoryFetched { cycle: CycleId(1), .. })
    ));
    assert_eq!(summary.pull_requests, 2);
    assert_eq!(summary.failures(), 0);

    let mut state = ViewState::new();
    fold(&mut state, events);
    let mut numbers: Vec<u64> = state.display_issues[&repo()]
        .iter()
        .map(|pr| pr.number)
        .collect();
    numbers.sort_unstable();
    assert_eq!(numbers, vec![1, 2]);
    assert_eq!(state.warning, None);
    assert_eq!(state.last_checked, "Last updated on May 4, 2024, 14:03");
}

#[tokio::test]
async fn statuses_merge_and_check_runs_map() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        json!([pull_request(&server, 1, ME), pull_request(&server, 2, ME)]),
    )
    .await;
    mount_statuses(
        &server,
        "sha1",
        json!([
            { "context": "ci/build", "state": "pending", "description": "Queued" },
            { "context": "ci/build", "state": "success", "description": "Passed" },
        ]),
    )
    .await;
    mount_statuses(
        &server,
        "sha2",
        json!([
            { "context": "ci/build", "state": "success", "description": "Passed" },
            { "context": "ci/build", "state": "pending", "description": "Queued" },
        ]),
    )
    .await;
    mount_check_runs(
        &server,
        "sha1",
        json!([{
            "app": { "slug": "github-actions" },
            "name": "lint",
            "status": "completed",
            "conclusion": "failure",
            "details_url": "https://example.test/run/1",
        }]),
    )
    .await;
    mount_check_runs(&server, "sha2", json!([])).await;

    let mut orchestrator = orchestrator(&server);
    let (events, _) = run(&mut orchestrator).await;
    let mut state = ViewState::new();
    fold(&mut state, events);

    let prs = &state.display_issues[&repo()];
    for pr in prs {
        let build = &pr.statuses["ci/build"];
        assert_eq!(build.state, StatusState::Success);
        assert_eq!(build.description, "Passed");
    }

    let first = prs.iter().find(|pr| pr.number == 1).expect("PR 1 arrived");
    assert_eq!(first.check_runs.len(), 1);
    assert_eq!(first.check_runs[0].key(), "github-actions:lint");
    assert_eq!(first.comment_count, 1);
    assert_eq!(first.labels[0].name, "bug");
}

#[tokio::test]
async fn failed_enrichment_drops_only_that_pull_request() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        json!([pull_request(&server, 1, ME), pull_request(&server, 2, ME)]),
    )
    .await;
    mount_statuses(&server, "sha1", json!([])).await;
    mount_statuses(&server, "sha2", json!([])).await;
    mount_check_runs(&server, "sha1", json!([])).await;
    mount_not_found(&server, "/repos/a/b/commits/sha2/check-runs".to_string()).await;

    let mut orchestrator = orchestrator(&server);
    let (events, summary) = run(&mut orchestrator).await;

    assert_eq!(summary.pull_requests, 1);
    assert_eq!(summary.failed_pull_requests, 1);
    assert!(matches!(
        events.last(),
        Some(FetchEvent::FetchFailed { repo: Some(_), .. })
    ));

    let mut state = ViewState::new();
    fold(&mut state, events);
    let numbers: Vec<u64> = state.display_issues[&repo()]
        .iter()
        .map(|pr| pr.number)
        .collect();
    assert_eq!(numbers, vec![1]);
    let warning = state.warning.expect("failure is reported");
    assert!(warning.contains("1 pull request(s) could not be loaded"));
    assert!(warning.contains("#2"));
}

#[tokio::test]
async fn listing_failure_reports_without_data() {
    let server = MockServer::start().await;
    mount_not_found(&server, "/repos/a/b/pulls".to_string()).await;

    let mut orchestrator = orchestrator(&server);
    let (events, summary) = run(&mut orchestrator).await;

    assert_eq!(events.len(), 1);
    assert_eq!(summary.failed_repositories, 1);

    let mut state = ViewState::new();
    fold(&mut state, events);
    assert!(state.display_issues.is_empty());
    assert!(state
        .warning
        .as_deref()
        .is_some_and(|w| w.starts_with("a/b: ")));
    assert_eq!(state.last_checked, "");
}

#[tokio::test]
async fn next_cycle_clears_merged_pull_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/a/b/pulls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([pull_request(&server, 1, ME)])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_listing(&server, json!([])).await;
    mount_statuses(&server, "sha1", json!([])).await;
    mount_check_runs(&server, "sha1", json!([])).await;

    let mut orchestrator = orchestrator(&server);
    let mut state = ViewState::new();

    let (events, _) = run(&mut orchestrator).await;
    fold(&mut state, events);
    assert_eq!(state.display_issues[&repo()].len(), 1);

    let (events, summary) = run(&mut orchestrator).await;
    assert_eq!(summary.cycle, CycleId(2));
    fold(&mut state, events);
    assert!(state.display_issues[&repo()].is_empty());
}

#[tokio::test]
async fn repository_fetch_reports_its_outcome() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/a/b/pulls"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            pull_request(&server, 1, ME),
            pull_request(&server, 2, ME),
        ])))
        .mount(&server)
        .await;
    mount_statuses(&server, "sha1", json!([])).await;
    mount_check_runs(&server, "sha1", json!([])).await;
    mount_not_found(&server, "/repos/a/b/statuses/sha2".to_string()).await;

    let client = client(&server, Duration::from_secs(5));
    let events = Mutex::new(Vec::new());
    let dispatch = |event: FetchEvent| events.lock().expect("not poisoned").push(event);
    let outcome = fetch_repository(&client, &repo(), ME, CycleId(4), &dispatch)
        .await
        .expect("listing succeeds");

    assert_eq!(
        outcome,
        RepositoryOutcome {
            delivered: 1,
            failed: 1
        }
    );
    let events = events.into_inner().expect("not poisoned");
    assert_eq!(events.len(), 3);
    assert!(matches!(events[0], FetchEvent::PrFetched { cycle: CycleId(4), .. }));
    assert!(matches!(events[1], FetchEvent::RepositoryFetched { .. }));
    assert!(matches!(events[2], FetchEvent::FetchFailed { .. }));
}

#[tokio::test]
async fn failing_repository_leaves_siblings_untouched() {
    let server = MockServer::start().await;
    mount_listing(&server, json!([pull_request(&server, 1, ME)])).await;
    mount_statuses(&server, "sha1", json!([])).await;
    mount_check_runs(&server, "sha1", json!([])).await;
    mount_not_found(&server, "/repos/c/d/pulls".to_string()).await;

    let mut orchestrator = two_repositories(&server, Duration::from_secs(5));
    let (events, summary) = run(&mut orchestrator).await;

    assert_eq!(summary.pull_requests, 1);
    assert_eq!(summary.failed_repositories, 1);

    let mut state = ViewState::new();
    fold(&mut state, events);
    assert_eq!(state.display_issues[&repo()].len(), 1);
    assert!(!state.display_issues.contains_key(&other()));
}

#[tokio::test]
async fn failure_stays_visible_after_empty_sibling_finishes() {
    let server = MockServer::start().await;
    mount_not_found(&server, "/repos/a/b/pulls".to_string()).await;
    Mock::given(method("GET"))
        .and(path("/repos/c/d/pulls"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let mut orchestrator = two_repositories(&server, Duration::from_secs(5));
    let (events, _) = run(&mut orchestrator).await;
    assert!(matches!(
        events.last(),
        Some(FetchEvent::RepositoryFetched { .. })
    ));

    let mut state = ViewState::new();
    fold(&mut state, events);
    assert!(state
        .warning
        .as_deref()
        .is_some_and(|w| w.starts_with("a/b: ")));
    assert!(state.display_issues[&other()].is_empty());
}

#[tokio::test]
async fn slow_repository_times_out_without_stopping_the_cycle() {
    let server = MockServer::start().await;
    mount_listing(&server, json!([])).await;
    Mock::given(method("GET"))
        .and(path("/repos/c/d/pulls"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut orchestrator = two_repositories(&server, Duration::from_millis(200));
    let (events, summary) = run(&mut orchestrator).await;

    assert_eq!(summary.failed_repositories, 1);
    assert!(events.iter().any(|e| matches!(
        e,
        FetchEvent::RepositoryFetched { repo: fetched, .. } if *fetched == repo()
    )));
    let timeout = events.iter().find_map(|e| match e {
        FetchEvent::FetchFailed { error, .. } => Some(error.clone()),
        _ => None,
    });
    assert_eq!(
        timeout.as_deref(),
        Some("c/d: request to /repos/c/d/pulls timed out after 200ms")
    );
}
