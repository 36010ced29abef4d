//! Integration tests for leaderboard submission and retrieval against a
//! scripted backend.

use std::sync::Arc;

use waypoint_leaderboard::{LeaderboardController, LeaderboardError};
use waypoint_protocol::ApiClient;
use waypoint_session::SessionStore;
use waypoint_transport::HttpMethod;
use waypoint_transport::mock::{MockReply, MockTransport};

// =========================================================================
// Helpers
// =========================================================================

const BASE: &str = "http://backend.test";
const LEVEL_2: &str = "/api/leaderboard/2";

fn controller(
    mock: &MockTransport,
    sessions: &SessionStore,
) -> LeaderboardController<MockTransport> {
    let api = Arc::new(ApiClient::new(mock.clone(), BASE));
    LeaderboardController::new(api, sessions.clone())
}

fn logged_in(username: &str, cookie: Option<&str>) -> SessionStore {
    let sessions = SessionStore::new();
    sessions.set_session(username, cookie.map(str::to_string));
    sessions
}

fn sent_json(mock: &MockTransport, path: &str) -> serde_json::Value {
    let requests = mock.requests_to(path);
    let body = requests[0].body.as_deref().expect("request should have a body");
    serde_json::from_slice(body).expect("body should be JSON")
}

// =========================================================================
// submit()
// =========================================================================

#[tokio::test]
async fn test_submit_sends_username_and_time() {
    let mock = MockTransport::new().route(
        HttpMethod::Post,
        LEVEL_2,
        MockReply::text(201, "stored"),
    );
    let sessions = logged_in("ana", Some("sid=1"));

    let ack = controller(&mock, &sessions).submit(2, 12.345).await.unwrap();

    assert_eq!(ack, "stored");
    let body = sent_json(&mock, LEVEL_2);
    assert_eq!(body["username"], "ana");
    assert_eq!(body["timeSec"].as_f64(), Some(12.345));
    let sent = &mock.requests_to(LEVEL_2)[0];
    assert_eq!(sent.headers.get("Content-Type"), Some("application/json"));
    assert_eq!(sent.headers.get("Cookie"), Some("sid=1"));
}

#[tokio::test]
async fn test_submit_reads_username_at_call_time() {
    let mock = MockTransport::new().route(HttpMethod::Post, LEVEL_2, MockReply::text(200, "ok"));
    let sessions = SessionStore::new();
    let board = controller(&mock, &sessions);

    // Built before anyone logged in, then two logins in a row.
    sessions.set_session("ana", None);
    sessions.set_session("bo", None);
    board.submit(2, 30.0).await.unwrap();

    assert_eq!(sent_json(&mock, LEVEL_2)["username"], "bo");
}

#[tokio::test]
async fn test_submit_without_cookie_still_posts() {
    let mock = MockTransport::new().route(HttpMethod::Post, LEVEL_2, MockReply::text(200, "ok"));
    let sessions = logged_in("ana", None);

    controller(&mock, &sessions).submit(2, 5.0).await.unwrap();

    assert!(!mock.requests_to(LEVEL_2)[0].headers.contains("Cookie"));
}

#[tokio::test]
async fn test_submit_rejection_keeps_status_and_body() {
    let mock = MockTransport::new().route(
        HttpMethod::Post,
        LEVEL_2,
        MockReply::text(400, "timeSec must be positive"),
    );
    let sessions = logged_in("ana", None);

    let err = controller(&mock, &sessions).submit(2, -1.0).await.unwrap_err();

    let LeaderboardError::Api(api) = err else {
        panic!("expected an API error, got {err:?}");
    };
    assert_eq!(api.status(), Some(400));
    assert_eq!(api.raw_body(), Some("timeSec must be positive"));
}

#[tokio::test]
async fn test_submit_without_session_sends_nothing() {
    let mock = MockTransport::new();
    let sessions = SessionStore::new();

    let err = controller(&mock, &sessions).submit(2, 1.0).await.unwrap_err();

    assert!(matches!(err, LeaderboardError::NotAuthenticated));
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_spawn_submit_transport_failure_is_reported_not_panicked() {
    let mock = MockTransport::new();
    let sessions = logged_in("ana", None);

    let result = controller(&mock, &sessions)
        .spawn_submit(2, 9.5)
        .await
        .expect("task should not panic");

    match result {
        Err(LeaderboardError::Api(e)) => assert!(e.is_transport()),
        other => panic!("expected transport failure, got {other:?}"),
    }
}

// =========================================================================
// fetch()
// =========================================================================

#[tokio::test]
async fn test_fetch_preserves_backend_order() {
    let mock = MockTransport::new().route(
        HttpMethod::Get,
        LEVEL_2,
        MockReply::json(
            200,
            r#"{"levelId":2,"scores":[
                {"playerName":"zed","timeSec":20.5,"createdAt":"2024-05-01T10:00:00Z"},
                {"playerName":"ana","timeSec":12.345,"createdAt":"2024-05-02T10:00:00Z"}
            ]}"#,
        ),
    );
    let sessions = logged_in("ana", Some("sid=1"));

    let board = controller(&mock, &sessions).fetch(2).await.expect("should fetch");

    assert_eq!(board.level_id(), 2);
    let names: Vec<_> = board.entries().iter().map(|e| e.player_name.as_str()).collect();
    assert_eq!(names, vec!["zed", "ana"]);
    assert_eq!(board.entries()[1].time_sec, 12.345);
    assert_eq!(board.rows(5)[1].time_text, "12.345s");
}

#[tokio::test]
async fn test_submitted_time_round_trips_through_backend() {
    let mock = MockTransport::new()
        .route(HttpMethod::Post, LEVEL_2, MockReply::text(200, "ok"))
        .route(
            HttpMethod::Get,
            LEVEL_2,
            MockReply::json(
                200,
                r#"{"levelId":2,"scores":[{"playerName":"ana","timeSec":12.345}]}"#,
            ),
        );
    let sessions = logged_in("ana", None);
    let board = controller(&mock, &sessions);

    board.submit(2, 12.345).await.unwrap();
    let fetched = board.fetch(2).await.unwrap();

    let submitted = sent_json(&mock, LEVEL_2)["timeSec"].as_f64().unwrap() as f32;
    assert_eq!(submitted, fetched.entries()[0].time_sec);
}

#[tokio::test]
async fn test_fetch_empty_scores_is_empty_snapshot() {
    let mock = MockTransport::new().route(
        HttpMethod::Get,
        LEVEL_2,
        MockReply::json(200, r#"{"levelId":2,"scores":[]}"#),
    );
    let sessions = logged_in("ana", None);

    let board = controller(&mock, &sessions).fetch(2).await;

    let board = board.expect("empty list is not a failure");
    assert!(board.is_empty());
}

#[tokio::test]
async fn test_fetch_without_level_id_uses_requested_level() {
    let mock = MockTransport::new().route(
        HttpMethod::Get,
        LEVEL_2,
        MockReply::json(200, r#"{"scores":[]}"#),
    );
    let sessions = logged_in("ana", None);

    let board = controller(&mock, &sessions).fetch(2).await;

    let board = board.expect("missing levelId is not a failure");
    assert!(board.is_empty());
    assert_eq!(board.level_id(), 2);
}

#[tokio::test]
async fn test_fetch_transport_failure_is_none() {
    let mock = MockTransport::new();
    let sessions = logged_in("ana", None);

    assert!(controller(&mock, &sessions).fetch(2).await.is_none());
}

#[tokio::test]
async fn test_fetch_application_error_is_none() {
    let mock = MockTransport::new().route(
        HttpMethod::Get,
        LEVEL_2,
        MockReply::text(500, "boom"),
    );
    let sessions = logged_in("ana", None);

    assert!(controller(&mock, &sessions).fetch(2).await.is_none());
}

#[tokio::test]
async fn test_fetch_malformed_body_is_none() {
    let mock = MockTransport::new().route(
        HttpMethod::Get,
        LEVEL_2,
        MockReply::json(200, r#"{"scores":"nope"}"#),
    );
    let sessions = logged_in("ana", None);

    assert!(controller(&mock, &sessions).fetch(2).await.is_none());
}

#[tokio::test]
async fn test_fetch_without_session_still_requests() {
    let mock = MockTransport::new().route(
        HttpMethod::Get,
        LEVEL_2,
        MockReply::json(200, r#"{"levelId":2,"scores":[]}"#),
    );
    let sessions = SessionStore::new();

    let board = controller(&mock, &sessions).fetch(2).await;

    assert!(board.is_some());
    assert!(!mock.requests_to(LEVEL_2)[0].headers.contains("Cookie"));
}
