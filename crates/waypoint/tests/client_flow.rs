//! End-to-end tests for the client root context.
//!
//! Each test builds a `WaypointClient` over a scripted `MockTransport`
//! and a scene loader that records what it was asked to load, then drives
//! it the way a game would: log in, pick from the menu, play, finish.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use waypoint::prelude::*;
use waypoint::protocol::paths;
use waypoint::transport::HttpMethod;
use waypoint::transport::mock::{MockReply, MockTransport};

// =========================================================================
// Helpers
// =========================================================================

type SceneLog = Arc<Mutex<Vec<String>>>;
type TestClient =
    WaypointClient<MockTransport, MemoryMarkerStore, Box<dyn Fn(&str) + Send + Sync>>;

fn client_with(mock: &MockTransport, markers: MemoryMarkerStore) -> (TestClient, SceneLog) {
    let log: SceneLog = Arc::default();
    let sink = Arc::clone(&log);
    let loader: Box<dyn Fn(&str) + Send + Sync> =
        Box::new(move |scene: &str| sink.lock().unwrap().push(scene.to_string()));

    let client = WaypointClient::builder()
        .base_url("http://backend.test/")
        .build(mock.clone(), markers, loader)
        .expect("config should be valid");
    (client, log)
}

fn client(mock: &MockTransport) -> (TestClient, SceneLog) {
    client_with(mock, MemoryMarkerStore::new())
}

fn login_ok(username: &str) -> MockReply {
    MockReply::json(
        200,
        &format!(r#"{{"message":"Logged in","username":"{username}"}}"#),
    )
}

fn state(username: &str, last_scene: &str) -> MockReply {
    MockReply::json(
        200,
        &format!(r#"{{"username":"{username}","level":1,"coins":0,"lastScene":"{last_scene}"}}"#),
    )
}

fn scenes(log: &SceneLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

// =========================================================================
// Login → menu
// =========================================================================

#[tokio::test]
async fn test_login_sets_session_and_offers_remote_resume() {
    let mock = MockTransport::new()
        .route(
            HttpMethod::Post,
            paths::LOGIN,
            login_ok("ana").with_header("Set-Cookie", "connect.sid=abc; Path=/; HttpOnly"),
        )
        .route(HttpMethod::Get, paths::GAME_STATE, state("ana", "3"));
    let (client, _) = client(&mock);

    let menu = client.login("ana", "pw").await.expect("login should succeed");

    assert!(menu.can_resume);
    assert_eq!(menu.resume_signal, ResumeSignal::Remote);
    let session = client.current_session().unwrap();
    assert_eq!(session.username, "ana");
    assert_eq!(session.credential.as_deref(), Some("connect.sid=abc"));
    assert_eq!(
        client.auth_state().await,
        AuthState::Authenticated {
            username: "ana".into()
        }
    );

    let fetch = &mock.requests_to(paths::GAME_STATE)[0];
    assert_eq!(fetch.url, "http://backend.test/api/game/state");
    assert_eq!(fetch.headers.get("Cookie"), Some("connect.sid=abc"));
}

#[tokio::test]
async fn test_login_without_cookie_proceeds_without_cookie_header() {
    let mock = MockTransport::new()
        .route(HttpMethod::Post, paths::LOGIN, login_ok("ana"))
        .route(HttpMethod::Get, paths::GAME_STATE, state("ana", "2"));
    let (client, _) = client(&mock);

    client.login("ana", "pw").await.unwrap();
    client.resume().await.unwrap();

    assert_eq!(client.current_session().unwrap().credential, None);
    for request in mock.requests_to(paths::GAME_STATE) {
        assert!(!request.headers.contains("Cookie"));
    }
}

#[tokio::test]
async fn test_login_rejected_creates_no_session_and_fetches_nothing() {
    let mock = MockTransport::new().route(
        HttpMethod::Post,
        paths::LOGIN,
        MockReply::json(401, r#"{"error":"Invalid credentials"}"#),
    );
    let (client, _) = client(&mock);

    let err = client.login("ana", "wrong").await.unwrap_err();

    assert!(matches!(err, WaypointError::Auth(_)));
    assert_eq!(err.user_message(), Some("Login failed. Check username/password."));
    assert!(client.current_session().is_none());
    assert!(mock.requests_to(paths::GAME_STATE).is_empty());
}

#[tokio::test]
async fn test_login_state_fetch_down_still_yields_menu() {
    let mock = MockTransport::new().route(HttpMethod::Post, paths::LOGIN, login_ok("ana"));
    let (client, _) = client_with(&mock, MemoryMarkerStore::with_markers(["SaveData_ana"]));

    let menu = client.login("ana", "pw").await.unwrap();

    assert!(menu.can_start_new);
    assert!(menu.can_resume);
    assert_eq!(menu.resume_signal, ResumeSignal::LocalMarker);
}

#[tokio::test]
async fn test_relogin_uses_latest_username_everywhere() {
    let mock = MockTransport::new()
        .route(HttpMethod::Post, paths::LOGIN, login_ok("ana"))
        .route(HttpMethod::Get, paths::GAME_STATE, state("x", "1"));
    let (client, _) = client(&mock);

    client.login("ana", "pw").await.unwrap();
    client.login("bo", "pw").await.unwrap();

    assert_eq!(client.current_session().unwrap().username, "bo");
    let fetches = mock.requests_to(paths::GAME_STATE);
    assert_eq!(fetches[0].query_param("username"), Some("ana"));
    assert_eq!(fetches[1].query_param("username"), Some("bo"));
}

#[tokio::test]
async fn test_signup_establishes_session() {
    let mock = MockTransport::new()
        .route(
            HttpMethod::Post,
            paths::SIGNUP,
            MockReply::json(201, r#"{"message":"User created"}"#),
        )
        .route(HttpMethod::Get, paths::GAME_STATE, MockReply::json(404, "{}"));
    let (client, _) = client(&mock);

    let menu = client.signup("newbie", "pw").await.unwrap();

    assert!(!menu.can_resume);
    assert_eq!(client.current_session().unwrap().username, "newbie");
}

// =========================================================================
// Menu → scene
// =========================================================================

#[tokio::test]
async fn test_start_new_game_with_backend_down_still_loads_first_scene() {
    let mock = MockTransport::new().route(HttpMethod::Post, paths::LOGIN, login_ok("ana"));
    let (client, log) = client(&mock);
    client.login("ana", "pw").await.unwrap();

    let transition = client.start_new_game().await.unwrap();

    assert_eq!(transition.scene, "1");
    assert_eq!(scenes(&log), vec!["1"]);
}

#[tokio::test]
async fn test_resume_prefers_remote_checkpoint() {
    let mock = MockTransport::new()
        .route(HttpMethod::Post, paths::LOGIN, login_ok("ana"))
        .route(HttpMethod::Get, paths::GAME_STATE, state("ana", "3"));
    let (client, log) = client(&mock);
    client.login("ana", "pw").await.unwrap();

    let transition = client.resume().await.unwrap();

    assert_eq!(transition.scene, "3");
    assert_eq!(scenes(&log), vec!["3"]);
}

#[tokio::test]
async fn test_resume_with_fetch_failure_lands_on_first_scene() {
    let mock = MockTransport::new()
        .route(HttpMethod::Post, paths::LOGIN, login_ok("ana"))
        .route(HttpMethod::Get, paths::GAME_STATE, MockReply::Unreachable);
    let (client, log) = client(&mock);
    client.login("ana", "pw").await.unwrap();

    let transition = client.resume().await.unwrap();

    assert_eq!(transition.scene, "1");
    assert_eq!(transition.origin, TransitionOrigin::Fallback);
    assert_eq!(scenes(&log), vec!["1"]);
}

#[tokio::test]
async fn test_enter_scene_records_checkpoint_in_background() {
    let mock = MockTransport::new()
        .route(HttpMethod::Post, paths::LOGIN, login_ok("ana"))
        .route(
            HttpMethod::Post,
            paths::CHECKPOINT,
            MockReply::json(200, r#"{"username":"ana","level":2,"coins":0,"lastScene":"2"}"#),
        );
    let (client, _) = client(&mock);
    client.login("ana", "pw").await.unwrap();

    let record = client.enter_scene("2").await.unwrap();

    assert_eq!(record.unwrap().checkpoint_scene(), Some("2"));
}

#[tokio::test]
async fn test_enter_scene_before_login_sends_nothing() {
    let mock = MockTransport::new();
    let (client, _) = client(&mock);

    assert_eq!(client.enter_scene("2").await.unwrap(), None);
    assert!(mock.requests().is_empty());
}

// =========================================================================
// Runs and leaderboards
// =========================================================================

#[tokio::test]
async fn test_finish_level_submits_time_and_shows_top_rows() {
    let scores: Vec<String> = (1..=7)
        .map(|i| format!(r#"{{"playerName":"p{i}","timeSec":{i}.5}}"#))
        .collect();
    let board = format!(r#"{{"levelId":3,"scores":[{}]}}"#, scores.join(","));
    let mock = MockTransport::new()
        .route(HttpMethod::Post, paths::LOGIN, login_ok("ana"))
        .route(HttpMethod::Post, "/api/leaderboard/3", MockReply::text(201, "stored"))
        .route(HttpMethod::Get, "/api/leaderboard/3", MockReply::json(200, &board));
    let (client, _) = client(&mock);
    client.login("ana", "pw").await.unwrap();

    assert!(client.start_run());
    for _ in 0..3 {
        client.advance_run(Duration::from_millis(100));
    }
    let result = client.finish_level(3).await.unwrap();

    assert!((result.time_sec - 0.3).abs() < 1e-6);
    assert_eq!(result.title(), "Level 3 – Leaderboard\nYour time: 0.300s");
    assert_eq!(result.board.as_ref().unwrap().len(), 7);
    assert_eq!(result.rows.len(), 5);
    assert_eq!(result.rows[0].to_string(), "1. p1 1.500s");

    let ack = result.submission.await.unwrap().unwrap();
    assert_eq!(ack, "stored");
    let posted = mock
        .requests_to("/api/leaderboard/3")
        .into_iter()
        .find(|r| r.method == HttpMethod::Post)
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(posted.body.as_deref().unwrap()).unwrap();
    assert_eq!(body["username"], "ana");
}

#[tokio::test]
async fn test_finish_level_board_unavailable_has_no_rows() {
    let mock = MockTransport::new().route(HttpMethod::Post, paths::LOGIN, login_ok("ana"));
    let (client, _) = client(&mock);
    client.login("ana", "pw").await.unwrap();
    client.start_run();

    let result = client.finish_level(1).await.unwrap();

    assert!(result.board.is_none());
    assert!(result.rows.is_empty());
    assert!(result.submission.await.unwrap().is_err());
}

#[tokio::test]
async fn test_finish_level_without_start_is_rejected() {
    let mock = MockTransport::new();
    let (client, _) = client(&mock);

    let err = client.finish_level(1).await.unwrap_err();

    assert!(matches!(err, WaypointError::NoActiveRun));
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_finish_level_twice_is_rejected() {
    let mock = MockTransport::new();
    let (client, _) = client(&mock);
    client.start_run();
    let _ = client.finish_level(1).await.unwrap();

    assert!(matches!(
        client.finish_level(1).await,
        Err(WaypointError::NoActiveRun)
    ));
}

#[tokio::test]
async fn test_start_gate_fires_once_until_next_scene() {
    let mock = MockTransport::new();
    let (client, log) = client(&mock);

    assert!(client.start_run());
    client.advance_run(Duration::from_secs(2));
    assert!(!client.start_run());
    assert_eq!(client.run_elapsed(), Duration::from_secs(2));

    client.return_to_menu();

    assert_eq!(scenes(&log), vec!["landingScene"]);
    assert!(client.start_run());
    assert_eq!(client.run_elapsed(), Duration::ZERO);
}

// =========================================================================
// Builder
// =========================================================================

#[test]
fn test_builder_rejects_empty_base_url() {
    let result = WaypointClient::builder().base_url("").build(
        MockTransport::new(),
        MemoryMarkerStore::new(),
        |_: &str| {},
    );

    assert!(matches!(result, Err(WaypointError::Config(_))));
}

#[test]
fn test_builder_applies_progress_config() {
    let config = ClientConfig {
        first_scene: "Tutorial".into(),
        landing_scene: "Hub".into(),
        ..ClientConfig::default()
    };

    let client = WaypointClient::builder()
        .config(config)
        .build(MockTransport::new(), MemoryMarkerStore::new(), |_: &str| {})
        .unwrap();

    assert_eq!(client.progress().config().first_scene, "Tutorial");
    assert_eq!(client.progress().config().landing_scene, "Hub");
    assert_eq!(client.config().base_url, waypoint::DEFAULT_BASE_URL);
}
