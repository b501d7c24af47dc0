// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Route-level tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use questlog_api::{AppState, AuthConfig, build_router};
use questlog_config::DispatchConfig;
use questlog_core::AnalysisKind;
use questlog_journal::{Dispatcher, JournalService, JournalTrigger};
use questlog_progression::{LevelingRules, ProgressionEngine, QuestEngine};
use questlog_test_utils::{FailPoint, MemoryStore, MockGateway, fixtures};

const TOKEN: &str = "test-token";

struct Fixture {
    router: Router,
    store: Arc<MemoryStore>,
    gateway: Arc<MockGateway>,
    dispatcher: Arc<Dispatcher>,
}

fn fixture_with_auth(auth: AuthConfig) -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let gateway = Arc::new(MockGateway::new());
    let dispatcher = Arc::new(Dispatcher::start(
        gateway.clone(),
        &DispatchConfig::default(),
        Duration::from_secs(2),
    ));
    let rules = LevelingRules::default();
    let state = AppState {
        characters: ProgressionEngine::new(store.clone(), rules),
        quests: QuestEngine::new(store.clone(), rules),
        journal: JournalService::new(store.clone(), JournalTrigger::new(dispatcher.clone())),
        dispatcher: dispatcher.clone(),
        start_time: Instant::now(),
    };
    Fixture {
        router: build_router(state, auth),
        store,
        gateway,
        dispatcher,
    }
}

fn fixture() -> Fixture {
    fixture_with_auth(AuthConfig {
        bearer_token: Some(TOKEN.to_string()),
    })
}

fn authed(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"));
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_is_public() {
    let f = fixture();
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(&f.router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["uptime_secs"].is_u64());
    assert_eq!(body["dispatch"]["dropped"], 0);
}

#[tokio::test]
async fn missing_or_wrong_token_is_unauthorized() {
    let f = fixture();
    let request = Request::builder()
        .uri("/v1/characters/anything")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&f.router, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/v1/characters/anything")
        .header(header::AUTHORIZATION, "Bearer nope")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&f.router, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unconfigured_token_closes_every_route() {
    let f = fixture_with_auth(AuthConfig::default());
    let (status, _) = send(&f.router, authed("GET", "/v1/quests/user/u1", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_then_fetch_character() {
    let f = fixture();
    let (status, created) = send(
        &f.router,
        authed(
            "POST",
            "/v1/characters",
            Some(json!({"user_id": "u1", "name": "Aria", "class": "mage"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["level"], 1);
    assert_eq!(created["class"], "Mage");

    let id = created["id"].as_str().unwrap();
    let (status, fetched) = send(&f.router, authed("GET", &format!("/v1/characters/{id}"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], id);

    let (status, by_user) = send(&f.router, authed("GET", "/v1/characters/user/u1", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_user["id"], id);
}

#[tokio::test]
async fn invalid_class_is_bad_request() {
    let f = fixture();
    let (status, body) = send(
        &f.router,
        authed(
            "POST",
            "/v1/characters",
            Some(json!({"user_id": "u1", "name": "Aria", "class": "bard"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("class"));
}

#[tokio::test]
async fn grant_xp_levels_up() {
    let f = fixture();
    let character = fixtures::character("u1");
    let id = character.id.clone();
    f.store.seed_character(character).await;

    let (status, body) = send(
        &f.router,
        authed("POST", &format!("/v1/characters/{id}/xp"), Some(json!({"amount": 150}))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["leveled_up"], true);
    assert_eq!(body["character"]["level"], 2);
    assert_eq!(body["character"]["xp"], 50);
    assert_eq!(body["character"]["attribute_points"], 10);
}

#[tokio::test]
async fn non_positive_grant_is_bad_request() {
    let f = fixture();
    let character = fixtures::character("u1");
    let id = character.id.clone();
    f.store.seed_character(character).await;

    for amount in [0, -5] {
        let (status, _) = send(
            &f.router,
            authed(
                "POST",
                &format!("/v1/characters/{id}/xp"),
                Some(json!({"amount": amount})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn gateway_callback_grants_by_user() {
    let f = fixture();
    f.store.seed_character(fixtures::character("u7")).await;

    let (status, body) = send(
        &f.router,
        authed("POST", "/v1/characters/user/u7/xp", Some(json!({"amount": 40}))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["leveled_up"], false);
    assert_eq!(body["character"]["xp"], 40);

    let (status, body) = send(
        &f.router,
        authed("POST", "/v1/characters/user/ghost/xp", Some(json!({"amount": 40}))),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn overspending_points_is_bad_request() {
    let f = fixture();
    let character = fixtures::character("u1");
    let id = character.id.clone();
    f.store.seed_character(character).await;

    let (status, _) = send(
        &f.router,
        authed(
            "POST",
            &format!("/v1/characters/{id}/spend-points"),
            Some(json!({"strength": 4, "mana": 4})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &f.router,
        authed(
            "POST",
            &format!("/v1/characters/{id}/spend-points"),
            Some(json!({"strength": 3, "mana": 2})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["attribute_points"], 0);
    assert_eq!(body["attributes"]["strength"], 13);
}

#[tokio::test]
async fn quest_lifecycle_over_http() {
    let f = fixture();
    let character = fixtures::character("u1");
    let character_id = character.id.clone();
    f.store.seed_character(character).await;

    let (status, quest) = send(
        &f.router,
        authed(
            "POST",
            "/v1/quests",
            Some(json!({"user_id": "u1", "title": "Run 5k", "xp_reward": 150})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(quest["status"], "in_progress");
    let quest_id = quest["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &f.router,
        authed(
            "PUT",
            &format!("/v1/quests/{quest_id}"),
            Some(json!({"description": "Before breakfast"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["description"], "Before breakfast");
    assert_eq!(updated["title"], "Run 5k");

    let (status, listed) = send(&f.router, authed("GET", "/v1/quests/user/u1", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let complete = format!("/v1/quests/{quest_id}/complete");
    let (status, done) = send(&f.router, authed("POST", &complete, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["status"], "completed");

    // Second completion grants nothing.
    let (status, _) = send(&f.router, authed("POST", &complete, None)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, character) = send(
        &f.router,
        authed("GET", &format!("/v1/characters/{character_id}"), None),
    )
    .await;
    assert_eq!(character["level"], 2);
    assert_eq!(character["xp"], 50);
}

#[tokio::test]
async fn missing_quest_is_not_found() {
    let f = fixture();
    let (status, body) = send(&f.router, authed("POST", "/v1/quests/nope/complete", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("nope"));
}

#[tokio::test]
async fn storage_failure_is_generic_500() {
    let f = fixture();
    f.store.fail(FailPoint::Reads).await;
    let (status, body) = send(&f.router, authed("GET", "/v1/characters/c1", None)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "internal server error");
}

#[tokio::test]
async fn entry_edit_schedules_both_analyses() {
    let f = fixture();
    let (status, entry) = send(
        &f.router,
        authed(
            "PUT",
            "/v1/entries/e1",
            Some(json!({"user_id": "u1", "title": "Monday", "content": "Ran 5k"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entry["content"], "Ran 5k");

    assert!(f.gateway.wait_for_calls(2, Duration::from_secs(2)).await);
    assert_eq!(f.gateway.calls_of(AnalysisKind::Xp).await, 1);
    assert_eq!(f.gateway.calls_of(AnalysisKind::Quests).await, 1);

    let (status, fetched) = send(&f.router, authed("GET", "/v1/entries/e1", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Monday");

    // Another user's entry is hidden.
    let (status, _) = send(
        &f.router,
        authed("PUT", "/v1/entries/e1", Some(json!({"user_id": "u2", "content": "x"}))),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    f.dispatcher.shutdown().await;
}

#[tokio::test]
async fn malformed_body_gets_json_error() {
    let f = fixture();
    let (status, body) = send(
        &f.router,
        authed("POST", "/v1/characters", Some(json!({"name": "Aria", "class": "mage"}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("user_id"));

    let (status, body) = send(
        &f.router,
        authed("POST", "/v1/characters/c1/xp", Some(json!({"amount": "lots"}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let request = Request::builder()
        .method("PUT")
        .uri("/v1/entries/e1")
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .body(Body::from(r#"{"user_id": "u1""#))
        .unwrap();
    let (status, body) = send(&f.router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}
