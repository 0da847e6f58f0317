//! API regression tests.
//!
//! Drives the full router the way the daemon serves it: roster management,
//! balance job submission, status polling and result retrieval.

use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use fairplay_api::{ApiState, RemainderPolicy, build_router};
use fairplay_core::{Attribute, BalanceConfig, Participant, SearchConfig};
use fairplay_roster::RosterStore;
use serde_json::{Value, json};
use tower::ServiceExt;

fn test_config() -> BalanceConfig {
    BalanceConfig {
        search: SearchConfig {
            attempt_budget: 2000,
            ..SearchConfig::default()
        },
        ..BalanceConfig::default()
    }
}

fn test_router(remainder: RemainderPolicy) -> (Router, RosterStore) {
    let store = RosterStore::open_in_memory().unwrap();
    let state = ApiState::new(store.clone(), test_config(), remainder);
    (build_router(state), store)
}

fn seed(store: &RosterStore) {
    let players: Vec<Participant> = [7, 6, 5, 5, 4, 4, 3, 1, 4]
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let attribute = if i % 2 == 0 { Attribute::High } else { Attribute::Low };
            Participant::new(format!("p{i}"), *r, attribute)
        })
        .collect();
    store.import(&players).unwrap();
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn read_json(resp: axum::response::Response) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn submit(router: &Router, players: &[&str], num_teams: i64) -> (StatusCode, Value) {
    let req = json_request(
        "POST",
        "/api/v1/balance",
        json!({ "players": players, "num_teams": num_teams }),
    );
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    (status, read_json(resp).await)
}

async fn wait_for_result(router: &Router, job_id: &str) -> (StatusCode, Value) {
    for _ in 0..500 {
        let resp = router
            .clone()
            .oneshot(get(&format!("/api/v1/balance/{job_id}/result")))
            .await
            .unwrap();
        if resp.status() != StatusCode::ACCEPTED {
            let status = resp.status();
            return (status, read_json(resp).await);
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {job_id} never finished");
}

#[tokio::test]
async fn healthz_responds() {
    let (router, _) = test_router(RemainderPolicy::Truncate);
    let resp = router.oneshot(get("/healthz")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn roster_crud_round() {
    let (router, _) = test_router(RemainderPolicy::Truncate);

    let req = json_request(
        "POST",
        "/api/v1/players",
        json!({ "players": [
            { "name": "Bruno", "rating": 3, "attribute": "low" },
            { "name": "Apoli", "rating": 6, "attribute": "high", "recurring": true },
        ]}),
    );
    let resp = router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = router.clone().oneshot(get("/api/v1/players")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Apoli", "Bruno"]);
    assert_eq!(body["data"][0]["recurring"], true);

    let req = json_request("PUT", "/api/v1/players/Bruno", json!({ "rating": 4 }));
    let resp = router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await;
    assert_eq!(body["data"]["rating"], 4);

    let req = Request::builder()
        .method("DELETE")
        .uri("/api/v1/players/Bruno")
        .body(Body::empty())
        .unwrap();
    let resp = router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let req = Request::builder()
        .method("DELETE")
        .uri("/api/v1/players/Bruno")
        .body(Body::empty())
        .unwrap();
    let resp = router.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_rating_is_bad_request() {
    let (router, store) = test_router(RemainderPolicy::Truncate);

    let req = json_request(
        "POST",
        "/api/v1/players",
        json!({ "players": [{ "name": "X", "rating": 0, "attribute": "low" }] }),
    );
    let resp = router.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = read_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(store.list_players().unwrap().is_empty());
}

#[tokio::test]
async fn taken_names_are_conflicts() {
    let (router, store) = test_router(RemainderPolicy::Truncate);
    seed(&store);

    let req = json_request(
        "POST",
        "/api/v1/players",
        json!({ "players": [{ "name": "p2", "rating": 1, "attribute": "low" }] }),
    );
    let resp = router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = json_request("PUT", "/api/v1/players/p3", json!({ "name": "p4" }));
    let resp = router.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body = read_json(resp).await;
    assert_eq!(body["success"], false);

    assert_eq!(store.list_players().unwrap().len(), 9);
    assert_eq!(store.get_player("p2").unwrap().unwrap().rating, 5);
    assert_eq!(store.get_player("p3").unwrap().unwrap().rating, 5);
    assert_eq!(store.get_player("p4").unwrap().unwrap().rating, 4);
}

#[tokio::test]
async fn balance_end_to_end() {
    let (router, store) = test_router(RemainderPolicy::Truncate);
    seed(&store);

    let players = ["p0", "p1", "p2", "p3", "p4", "p5", "p6", "p7"];
    let (status, body) = submit(&router, &players, 2).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let job_id = body["data"]["job_id"].as_str().unwrap().to_string();

    let (status, body) = wait_for_result(&router, &job_id).await;
    assert_eq!(status, StatusCode::OK);

    let options = body["data"]["options"].as_array().unwrap();
    assert_eq!(options.len(), 2);
    for option in options {
        let teams = option["teams"].as_array().unwrap();
        assert_eq!(teams.len(), 2);
        for team in teams {
            assert_eq!(team["players"].as_array().unwrap().len(), 4);
        }
        let s0 = teams[0]["strength"].as_f64().unwrap();
        let s1 = teams[1]["strength"].as_f64().unwrap();
        assert!((s0 - s1).abs() <= 1.0 + 1e-9);
    }

    let resp = router
        .oneshot(get(&format!("/api/v1/balance/{job_id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await;
    assert_eq!(body["data"]["status"], "done");
}

#[tokio::test]
async fn indivisible_roster_follows_remainder_policy() {
    let nine = ["p0", "p1", "p2", "p3", "p4", "p5", "p6", "p7", "p8"];

    let (router, store) = test_router(RemainderPolicy::Reject);
    seed(&store);
    let (status, body) = submit(&router, &nine, 2).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("divide evenly"));

    let (router, store) = test_router(RemainderPolicy::Truncate);
    seed(&store);
    let (status, body) = submit(&router, &nine, 2).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let job_id = body["data"]["job_id"].as_str().unwrap().to_string();

    let (status, body) = wait_for_result(&router, &job_id).await;
    assert_eq!(status, StatusCode::OK);
    let teams = body["data"]["options"][0]["teams"].as_array().unwrap();
    let placed: usize = teams
        .iter()
        .map(|t| t["players"].as_array().unwrap().len())
        .sum();
    assert_eq!(placed, 8);
}

#[tokio::test]
async fn failed_job_result_is_conflict() {
    let (router, store) = test_router(RemainderPolicy::Truncate);
    store
        .import(&[
            Participant::new("a", 7, Attribute::High),
            Participant::new("b", 1, Attribute::Low),
        ])
        .unwrap();

    let (status, body) = submit(&router, &["a", "b"], 2).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let job_id = body["data"]["job_id"].as_str().unwrap().to_string();

    let (status, body) = wait_for_result(&router, &job_id).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("no valid options"));

    let resp = router
        .oneshot(get(&format!("/api/v1/balance/{job_id}")))
        .await
        .unwrap();
    let body = read_json(resp).await;
    assert_eq!(body["data"]["status"], "failed");
}

#[tokio::test]
async fn balance_with_unknown_player_is_not_found() {
    let (router, store) = test_router(RemainderPolicy::Truncate);
    seed(&store);

    let (status, body) = submit(&router, &["p0", "ghost"], 1).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("ghost"));
}

#[tokio::test]
async fn unknown_job_is_not_found() {
    let (router, _) = test_router(RemainderPolicy::Truncate);
    let resp = router
        .oneshot(get("/api/v1/balance/00000000-0000-0000-0000-000000000000/result"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn roster_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("roster.redb");

    {
        let store = RosterStore::open(&db_path).unwrap();
        let router = build_router(ApiState::new(
            store,
            test_config(),
            RemainderPolicy::Truncate,
        ));
        let req = json_request(
            "POST",
            "/api/v1/players",
            json!({ "players": [{ "name": "Romero", "rating": 3, "attribute": "low" }] }),
        );
        let resp = router.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let store = RosterStore::open(&db_path).unwrap();
    assert_eq!(store.get_player("Romero").unwrap().unwrap().rating, 3);
}
