//! REST API tests against a live server: health, station CRUD, and the
//! realtime management endpoints.

#![allow(clippy::panic, clippy::expect_used, clippy::indexing_slicing)]

mod common;

use common::TestServer;
use reqwest::StatusCode;
use serde_json::{Value, json};
use station_gateway::ws::messages::ClientCommand;

async fn get_json(client: &reqwest::Client, url: String) -> (StatusCode, Value) {
    let resp = client.get(url).send().await.expect("request");
    let status = resp.status();
    (status, resp.json().await.expect("json body"))
}

async fn post_json(client: &reqwest::Client, url: String, body: Value) -> (StatusCode, Value) {
    let resp = client.post(url).json(&body).send().await.expect("request");
    let status = resp.status();
    (status, resp.json().await.expect("json body"))
}

#[tokio::test]
async fn health_reports_memory_backend() {
    let server = TestServer::start(1).await;
    let client = reqwest::Client::new();
    let (status, body) = get_json(&client, server.url("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["station_store"], "memory");
}

#[tokio::test]
async fn station_crud_roundtrip() {
    let server = TestServer::start(2).await;
    let client = reqwest::Client::new();

    let (status, body) = get_json(&client, server.url("/api/v1/stations")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    let draft = json!({
        "name": "Marrakech",
        "city": "Marrakech",
        "latitude": 31.63,
        "longitude": -8.01,
        "phone": "+212 5 24 44 77 68",
    });
    let (status, created) = post_json(&client, server.url("/api/v1/stations"), draft).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 3);

    let resp = client
        .put(server.url("/api/v1/stations/3"))
        .json(&json!({
            "name": "Marrakech Gare",
            "city": "Marrakech",
            "latitude": 31.63,
            "longitude": -8.01,
        }))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::OK);

    let (status, fetched) = get_json(&client, server.url("/api/v1/stations/3")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Marrakech Gare");

    let resp = client
        .delete(server.url("/api/v1/stations/3"))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::OK);

    let (status, body) = get_json(&client, server.url("/api/v1/stations/3")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], 2001);
}

#[tokio::test]
async fn invalid_station_is_rejected() {
    let server = TestServer::start(0).await;
    let client = reqwest::Client::new();
    let (status, body) = post_json(
        &client,
        server.url("/api/v1/stations"),
        json!({"name": "", "city": "Rabat", "latitude": 34.0, "longitude": -6.8}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 1001);

    let (status, _) = get_json(&client, server.url("/api/v1/stations/0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn connection_stats_track_ws_clients() {
    let server = TestServer::start(3).await;
    let http = reqwest::Client::new();
    let mut a = server.client().await;
    let mut b = server.client().await;
    let _c = server.client().await;

    for (client, topics) in [(&mut a, vec![1, 2, 3]), (&mut b, vec![1, 2])] {
        for id in topics {
            client.send("join-station", json!(id)).await;
            let _ack = client.recv().await;
        }
    }

    let (status, body) = get_json(&http, server.url("/api/v1/realtime/connections")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_connections"], 3);
    assert_eq!(body["active_subscriptions"], 5);
    assert_eq!(body["active_trains"], 0);
}

#[tokio::test]
async fn manual_updates_reach_their_targets() {
    let server = TestServer::start(2).await;
    let http = reqwest::Client::new();
    let mut member = server.client().await;
    let mut bystander = server.client().await;
    member.send("join-station", json!(1)).await;
    let _ack = member.recv().await;

    let (status, body) = post_json(
        &http,
        server.url("/api/v1/realtime/notify-station"),
        json!({"station_id": 1, "message": "platform change"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["delivered"], 1);
    assert_eq!(body["target"], "station");

    let msg = member.recv().await;
    assert_eq!(msg["event"], "manual-update");
    assert_eq!(msg["source"], "manual");
    assert_eq!(msg["station_id"], 1);
    assert_eq!(msg["data"]["message"], "platform change");

    let (status, body) = post_json(
        &http,
        server.url("/api/v1/realtime/broadcast"),
        json!({"event": "maintenance", "message": "network maintenance at 02:00"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["delivered"], 2);
    assert_eq!(member.recv().await["event"], "manual-update");
    let msg = bystander.recv().await;
    assert_eq!(msg["event"], "manual-update");
    assert_eq!(msg["data"]["event"], "maintenance");
}

#[tokio::test]
async fn trigger_update_validates_targets() {
    let server = TestServer::start(1).await;
    let http = reqwest::Client::new();

    let (status, _) = post_json(
        &http,
        server.url("/api/v1/realtime/trigger-update"),
        json!({"type": "station", "data": {"message": "no id"}}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_json(
        &http,
        server.url("/api/v1/realtime/trigger-update"),
        json!({"type": "whatever", "data": {"message": "hello"}}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["target"], "system");
    assert_eq!(body["delivered"], 0);

    let (status, _) = post_json(
        &http,
        server.url("/api/v1/realtime/broadcast"),
        json!({"event": "x", "message": "  "}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn catalog_endpoints_describe_events() {
    let server = TestServer::start(1).await;
    let http = reqwest::Client::new();

    let (status, body) = get_json(&http, server.url("/api/v1/realtime/events")).await;
    assert_eq!(status, StatusCode::OK);
    let client_events: Vec<&str> = body["client_events"]
        .as_array()
        .map(|events| events.iter().filter_map(|e| e["name"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(client_events, ClientCommand::NAMES.to_vec());
    assert!(
        body["client_events"]
            .as_array()
            .is_some_and(|events| events.iter().all(|e| e["description"] != ""))
    );
    let server_events: Vec<&str> = body["server_events"]
        .as_array()
        .map(|events| events.iter().filter_map(|e| e["name"].as_str()).collect())
        .unwrap_or_default();
    assert!(server_events.contains(&"train-update"));
    assert!(server_events.contains(&"manual-update"));

    let (status, body) = get_json(&http, server.url("/api/v1/realtime/status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");
    assert_eq!(body["generator_enabled"], false);
    assert_eq!(body["endpoints"]["websocket"], "/ws");
}
