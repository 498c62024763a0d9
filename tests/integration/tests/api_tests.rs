//! REST Integration Tests
//!
//! Each test starts an in-memory server on an ephemeral port.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{assert_json, assert_status, fixtures::*, TestServer};
use reqwest::StatusCode;
use serde_json::{json, Value};

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(body["status"], "ok");
    assert_eq!(body["connections"], 0);
    assert_eq!(body["rooms"], 0);
    assert_eq!(body["games"], 0);
}

#[tokio::test]
async fn test_health_counts_connections() {
    let server = TestServer::start().await.expect("Failed to start server");
    let meeting = unique_meeting();
    let _client = server.connect_as("alice", &meeting).await.unwrap();

    let response = server.get("/health").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["connections"], 1);
    assert_eq!(body["rooms"], 1);
}

// ============================================================================
// Meeting Tests
// ============================================================================

#[tokio::test]
async fn test_register_meeting() {
    let server = TestServer::start().await.expect("Failed to start server");
    let meeting = unique_meeting();

    let response = server
        .put(&format!("/meetings/{meeting}"), &json!({ "organizerId": "alice" }))
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["data"]["id"], meeting.as_str());

    // same organizer again is a no-op
    server.register_meeting(&meeting, "alice").await.unwrap();

    let response = server
        .put(&format!("/meetings/{meeting}"), &json!({ "organizerId": "bob" }))
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(body["error"]["code"], "MEETING_ALREADY_EXISTS");
}

#[tokio::test]
async fn test_register_meeting_validation() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .put("/meetings/m-invalid", &json!({ "organizerId": "" }))
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["details"].is_object());
}

#[tokio::test]
async fn test_unknown_meeting() {
    let server = TestServer::start().await.expect("Failed to start server");

    for path in ["candidates", "tally", "messages", "selections"] {
        let response = server
            .get(&format!("/meetings/never-registered/{path}"))
            .await
            .unwrap();
        let body: Value = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
        assert_eq!(body["error"]["code"], "UNKNOWN_MEETING", "{path}");
    }
}

#[tokio::test]
async fn test_empty_meeting_views() {
    let server = TestServer::start().await.expect("Failed to start server");
    let meeting = unique_meeting();
    server.register_meeting(&meeting, "alice").await.unwrap();

    let response = server.get(&format!("/meetings/{meeting}/candidates")).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["data"], json!([]));

    let response = server.get(&format!("/meetings/{meeting}/tally")).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["data"], json!({}));

    let response = server.get(&format!("/meetings/{meeting}/game")).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn test_message_limit_is_validated() {
    let server = TestServer::start().await.expect("Failed to start server");
    let meeting = unique_meeting();
    server.register_meeting(&meeting, "alice").await.unwrap();

    let response = server
        .get(&format!("/meetings/{meeting}/messages?limit=500"))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server
        .get(&format!("/meetings/{meeting}/messages?limit=abc"))
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body["error"]["code"], "INVALID_QUERY_PARAMETER");
}

#[tokio::test]
async fn test_rest_reflects_socket_commands() {
    let server = TestServer::start().await.expect("Failed to start server");
    let meeting = unique_meeting();
    server.register_meeting(&meeting, "alice").await.unwrap();

    let mut alice = server.connect_as("alice", &meeting).await.unwrap();
    let (ack, _) = alice
        .command(add_candidate(&meeting, "cafe-1", "Cafe One", 37.5665, 126.9780))
        .await
        .unwrap();
    assert_eq!(ack["ok"], true, "{ack}");
    let (ack, _) = alice.command(cast_vote(&meeting, "cafe-1")).await.unwrap();
    assert_eq!(ack["ok"], true, "{ack}");
    let (ack, _) = alice.command(post_message(&meeting, "see you there")).await.unwrap();
    assert_eq!(ack["ok"], true, "{ack}");

    let response = server.get(&format!("/meetings/{meeting}/tally")).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    let voters = body["data"]["cafe-1"].as_array().unwrap();
    assert_eq!(voters.len(), 1);
    assert_eq!(voters[0]["voterId"], "alice");

    let response = server
        .get(&format!("/meetings/{meeting}/messages?limit=10"))
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["content"], "see you there");
}

// ============================================================================
// Recommendation Tests
// ============================================================================

#[tokio::test]
async fn test_recommendations_with_supplied_venues() {
    let server = TestServer::start().await.expect("Failed to start server");
    let meeting = unique_meeting();

    let request = json!({
        "participants": [
            participant("alice", 37.5665, 126.9780, &["cafe"]),
            participant("bob", 37.5700, 126.9850, &["cafe"]),
        ],
        "venues": [
            venue("far-bar", "bar", 37.6000, 127.0500, 3.0),
            venue("near-cafe", "cafe", 37.5680, 126.9815, 4.5),
        ],
    });

    let response = server
        .post(&format!("/meetings/{meeting}/recommendations"), &request)
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();

    let venues = body["data"]["venues"].as_array().unwrap();
    assert_eq!(venues.len(), 2);
    assert_eq!(venues[0]["venue"]["placeId"], "near-cafe");
    assert!(venues[0]["score"].as_f64().unwrap() > venues[1]["score"].as_f64().unwrap());
    assert_eq!(venues[0]["travel"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_recommendations_need_participants() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .post(
            "/meetings/m-empty/recommendations",
            &json!({ "participants": [] }),
        )
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_recommendations_without_places_provider() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .post(
            "/meetings/m-search/recommendations",
            &json!({ "participants": [participant("alice", 37.5665, 126.9780, &[])] }),
        )
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::SERVICE_UNAVAILABLE)
        .await
        .unwrap();
    assert_eq!(body["error"]["code"], "UNAVAILABLE");
}
