//! Gateway Integration Tests
//!
//! Drive the WebSocket protocol end to end: Hello, Identify, rooms,
//! commands, broadcasts and close codes.
//!
//! Run with: cargo test -p integration-tests --test gateway_tests

use integration_tests::{fixtures::*, TestServer};
use serde_json::json;

// ============================================================================
// Handshake and Close Codes
// ============================================================================

#[tokio::test]
async fn test_hello_then_identify() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect().await.unwrap();

    let ack = client.identify("alice", "Alice").await.unwrap();
    assert_eq!(ack["ok"], true);
    assert_eq!(ack["data"]["user"]["id"], "alice");
    assert_eq!(ack["data"]["user"]["name"], "Alice");
    assert!(ack["data"]["sessionId"].as_str().is_some());
}

#[tokio::test]
async fn test_join_before_identify_closes() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.send_op(3, json!({ "meetingId": "m1" })).await.unwrap();
    assert_eq!(client.expect_close().await.unwrap(), 4003);
}

#[tokio::test]
async fn test_unknown_opcode_closes() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.send_op(42, json!({})).await.unwrap();
    assert_eq!(client.expect_close().await.unwrap(), 4001);
}

#[tokio::test]
async fn test_server_opcode_from_client_closes() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.send_op(10, json!({ "heartbeatInterval": 1 })).await.unwrap();
    assert_eq!(client.expect_close().await.unwrap(), 4001);
}

#[tokio::test]
async fn test_malformed_json_closes() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.send_text("{not json").await.unwrap();
    assert_eq!(client.expect_close().await.unwrap(), 4002);
}

#[tokio::test]
async fn test_identify_twice_closes() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect().await.unwrap();
    client.identify("alice", "Alice").await.unwrap();

    client
        .send_op(2, json!({ "userId": "alice" }))
        .await
        .unwrap();
    assert_eq!(client.expect_close().await.unwrap(), 4005);
}

#[tokio::test]
async fn test_heartbeat_ack() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.send_text(r#"{"op":1}"#).await.unwrap();
    let frame = client.recv().await.unwrap();
    assert_eq!(frame["op"], 11);
}

#[tokio::test]
async fn test_disconnect_releases_connection() {
    let server = TestServer::start().await.unwrap();
    let meeting = unique_meeting();
    let client = server.connect_as("alice", &meeting).await.unwrap();
    assert_eq!(server.state.connections().connection_count(), 1);

    drop(client);
    for _ in 0..50 {
        if server.state.connections().connection_count() == 0 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    assert_eq!(server.state.connections().connection_count(), 0);
    assert_eq!(server.state.rooms().room_count(), 0);
}

// ============================================================================
// Consensus Broadcasts
// ============================================================================

#[tokio::test]
async fn test_join_room_returns_state() {
    let server = TestServer::start().await.unwrap();
    let meeting = unique_meeting();
    server.register_meeting(&meeting, "alice").await.unwrap();

    let mut alice = server.connect().await.unwrap();
    alice.identify("alice", "Alice").await.unwrap();
    let ack = alice.join(&meeting).await.unwrap();

    assert_eq!(ack["ok"], true);
    assert_eq!(ack["data"]["meetingId"], meeting.as_str());
    assert_eq!(ack["data"]["members"], 1);
    assert_eq!(ack["data"]["candidates"], json!([]));
    assert_eq!(ack["data"]["tally"], json!({}));
    assert!(ack["data"]["game"].is_null());
}

#[tokio::test]
async fn test_vote_is_broadcast_to_room() {
    let server = TestServer::start().await.unwrap();
    let meeting = unique_meeting();
    server.register_meeting(&meeting, "alice").await.unwrap();

    let mut alice = server.connect_as("alice", &meeting).await.unwrap();
    let mut bob = server.connect_as("bob", &meeting).await.unwrap();

    let (ack, events) = alice
        .command(add_candidate(&meeting, "cafe-1", "Cafe One", 37.5665, 126.9780))
        .await
        .unwrap();
    assert_eq!(ack["ok"], true, "{ack}");
    assert_eq!(ack["nonce"], "test");
    // the sender is a room member too
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["t"], "candidate-added");

    let added = bob.recv_event("candidate-added").await.unwrap();
    assert_eq!(added["d"]["candidate"]["placeId"], "cafe-1");
    let first_seq = added["s"].as_u64().unwrap();

    let (ack, _) = bob.command(cast_vote(&meeting, "cafe-1")).await.unwrap();
    assert_eq!(ack["data"]["action"], "cast");

    let vote = alice.recv_event("vote-updated").await.unwrap();
    assert_eq!(vote["d"]["voterId"], "bob");
    assert_eq!(vote["d"]["tally"]["cafe-1"][0]["voterId"], "bob");
    assert_eq!(vote["s"].as_u64().unwrap(), first_seq + 1);

    // voting again for the same place retracts
    let (ack, _) = bob.command(cast_vote(&meeting, "cafe-1")).await.unwrap();
    assert_eq!(ack["data"]["action"], "retracted");
    let vote = alice.recv_event("vote-updated").await.unwrap();
    assert_eq!(vote["d"]["tally"], json!({}));
}

#[tokio::test]
async fn test_events_stay_in_their_room() {
    let server = TestServer::start().await.unwrap();
    let first = unique_meeting();
    let second = unique_meeting();
    server.register_meeting(&first, "alice").await.unwrap();
    server.register_meeting(&second, "bob").await.unwrap();

    let mut alice = server.connect_as("alice", &first).await.unwrap();
    let mut bob = server.connect_as("bob", &second).await.unwrap();

    let (ack, _) = alice
        .command(post_message(&first, "hello first room"))
        .await
        .unwrap();
    assert_eq!(ack["ok"], true);

    bob.expect_silence().await.unwrap();
}

#[tokio::test]
async fn test_removal_by_stranger_is_rejected() {
    let server = TestServer::start().await.unwrap();
    let meeting = unique_meeting();
    server.register_meeting(&meeting, "alice").await.unwrap();

    let mut alice = server.connect_as("alice", &meeting).await.unwrap();
    let mut mallory = server.connect_as("mallory", &meeting).await.unwrap();

    alice
        .command(add_candidate(&meeting, "cafe-1", "Cafe One", 37.5665, 126.9780))
        .await
        .unwrap();

    let (ack, _) = mallory
        .command(remove_candidate(&meeting, "cafe-1"))
        .await
        .unwrap();
    assert_eq!(ack["ok"], false);
    assert_eq!(ack["error"]["code"], "FORBIDDEN");

    let (ack, events) = alice
        .command(remove_candidate(&meeting, "cafe-1"))
        .await
        .unwrap();
    assert_eq!(ack["ok"], true, "{ack}");
    assert!(events.iter().any(|e| e["t"] == "candidate-removed"));
}

#[tokio::test]
async fn test_command_on_unknown_meeting_is_acked() {
    let server = TestServer::start().await.unwrap();
    let mut alice = server.connect_as("alice", "ghost").await.unwrap();

    let (ack, events) = alice.command(cast_vote("ghost", "cafe-1")).await.unwrap();
    assert_eq!(ack["ok"], false);
    assert_eq!(ack["error"]["code"], "UNKNOWN_MEETING");
    assert!(events.is_empty());

    // the connection stays usable
    alice.send_text(r#"{"op":1}"#).await.unwrap();
    assert_eq!(alice.recv().await.unwrap()["op"], 11);
}

// ============================================================================
// Mini-game
// ============================================================================

#[tokio::test]
async fn test_game_round() {
    let server = TestServer::start().await.unwrap();
    let meeting = unique_meeting();

    let mut alice = server.connect_as("alice", &meeting).await.unwrap();
    let mut bob = server.connect_as("bob", &meeting).await.unwrap();

    // game-started is not echoed to the starter
    let (ack, events) = alice
        .command(start_game(&meeting, "g1", 5.0))
        .await
        .unwrap();
    assert_eq!(ack["data"]["status"], "started");
    assert!(events.iter().all(|e| e["t"] != "game-started"));

    let started = bob.recv_event("game-started").await.unwrap();
    assert_eq!(started["d"]["session"]["gameId"], "g1");

    let (ack, _) = alice.command(join_game(&meeting)).await.unwrap();
    assert_eq!(ack["data"]["status"], "joined");
    let (ack, _) = bob.command(join_game(&meeting)).await.unwrap();
    assert_eq!(ack["data"]["status"], "joined");

    let (ack, events) = alice.command(submit_result(&meeting, 5.2)).await.unwrap();
    assert_eq!(ack["data"]["status"], "recorded");
    assert!(events.iter().all(|e| e["t"] != "game-player-result"));

    let result = bob.recv_event("game-player-result").await.unwrap();
    assert_eq!(result["d"]["playerId"], "alice");
    assert_eq!(result["d"]["submittedCount"], 1);
    assert_eq!(result["d"]["playerCount"], 2);

    let (ack, _) = bob.command(submit_result(&meeting, 4.5)).await.unwrap();
    assert_eq!(ack["data"]["status"], "recorded");

    let finished = alice.recv_event("game-finished").await.unwrap();
    let ranking = finished["d"]["ranking"].as_array().unwrap();
    assert_eq!(ranking.len(), 2);
    assert_eq!(ranking[0]["playerId"], "alice");
    assert_eq!(ranking[0]["rank"], 1);

    // a second submission is ignored
    let (ack, _) = alice.command(submit_result(&meeting, 5.0)).await.unwrap();
    assert_ne!(ack["data"]["status"], "recorded");
}

#[tokio::test]
async fn test_game_reset_without_game() {
    let server = TestServer::start().await.unwrap();
    let meeting = unique_meeting();
    let mut alice = server.connect_as("alice", &meeting).await.unwrap();

    let (ack, events) = alice
        .command(json!({ "type": "reset-game", "meetingId": meeting }))
        .await
        .unwrap();
    assert_eq!(ack["data"]["status"], "reset");
    assert!(events.iter().any(|e| e["t"] == "game-reset"));
}
