//! Test fixtures and data generators
//!
//! Command and request bodies shared by the integration tests.

use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// A meeting id no other test uses
pub fn unique_meeting() -> String {
    format!("meeting-{}", unique_suffix())
}

pub fn add_candidate(meeting_id: &str, place_id: &str, name: &str, lat: f64, lng: f64) -> Value {
    json!({
        "type": "add-candidate",
        "meetingId": meeting_id,
        "placeId": place_id,
        "name": name,
        "category": "cafe",
        "lat": lat,
        "lng": lng,
        "rating": 4.5,
    })
}

pub fn remove_candidate(meeting_id: &str, place_id: &str) -> Value {
    json!({ "type": "remove-candidate", "meetingId": meeting_id, "placeId": place_id })
}

pub fn cast_vote(meeting_id: &str, place_id: &str) -> Value {
    json!({ "type": "cast-vote", "meetingId": meeting_id, "placeId": place_id })
}

pub fn post_message(meeting_id: &str, content: &str) -> Value {
    json!({ "type": "post-message", "meetingId": meeting_id, "content": content })
}

pub fn start_game(meeting_id: &str, game_id: &str, target: f64) -> Value {
    json!({
        "type": "start-game",
        "meetingId": meeting_id,
        "gameId": game_id,
        "kind": "timing",
        "targetValue": target,
    })
}

pub fn join_game(meeting_id: &str) -> Value {
    json!({ "type": "join-game", "meetingId": meeting_id })
}

pub fn submit_result(meeting_id: &str, value: f64) -> Value {
    json!({ "type": "submit-game-result", "meetingId": meeting_id, "value": value })
}

/// A participant entry of a recommendation request
pub fn participant(id: &str, lat: f64, lng: f64, categories: &[&str]) -> Value {
    json!({
        "id": id,
        "name": id,
        "lat": lat,
        "lng": lng,
        "categories": categories,
        "transport": "transit",
    })
}

/// A venue supplied by the caller instead of a places search
pub fn venue(place_id: &str, category: &str, lat: f64, lng: f64, rating: f64) -> Value {
    json!({
        "placeId": place_id,
        "name": place_id,
        "category": category,
        "coordinates": { "lat": lat, "lng": lng },
        "rating": rating,
        "priceLevel": 2,
    })
}
