//! Venue and participant types consumed by the recommender

use serde::{Deserialize, Serialize};

use crate::value_objects::{Coordinates, PlaceId, TravelMode, UserId};

/// A venue returned by the places provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    pub place_id: PlaceId,
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub coordinates: Coordinates,
    /// Rating on a 0-5 scale
    #[serde(default)]
    pub rating: Option<f64>,
    /// Price level on a 0-4 scale
    #[serde(default)]
    pub price_level: Option<u8>,
}

/// One participant's own constraints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantPreferences {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub transport: Option<TravelMode>,
    #[serde(default)]
    pub max_distance_km: Option<f64>,
}

/// A participant taking part in the location search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    pub location: Coordinates,
    #[serde(default)]
    pub preferences: ParticipantPreferences,
}

impl Participant {
    pub fn new(id: impl Into<UserId>, location: Coordinates) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            location,
            preferences: ParticipantPreferences::default(),
        }
    }

    pub fn with_preferences(mut self, preferences: ParticipantPreferences) -> Self {
        self.preferences = preferences;
        self
    }
}
