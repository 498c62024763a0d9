//! Location value objects - coordinates and travel modes

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// A WGS84 point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create validated coordinates
    pub fn new(lat: f64, lng: f64) -> Result<Self, DomainError> {
        let coords = Self { lat, lng };
        coords.validate()?;
        Ok(coords)
    }

    /// Check latitude/longitude ranges
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(DomainError::ValidationError(format!(
                "latitude out of range: {}",
                self.lat
            )));
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err(DomainError::ValidationError(format!(
                "longitude out of range: {}",
                self.lng
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lng)
    }
}

/// How a participant travels to the venue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Walking,
    #[default]
    Transit,
    Driving,
}

impl TravelMode {
    /// Average speed used for straight-line estimates, in km/h
    pub const fn speed_kmh(self) -> f64 {
        match self {
            Self::Walking => 5.0,
            Self::Transit => 25.0,
            Self::Driving => 40.0,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Walking => "walking",
            Self::Transit => "transit",
            Self::Driving => "driving",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
