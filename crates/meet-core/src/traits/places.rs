//! Places/directions provider port
//!
//! Implemented outside this workspace by whatever third-party search and
//! routing API is in use. Either call may fail; callers decide the fallback.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::entities::Venue;
use crate::error::DomainError;
use crate::value_objects::{Coordinates, TravelMode};

/// A travel duration/distance pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelEstimate {
    pub duration_minutes: f64,
    pub distance_km: f64,
}

#[async_trait]
pub trait PlacesProvider: Send + Sync {
    /// Search venues around a point
    async fn search_nearby(
        &self,
        center: Coordinates,
        radius_km: f64,
        category: Option<&str>,
    ) -> Result<Vec<Venue>, DomainError>;

    /// Route duration between two points
    async fn travel_time(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        mode: TravelMode,
    ) -> Result<TravelEstimate, DomainError>;
}
