//! Places provider used when no external search/routing API is configured

use async_trait::async_trait;

use meet_core::{
    Coordinates, DomainError, PlacesProvider, TravelEstimate, TravelMode, Venue,
};

/// Provider that is always unavailable
///
/// Searches fail with `UpstreamUnavailable`; travel lookups fail too, so
/// callers fall back to straight-line estimates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPlacesProvider;

#[async_trait]
impl PlacesProvider for NullPlacesProvider {
    async fn search_nearby(
        &self,
        _center: Coordinates,
        _radius_km: f64,
        _category: Option<&str>,
    ) -> Result<Vec<Venue>, DomainError> {
        Err(DomainError::UpstreamUnavailable(
            "no places provider configured".to_string(),
        ))
    }

    async fn travel_time(
        &self,
        _origin: Coordinates,
        _destination: Coordinates,
        _mode: TravelMode,
    ) -> Result<TravelEstimate, DomainError> {
        Err(DomainError::UpstreamUnavailable(
            "no routing provider configured".to_string(),
        ))
    }
}
