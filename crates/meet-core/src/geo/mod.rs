//! Geometric helpers used by the recommender
//!
//! Distances here are city-scale, so the centroid is a plain arithmetic mean
//! of latitudes and longitudes rather than a geodesic centre.

use crate::value_objects::{Coordinates, TravelMode};

/// Mean earth radius in kilometres
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Arithmetic mean of a set of points, `None` for an empty slice
pub fn centroid(points: &[Coordinates]) -> Option<Coordinates> {
    if points.is_empty() {
        return None;
    }

    let n = points.len() as f64;
    let (lat, lng) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lng), p| (lat + p.lat, lng + p.lng));

    Some(Coordinates {
        lat: lat / n,
        lng: lng / n,
    })
}

/// Great-circle distance between two points in kilometres
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Travel minutes for a distance at the mode's average speed
pub fn estimate_travel_minutes(distance_km: f64, mode: TravelMode) -> f64 {
    distance_km / mode.speed_kmh() * 60.0
}

/// Straight-line travel estimate between two points
pub fn fallback_travel_minutes(origin: Coordinates, destination: Coordinates, mode: TravelMode) -> f64 {
    estimate_travel_minutes(haversine_km(origin, destination), mode)
}
