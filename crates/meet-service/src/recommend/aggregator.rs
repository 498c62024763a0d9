//! Merges participant preferences into one venue search profile

use serde::Serialize;

use meet_core::geo::centroid;
use meet_core::{Coordinates, DomainError, Participant, TravelMode};

/// How many categories a search uses at most
pub const MAX_SEARCH_CATEGORIES: usize = 3;

/// Where and for what to search
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchProfile {
    pub center: Coordinates,
    /// Most requested categories, normalised, most popular first
    pub categories: Vec<String>,
    pub radius_km: f64,
    pub travel_mode: TravelMode,
}

/// Stateless preference merger
pub struct PreferenceAggregator;

impl PreferenceAggregator {
    /// Build the search profile for a group
    ///
    /// The radius is the most restrictive stated maximum distance, or
    /// `default_radius_km` when nobody states one.
    pub fn aggregate(
        participants: &[Participant],
        default_radius_km: f64,
    ) -> Result<SearchProfile, DomainError> {
        let locations: Vec<Coordinates> = participants.iter().map(|p| p.location).collect();
        for location in &locations {
            location.validate()?;
        }
        let center = centroid(&locations).ok_or_else(|| {
            DomainError::ValidationError("at least one participant is required".to_string())
        })?;

        let categories = top_by_frequency(
            participants
                .iter()
                .flat_map(|p| p.preferences.categories.iter())
                .map(|c| normalize_category(c))
                .filter(|c| !c.is_empty()),
            MAX_SEARCH_CATEGORIES,
        );

        let radius_km = participants
            .iter()
            .filter_map(|p| p.preferences.max_distance_km)
            .filter(|d| d.is_finite() && *d > 0.0)
            .reduce(f64::min)
            .unwrap_or(default_radius_km);

        let travel_mode = top_by_frequency(
            participants.iter().filter_map(|p| p.preferences.transport),
            1,
        )
        .into_iter()
        .next()
        .unwrap_or_default();

        Ok(SearchProfile {
            center,
            categories,
            radius_km,
            travel_mode,
        })
    }
}

/// Lowercased and trimmed, so "Cafe " and "cafe" count together
pub fn normalize_category(category: &str) -> String {
    category.trim().to_lowercase()
}

/// The `limit` most frequent items; ties keep first-seen order
fn top_by_frequency<T: PartialEq>(items: impl Iterator<Item = T>, limit: usize) -> Vec<T> {
    let mut counts: Vec<(T, usize)> = Vec::new();
    for item in items {
        match counts.iter_mut().find(|(seen, _)| *seen == item) {
            Some((_, n)) => *n += 1,
            None => counts.push((item, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(limit).map(|(item, _)| item).collect()
}
