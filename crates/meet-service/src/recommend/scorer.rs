//! Venue scoring
//!
//! `score = 0.40·time + 0.25·rating + 0.20·category + 0.15·price`, each
//! component on a 0-100 scale. Pure and deterministic: equal inputs give equal
//! scores and ordering, and equal scores keep input order.

use serde::Serialize;

use meet_core::geo::{fallback_travel_minutes, haversine_km};
use meet_core::{Participant, TravelMode, UserId, Venue};

use super::aggregator::normalize_category;

pub const TIME_WEIGHT: f64 = 0.40;
pub const RATING_WEIGHT: f64 = 0.25;
pub const CATEGORY_WEIGHT: f64 = 0.20;
pub const PRICE_WEIGHT: f64 = 0.15;

/// Price level assumed for venues that do not report one
pub const DEFAULT_PRICE_LEVEL: u8 = 2;

/// One participant's trip to a venue
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelTime {
    pub participant_id: UserId,
    pub minutes: f64,
    pub distance_km: f64,
    /// True when derived from straight-line distance instead of a route
    pub estimated: bool,
}

impl TravelTime {
    /// Straight-line estimate at the mode's average speed
    pub fn fallback(participant: &Participant, venue: &Venue, mode: TravelMode) -> Self {
        Self {
            participant_id: participant.id.clone(),
            minutes: fallback_travel_minutes(participant.location, venue.coordinates, mode),
            distance_km: haversine_km(participant.location, venue.coordinates),
            estimated: true,
        }
    }
}

/// A venue together with every participant's trip to it
#[derive(Debug, Clone, PartialEq)]
pub struct VenueTravel {
    pub venue: Venue,
    pub travel: Vec<TravelTime>,
}

/// Per-component scores, each 0-100
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub time: f64,
    pub rating: f64,
    pub category: f64,
    pub price: f64,
}

/// A ranked venue
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredVenue {
    pub venue: Venue,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    pub avg_travel_minutes: f64,
    pub max_travel_minutes: f64,
    pub travel: Vec<TravelTime>,
}

/// Stateless venue scorer
pub struct LocationScorer;

impl LocationScorer {
    /// Score and sort venues, best first
    pub fn score(candidates: Vec<VenueTravel>, preferred_categories: &[String]) -> Vec<ScoredVenue> {
        let preferred: Vec<String> = preferred_categories
            .iter()
            .map(|c| normalize_category(c))
            .collect();

        let mut scored: Vec<ScoredVenue> = candidates
            .into_iter()
            .map(|candidate| Self::score_one(candidate, &preferred))
            .collect();

        // sort_by is stable, so equal scores keep candidate order
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored
    }

    /// Score venues using straight-line travel estimates only
    pub fn score_estimated(
        venues: Vec<Venue>,
        participants: &[Participant],
        default_mode: TravelMode,
        preferred_categories: &[String],
    ) -> Vec<ScoredVenue> {
        let candidates = venues
            .into_iter()
            .map(|venue| {
                let travel = participants
                    .iter()
                    .map(|p| {
                        let mode = p.preferences.transport.unwrap_or(default_mode);
                        TravelTime::fallback(p, &venue, mode)
                    })
                    .collect();
                VenueTravel { venue, travel }
            })
            .collect();
        Self::score(candidates, preferred_categories)
    }

    fn score_one(candidate: VenueTravel, preferred: &[String]) -> ScoredVenue {
        let VenueTravel { venue, travel } = candidate;

        let (avg, max) = travel_stats(&travel);
        let breakdown = ScoreBreakdown {
            time: time_score(avg, max),
            rating: rating_score(venue.rating),
            category: category_score(&venue.category, preferred),
            price: price_score(venue.price_level),
        };
        let score = TIME_WEIGHT * breakdown.time
            + RATING_WEIGHT * breakdown.rating
            + CATEGORY_WEIGHT * breakdown.category
            + PRICE_WEIGHT * breakdown.price;

        ScoredVenue {
            venue,
            score,
            breakdown,
            avg_travel_minutes: avg,
            max_travel_minutes: max,
            travel,
        }
    }
}

fn travel_stats(travel: &[TravelTime]) -> (f64, f64) {
    if travel.is_empty() {
        return (0.0, 0.0);
    }
    let total: f64 = travel.iter().map(|t| t.minutes).sum();
    let max = travel.iter().map(|t| t.minutes).fold(0.0, f64::max);
    (total / travel.len() as f64, max)
}

/// Penalises both the mean and the worst commute
pub fn time_score(avg_minutes: f64, max_minutes: f64) -> f64 {
    (100.0 - 2.0 * avg_minutes - 0.5 * max_minutes).max(0.0)
}

pub fn rating_score(rating: Option<f64>) -> f64 {
    rating.map_or(0.0, |r| r.clamp(0.0, 5.0) * 20.0)
}

pub fn category_score(category: &str, preferred: &[String]) -> f64 {
    let category = normalize_category(category);
    if !category.is_empty() && preferred.iter().any(|p| *p == category) {
        100.0
    } else {
        50.0
    }
}

pub fn price_score(price_level: Option<u8>) -> f64 {
    let level = f64::from(price_level.unwrap_or(DEFAULT_PRICE_LEVEL));
    (100.0 - 20.0 * level).max(0.0)
}
