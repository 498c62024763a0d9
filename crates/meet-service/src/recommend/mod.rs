//! Location recommendation: preference merging and venue scoring

mod aggregator;
mod provider;
mod scorer;

pub use aggregator::{normalize_category, PreferenceAggregator, SearchProfile, MAX_SEARCH_CATEGORIES};
pub use provider::NullPlacesProvider;
pub use scorer::{
    category_score, price_score, rating_score, time_score, LocationScorer, ScoreBreakdown,
    ScoredVenue, TravelTime, VenueTravel, DEFAULT_PRICE_LEVEL,
};
