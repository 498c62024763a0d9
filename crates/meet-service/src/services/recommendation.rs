//! Recommendation service
//!
//! Searches the places provider around the group's centroid and ranks the
//! results. Holds no meeting lock: every provider call is network I/O.

use std::collections::HashSet;

use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

use meet_core::{MeetingId, Participant, TravelMode, Venue};

use crate::dto::RecommendationResponse;
use crate::recommend::{LocationScorer, PreferenceAggregator, SearchProfile, TravelTime, VenueTravel};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Recommendation service
pub struct RecommendationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RecommendationService<'a> {
    /// Create a new RecommendationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Search and rank venues for a group
    ///
    /// # Errors
    /// `Upstream` when every places search failed; validation errors for an
    /// empty group or out-of-range coordinates.
    #[instrument(skip(self, participants), fields(participants = participants.len()))]
    pub async fn recommend(
        &self,
        meeting_id: &MeetingId,
        participants: Vec<Participant>,
    ) -> ServiceResult<RecommendationResponse> {
        let profile = self.profile(&participants)?;
        let venues = self.search(&profile).await?;
        self.rank(meeting_id, profile, &participants, venues).await
    }

    /// Rank caller-supplied venues for a group
    #[instrument(skip(self, participants, venues), fields(participants = participants.len(), venues = venues.len()))]
    pub async fn score_venues(
        &self,
        meeting_id: &MeetingId,
        participants: Vec<Participant>,
        venues: Vec<Venue>,
    ) -> ServiceResult<RecommendationResponse> {
        let profile = self.profile(&participants)?;
        self.rank(meeting_id, profile, &participants, dedupe(venues))
            .await
    }

    fn profile(&self, participants: &[Participant]) -> ServiceResult<SearchProfile> {
        let default_radius = self.ctx.recommendation_config().default_max_distance_km;
        Ok(PreferenceAggregator::aggregate(participants, default_radius)?)
    }

    async fn search(&self, profile: &SearchProfile) -> ServiceResult<Vec<Venue>> {
        let categories: Vec<Option<&str>> = if profile.categories.is_empty() {
            vec![None]
        } else {
            profile.categories.iter().map(|c| Some(c.as_str())).collect()
        };

        let searches = categories.iter().map(|category| {
            self.ctx
                .places()
                .search_nearby(profile.center, profile.radius_km, *category)
        });
        let results = join_all(searches).await;

        let mut venues = Vec::new();
        let mut failures = 0;
        let mut last_error = None;
        for (category, result) in categories.iter().zip(results) {
            match result {
                Ok(found) => {
                    debug!(category = ?category, found = found.len(), "Places search succeeded");
                    venues.extend(found);
                }
                Err(e) => {
                    warn!(category = ?category, error = %e, "Places search failed");
                    failures += 1;
                    last_error = Some(e);
                }
            }
        }

        if let Some(e) = last_error.filter(|_| failures == categories.len()) {
            return Err(ServiceError::Upstream(e.to_string()));
        }

        Ok(dedupe(venues))
    }

    async fn rank(
        &self,
        meeting_id: &MeetingId,
        profile: SearchProfile,
        participants: &[Participant],
        venues: Vec<Venue>,
    ) -> ServiceResult<RecommendationResponse> {
        let venues: Vec<Venue> = venues
            .into_iter()
            .filter(|v| match v.coordinates.validate() {
                Ok(()) => true,
                Err(e) => {
                    debug!(place_id = %v.place_id, error = %e, "Skipping venue with invalid coordinates");
                    false
                }
            })
            .collect();

        let mode = profile.travel_mode;
        let lookups = venues.iter().map(|venue| {
            join_all(
                participants
                    .iter()
                    .map(move |p| self.travel_time(p, venue, mode)),
            )
        });
        let travel: Vec<Vec<TravelTime>> = join_all(lookups).await;

        let estimated = travel.iter().flatten().filter(|t| t.estimated).count();
        if estimated > 0 {
            warn!(
                meeting_id = %meeting_id,
                estimated,
                "Travel times fell back to straight-line estimates"
            );
        }

        let candidates = venues
            .into_iter()
            .zip(travel)
            .map(|(venue, travel)| VenueTravel { venue, travel })
            .collect();

        let mut ranked = LocationScorer::score(candidates, &profile.categories);
        ranked.truncate(self.ctx.recommendation_config().limit);

        info!(
            meeting_id = %meeting_id,
            returned = ranked.len(),
            radius_km = profile.radius_km,
            "Recommendations ranked"
        );

        Ok(RecommendationResponse {
            profile,
            venues: ranked,
        })
    }

    async fn travel_time(
        &self,
        participant: &Participant,
        venue: &Venue,
        default_mode: TravelMode,
    ) -> TravelTime {
        let mode = participant.preferences.transport.unwrap_or(default_mode);
        match self
            .ctx
            .places()
            .travel_time(participant.location, venue.coordinates, mode)
            .await
        {
            Ok(estimate) if estimate.duration_minutes.is_finite() && estimate.duration_minutes >= 0.0 => {
                TravelTime {
                    participant_id: participant.id.clone(),
                    minutes: estimate.duration_minutes,
                    distance_km: estimate.distance_km,
                    estimated: false,
                }
            }
            Ok(estimate) => {
                debug!(minutes = estimate.duration_minutes, "Discarding unusable travel estimate");
                TravelTime::fallback(participant, venue, mode)
            }
            Err(e) => {
                debug!(place_id = %venue.place_id, error = %e, "Travel time lookup failed");
                TravelTime::fallback(participant, venue, mode)
            }
        }
    }
}

/// First occurrence of each place wins
fn dedupe(venues: Vec<Venue>) -> Vec<Venue> {
    let mut seen = HashSet::new();
    venues
        .into_iter()
        .filter(|v| seen.insert(v.place_id.clone()))
        .collect()
}
