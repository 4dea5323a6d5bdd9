use serde::Deserialize;

/// Response envelope for venue search.
#[derive(Debug, Clone, Deserialize)]
pub struct VenueSearchResponse {
    #[serde(default)]
    pub results: Vec<VenueHit>,
}

/// One venue candidate from a search.
#[derive(Debug, Clone, Deserialize)]
pub struct VenueHit {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub rating: Option<VenueRating>,
}

/// Venue rating on the platform's 0-10 scale.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct VenueRating {
    #[serde(default)]
    pub score: Option<f64>,
}

/// Response envelope for a venue-by-slug lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct VenueResponse {
    #[serde(default)]
    pub results: Vec<VenueDetails>,
}

/// Operational details for one venue.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VenueDetails {
    #[serde(default)]
    pub rating: Option<VenueRating>,
    #[serde(default)]
    pub delivery_specs: Option<DeliverySpecs>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeliverySpecs {
    #[serde(default)]
    pub delivery_times: Option<DeliveryTimes>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DeliveryTimes {
    #[serde(default)]
    pub minute_estimate: Option<i64>,
}

impl VenueDetails {
    /// The current delivery estimate, when the venue is taking orders.
    pub fn eta_minutes(&self) -> Option<i64> {
        self.delivery_specs
            .as_ref()
            .and_then(|s| s.delivery_times.as_ref())
            .and_then(|t| t.minute_estimate)
    }

    pub fn rating_score(&self) -> Option<f64> {
        self.rating.as_ref().and_then(|r| r.score)
    }
}
