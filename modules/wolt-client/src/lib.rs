pub mod types;

pub use types::{VenueDetails, VenueHit, VenueRating, VenueResponse, VenueSearchResponse};

use std::time::Duration;

use paced_client::PacedClient;
use tracing::debug;

const BASE_URL: &str = "https://restaurant-api.wolt.com";

/// Minimum spacing between calls through one client. Wolt throttles harder
/// than the other sources.
const MIN_DELAY: Duration = Duration::from_secs(3);

/// Venue search and delivery-load checks against the delivery platform.
///
/// No credentials involved; the public venue endpoints are open. Both methods
/// degrade to empty results on failure.
pub struct WoltClient {
    http: PacedClient,
}

impl WoltClient {
    pub fn new() -> Self {
        Self {
            http: PacedClient::new(BASE_URL, MIN_DELAY),
        }
    }

    /// Search venues by free text. Returns candidates, best match first.
    pub async fn search_venues(&self, query: &str) -> Vec<VenueHit> {
        debug!(query, "Searching delivery venues");
        let resp: Option<VenueSearchResponse> = self
            .http
            .get_json("/v1/pages/search", &[("q", query)])
            .await;
        resp.map(|r| r.results).unwrap_or_default()
    }

    /// Fetch the operational snapshot for a venue slug.
    pub async fn venue_by_slug(&self, slug: &str) -> Option<VenueDetails> {
        debug!(slug, "Checking delivery load");
        let resp: Option<VenueResponse> = self
            .http
            .get_json(&format!("/v3/venues/slug/{slug}"), &[])
            .await;
        resp.and_then(|r| r.results.into_iter().next())
    }
}

impl Default for WoltClient {
    fn default() -> Self {
        Self::new()
    }
}
