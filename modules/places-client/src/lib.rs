pub mod types;

pub use types::{DetailsResponse, PlaceDetails, PlaceHit, PlaceReview, SearchResponse};

use std::time::Duration;

use paced_client::PacedClient;
use tracing::debug;

const BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

/// Reviews and candidate names come back in Hebrew.
const LANGUAGE: &str = "iw";

/// Minimum spacing between calls through one client.
const MIN_DELAY: Duration = Duration::from_millis(1500);

/// Text search and review details against the anchor-rating platform.
///
/// Both methods degrade to empty results on failure; the paced fetcher has
/// already logged the cause.
pub struct PlacesClient {
    http: PacedClient,
    api_key: String,
}

impl PlacesClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            http: PacedClient::new(BASE_URL, MIN_DELAY),
            api_key: api_key.to_string(),
        }
    }

    /// Text-search for a place. Returns the candidate list, best match first.
    pub async fn search(&self, query: &str) -> Vec<PlaceHit> {
        debug!(query, "Searching places");
        let resp: Option<SearchResponse> = self
            .http
            .get_json(
                "/textsearch/json",
                &[
                    ("query", query),
                    ("language", LANGUAGE),
                    ("key", self.api_key.as_str()),
                ],
            )
            .await;
        resp.map(|r| r.results).unwrap_or_default()
    }

    /// Fetch the rating snapshot and newest reviews for a place.
    pub async fn details(&self, place_id: &str) -> Option<PlaceDetails> {
        debug!(place_id, "Fetching place details");
        let resp: Option<DetailsResponse> = self
            .http
            .get_json(
                "/details/json",
                &[
                    ("place_id", place_id),
                    ("fields", "reviews,user_ratings_total,rating"),
                    ("reviews_sort", "newest"),
                    ("language", LANGUAGE),
                    ("key", self.api_key.as_str()),
                ],
            )
            .await;
        resp.and_then(|r| r.result)
    }
}
