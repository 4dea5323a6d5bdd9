use serde::Deserialize;

/// Response envelope for `/textsearch/json`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<PlaceHit>,
}

/// One candidate from a text search.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceHit {
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<i64>,
}

/// Response envelope for `/details/json`.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailsResponse {
    #[serde(default)]
    pub result: Option<PlaceDetails>,
}

/// Rating snapshot plus the newest reviews for one place.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceDetails {
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<i64>,
    #[serde(default)]
    pub reviews: Vec<PlaceReview>,
}

/// A single review payload.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceReview {
    #[serde(default)]
    pub text: String,
    /// Publish time as Unix epoch seconds.
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(default)]
    pub author_url: Option<String>,
}
