//! Concrete platform adapters behind the pipeline's trait seams.

use std::sync::LazyLock;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use regex::Regex;
use tracing::{debug, warn};

use chatter_client::{ChatterClient, ChatterPost};
use places_client::PlacesClient;
use radar_common::{regions, DeliveryLoad, Located, RawSignal, SignalBatch, SignalSource};
use wolt_client::WoltClient;

use crate::traits::{DeliveryAdapter, SourceAdapter};

static TOKEN_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}]+").expect("valid regex"));
static QUOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["'״׳]"#).expect("valid regex"));

/// Generic food words that carry no identity in a venue query.
const FOOD_STOPWORDS: &[&str] = &[
    "שווארמה",
    "שוארמה",
    "חומוס",
    "פלאפל",
    "פיצה",
    "פיצריה",
    "בורגר",
    "המבורגר",
    "סושי",
    "שניצל",
    "מסעדה",
    "מסעדת",
    "דוכן",
    "גריל",
    "קפה",
    "בית",
    "shawarma",
    "hummus",
    "falafel",
    "pizza",
    "burger",
    "restaurant",
];

fn is_stopword(token: &str) -> bool {
    FOOD_STOPWORDS.contains(&token)
        || regions::city_names().any(|city| city.split_whitespace().any(|word| word == token))
}

fn meaningful_tokens(text: &str) -> Vec<String> {
    TOKEN_SPLIT_RE
        .split(&text.to_lowercase())
        .filter(|t| !t.is_empty() && !is_stopword(t))
        .map(str::to_string)
        .collect()
}

/// Text search happily returns *some* place for almost any query, so a
/// candidate must share at least one identifying token with the query
/// before we trust it. Queries made of nothing but generic words have no
/// identifying token to demand, and pass.
fn plausible_match(query: &str, candidate: &str) -> bool {
    let query_tokens = meaningful_tokens(query);
    if query_tokens.is_empty() {
        return true;
    }
    let candidate_tokens = meaningful_tokens(candidate);
    query_tokens.iter().any(|t| candidate_tokens.contains(t))
}

/// Keyword variants used to search the chatter platforms for a venue.
fn search_keywords(venue_name: &str) -> Vec<String> {
    let name = venue_name.trim().to_string();
    let unquoted = QUOTE_RE.replace_all(&name, "").trim().to_string();
    let mut keywords = vec![name];
    if !unquoted.is_empty() && !keywords.contains(&unquoted) {
        keywords.push(unquoted);
    }
    keywords
}

// ---------------------------------------------------------------------------
// Anchor platform (Google Places)
// ---------------------------------------------------------------------------

pub struct PlacesAdapter {
    client: PlacesClient,
}

impl PlacesAdapter {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: PlacesClient::new(api_key),
        }
    }
}

#[async_trait]
impl SourceAdapter for PlacesAdapter {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn locate(&self, query: &str) -> Result<Option<Located>> {
        let hits = self.client.search(query).await;
        let Some(best) = hits.into_iter().next() else {
            debug!(query, "No place results");
            return Ok(None);
        };
        if !plausible_match(query, &best.name) {
            warn!(
                query,
                candidate = best.name.as_str(),
                "Top place result shares no identifying token with the query, treating as not found"
            );
            return Ok(None);
        }
        Ok(Some(Located {
            id: best.place_id,
            address: best.formatted_address,
        }))
    }

    async fn fetch_signals(
        &self,
        _venue_name: &str,
        place_ref: Option<&str>,
    ) -> Result<SignalBatch> {
        let Some(place_ref) = place_ref else {
            return Ok(SignalBatch::default());
        };
        let Some(details) = self.client.details(place_ref).await else {
            return Ok(SignalBatch::default());
        };
        let signals = details
            .reviews
            .into_iter()
            .map(|review| RawSignal {
                source: SignalSource::Google,
                text: review.text,
                url: review.author_url,
                published_at: review
                    .time
                    .and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
                engagement: None,
            })
            .collect();
        Ok(SignalBatch {
            signals,
            anchor_rating: details.rating,
            anchor_rating_count: details.user_ratings_total.unwrap_or(0),
        })
    }
}

// ---------------------------------------------------------------------------
// Chatter platforms (TikTok / Facebook / X via the actor gateway)
// ---------------------------------------------------------------------------

pub struct ChatterAdapter {
    client: Option<ChatterClient>,
    per_platform_limit: u32,
}

impl ChatterAdapter {
    /// An empty token disables the adapter for the lifetime of the
    /// process; it then reports no mentions at all.
    pub fn new(token: &str) -> Self {
        let client = if token.is_empty() {
            warn!("CHATTER_API_TOKEN not set; social chatter disabled");
            None
        } else {
            Some(ChatterClient::new(token))
        };
        Self {
            client,
            per_platform_limit: 20,
        }
    }
}

#[async_trait]
impl SourceAdapter for ChatterAdapter {
    fn name(&self) -> &'static str {
        "chatter"
    }

    async fn fetch_signals(
        &self,
        venue_name: &str,
        _place_ref: Option<&str>,
    ) -> Result<SignalBatch> {
        let Some(client) = &self.client else {
            return Ok(SignalBatch::default());
        };
        let keywords = search_keywords(venue_name);
        let mut signals = Vec::new();

        let posts = client.search_tiktok(&keywords, self.per_platform_limit).await;
        signals.extend(posts.into_iter().map(|p| raw_signal(SignalSource::Tiktok, p)));

        let posts = client.search_facebook(&keywords, self.per_platform_limit).await;
        signals.extend(posts.into_iter().map(|p| raw_signal(SignalSource::Facebook, p)));

        let posts = client.search_x(&keywords, self.per_platform_limit).await;
        signals.extend(posts.into_iter().map(|p| raw_signal(SignalSource::X, p)));

        debug!(venue_name, mentions = signals.len(), "Chatter fetch complete");
        Ok(SignalBatch {
            signals,
            ..Default::default()
        })
    }
}

fn raw_signal(source: SignalSource, post: ChatterPost) -> RawSignal {
    RawSignal {
        source,
        text: post.text,
        url: post.url,
        published_at: post.published_at,
        engagement: post.engagement,
    }
}

// ---------------------------------------------------------------------------
// Delivery platform (Wolt)
// ---------------------------------------------------------------------------

pub struct WoltAdapter {
    client: WoltClient,
}

impl WoltAdapter {
    pub fn new() -> Self {
        Self {
            client: WoltClient::new(),
        }
    }
}

impl Default for WoltAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeliveryAdapter for WoltAdapter {
    async fn locate_venue(&self, query: &str) -> Result<Option<String>> {
        let hits = self.client.search_venues(query).await;
        Ok(hits.into_iter().next().map(|hit| hit.slug))
    }

    async fn check_load(&self, venue_ref: &str) -> Result<DeliveryLoad> {
        match self.client.venue_by_slug(venue_ref).await {
            Some(details) => Ok(DeliveryLoad {
                eta_minutes: details.eta_minutes(),
                rating: details.rating_score(),
            }),
            None => Ok(DeliveryLoad::default()),
        }
    }
}
