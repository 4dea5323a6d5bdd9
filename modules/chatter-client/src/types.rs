use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized mention from any chatter platform. Platform-specific item
/// types convert their native shape into this.
#[derive(Debug, Clone)]
pub struct ChatterPost {
    pub text: String,
    pub url: Option<String>,
    pub engagement: Option<i64>,
    pub published_at: Option<DateTime<Utc>>,
}

// --- TikTok keyword search ---

/// Input for the clockworks/tiktok-scraper actor in keyword-search mode.
#[derive(Debug, Clone, Serialize)]
pub struct TikTokSearchInput {
    #[serde(rename = "searchQueries")]
    pub search_queries: Vec<String>,
    #[serde(rename = "resultsPerPage")]
    pub results_per_page: u32,
}

/// A single TikTok video from the actor dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct TikTokItem {
    pub text: Option<String>,
    #[serde(rename = "webVideoUrl")]
    pub web_video_url: Option<String>,
    #[serde(rename = "createTimeISO")]
    pub create_time_iso: Option<String>,
    #[serde(rename = "diggCount")]
    pub digg_count: Option<i64>,
}

impl TikTokItem {
    pub fn into_post(self) -> Option<ChatterPost> {
        let text = self.text?;
        Some(ChatterPost {
            text,
            url: self.web_video_url,
            engagement: self.digg_count,
            published_at: parse_rfc3339(self.create_time_iso.as_deref()),
        })
    }
}

// --- Facebook keyword search ---

/// Input for the Facebook posts-search actor.
#[derive(Debug, Clone, Serialize)]
pub struct FacebookSearchInput {
    #[serde(rename = "searchQueries")]
    pub search_queries: Vec<String>,
    #[serde(rename = "resultsLimit")]
    pub results_limit: u32,
}

/// A single Facebook post from the actor dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct FacebookItem {
    pub text: Option<String>,
    pub url: Option<String>,
    pub time: Option<String>,
    pub likes: Option<i64>,
}

impl FacebookItem {
    pub fn into_post(self) -> Option<ChatterPost> {
        let text = self.text?;
        Some(ChatterPost {
            text,
            url: self.url,
            engagement: self.likes,
            published_at: parse_rfc3339(self.time.as_deref()),
        })
    }
}

// --- X keyword search ---

/// Input for X/Twitter keyword search via the tweet-scraper actor.
#[derive(Debug, Clone, Serialize)]
pub struct TweetSearchInput {
    #[serde(rename = "searchTerms")]
    pub search_terms: Vec<String>,
    #[serde(rename = "maxItems")]
    pub max_items: u32,
}

/// A single tweet from the actor dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct TweetItem {
    pub text: Option<String>,
    #[serde(rename = "full_text")]
    pub full_text: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(rename = "likeCount")]
    pub like_count: Option<i64>,
}

impl TweetItem {
    pub fn into_post(self) -> Option<ChatterPost> {
        let text = self.full_text.or(self.text)?;
        Some(ChatterPost {
            text,
            url: self.url,
            engagement: self.like_count,
            published_at: parse_rfc3339(self.created_at.as_deref()),
        })
    }
}

/// Timestamps arrive in several vendor formats; anything unparseable becomes
/// `None` and the caller falls back to ingestion time.
fn parse_rfc3339(s: Option<&str>) -> Option<DateTime<Utc>> {
    s.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}
