pub mod types;

pub use types::{
    ChatterPost, FacebookItem, FacebookSearchInput, TikTokItem, TikTokSearchInput, TweetItem,
    TweetSearchInput,
};

use std::time::Duration;

use paced_client::PacedClient;
use tracing::info;

const BASE_URL: &str = "https://api.apify.com/v2";

/// Actor ID for clockworks/tiktok-scraper (keyword search mode).
const TIKTOK_SEARCH_ACTOR: &str = "5K30i8aFccKNF5ICs";

/// Actor ID for the Facebook posts-search scraper.
const FACEBOOK_SEARCH_ACTOR: &str = "KoJrdxJCTtpon81KY";

/// Actor ID for apidojo/tweet-scraper.
const TWEET_SCRAPER: &str = "61RPP7dywgiy0JPD0";

/// Minimum spacing between actor invocations through one client.
const MIN_DELAY: Duration = Duration::from_secs(2);

/// Keyword search over the social platforms, via synchronous actor runs.
///
/// Every method returns an empty list when the gateway is unreachable or the
/// dataset fails to decode; the paced fetcher has already logged the cause.
pub struct ChatterClient {
    http: PacedClient,
    token: String,
}

impl ChatterClient {
    pub fn new(token: &str) -> Self {
        Self {
            http: PacedClient::new(BASE_URL, MIN_DELAY),
            token: token.to_string(),
        }
    }

    /// Search TikTok for recent videos matching the keywords.
    pub async fn search_tiktok(&self, keywords: &[String], limit: u32) -> Vec<ChatterPost> {
        info!(?keywords, limit, "Searching TikTok chatter");
        let input = TikTokSearchInput {
            search_queries: keywords.to_vec(),
            results_per_page: limit,
        };
        let items: Option<Vec<TikTokItem>> = self
            .http
            .post_json(
                &format!("/acts/{}/run-sync-get-dataset-items", TIKTOK_SEARCH_ACTOR),
                &[("token", self.token.as_str())],
                &input,
            )
            .await;
        items
            .unwrap_or_default()
            .into_iter()
            .filter_map(TikTokItem::into_post)
            .collect()
    }

    /// Search public Facebook posts matching the keywords.
    pub async fn search_facebook(&self, keywords: &[String], limit: u32) -> Vec<ChatterPost> {
        info!(?keywords, limit, "Searching Facebook chatter");
        let input = FacebookSearchInput {
            search_queries: keywords.to_vec(),
            results_limit: limit,
        };
        let items: Option<Vec<FacebookItem>> = self
            .http
            .post_json(
                &format!("/acts/{}/run-sync-get-dataset-items", FACEBOOK_SEARCH_ACTOR),
                &[("token", self.token.as_str())],
                &input,
            )
            .await;
        items
            .unwrap_or_default()
            .into_iter()
            .filter_map(FacebookItem::into_post)
            .collect()
    }

    /// Search X for recent mentions of the keywords.
    pub async fn search_x(&self, keywords: &[String], limit: u32) -> Vec<ChatterPost> {
        info!(?keywords, limit, "Searching X chatter");
        let input = TweetSearchInput {
            search_terms: keywords.to_vec(),
            max_items: limit,
        };
        let items: Option<Vec<TweetItem>> = self
            .http
            .post_json(
                &format!("/acts/{}/run-sync-get-dataset-items", TWEET_SCRAPER),
                &[("token", self.token.as_str())],
                &input,
            )
            .await;
        items
            .unwrap_or_default()
            .into_iter()
            .filter_map(TweetItem::into_post)
            .collect()
    }
}
