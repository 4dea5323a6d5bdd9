use std::env;

/// Scoring constants, grouped so experiments can swap them wholesale.
///
/// The defaults are the canonical values: 40/30/15/15 component budget,
/// confidence constant 50, and a 180-day decay half-life.
#[derive(Debug, Clone, Copy)]
pub struct ScoringParams {
    /// Review count at which the raw anchor rating and the global prior
    /// contribute equally to the shrunk estimate.
    pub anchor_confidence: f64,
    /// Assumed global-average anchor rating on the 1-5 scale.
    pub anchor_prior: f64,
    /// Decay half-life, in hours, for signals older than a day.
    pub half_life_hours: f64,
    /// Social mention count at which the volume component saturates.
    pub social_saturation: f64,
    /// Signals published within this many days feed the social-volume and
    /// sentiment components. Older signals still count toward the diagnostic.
    pub freshness_days: i64,
    /// Component budgets, in points out of 100.
    pub anchor_points: f64,
    pub social_points: f64,
    pub sentiment_points: f64,
    pub delivery_points: f64,
    /// Flat delivery points granted when the venue is not listed on the
    /// delivery platform or exposes no rating there.
    pub delivery_baseline: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            anchor_confidence: 50.0,
            anchor_prior: 3.5,
            half_life_hours: 4320.0,
            social_saturation: 20.0,
            freshness_days: 30,
            anchor_points: 40.0,
            social_points: 30.0,
            sentiment_points: 15.0,
            delivery_points: 15.0,
            delivery_baseline: 10.0,
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Storage
    pub database_url: String,

    // Anchor ratings
    pub places_api_key: String,

    // Sentiment (optional; scorer degrades to neutral without it)
    pub openai_api_key: String,

    // Social chatter (optional; scanner is disabled without it)
    pub chatter_api_token: String,

    // Worker
    pub cycle_minutes: u64,
    pub max_concurrent_venues: usize,
    pub seed_file: Option<String>,

    // Web server
    pub web_host: String,
    pub web_port: u16,

    pub scoring: ScoringParams,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://radar.db".to_string()),
            places_api_key: required_env("GOOGLE_PLACES_API_KEY"),
            openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            chatter_api_token: env::var("CHATTER_API_TOKEN").unwrap_or_default(),
            cycle_minutes: env::var("CYCLE_MINUTES")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("CYCLE_MINUTES must be a number"),
            max_concurrent_venues: env::var("MAX_CONCURRENT_VENUES")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .expect("MAX_CONCURRENT_VENUES must be a number"),
            seed_file: env::var("SEED_FILE").ok(),
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port: env::var("WEB_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .expect("WEB_PORT must be a number"),
            scoring: ScoringParams::default(),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
