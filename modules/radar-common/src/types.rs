use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::regions::Region;

// --- Signal sources ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSource {
    Google,
    Tiktok,
    Facebook,
    X,
    Wolt,
}

impl std::fmt::Display for SignalSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalSource::Google => write!(f, "google"),
            SignalSource::Tiktok => write!(f, "tiktok"),
            SignalSource::Facebook => write!(f, "facebook"),
            SignalSource::X => write!(f, "x"),
            SignalSource::Wolt => write!(f, "wolt"),
        }
    }
}

impl SignalSource {
    pub fn from_str_loose(s: &str) -> Self {
        match s {
            "tiktok" => Self::Tiktok,
            "facebook" => Self::Facebook,
            "x" | "twitter" => Self::X,
            "wolt" => Self::Wolt,
            _ => Self::Google,
        }
    }

    /// True for the chatter platforms counted by the social-volume component.
    pub fn is_social(&self) -> bool {
        matches!(self, Self::Tiktok | Self::Facebook | Self::X)
    }
}

// --- Domain rows ---

/// A tracked food venue. Identity is the stable place reference on the
/// anchor-rating platform; everything else is refreshed by ingestion cycles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venue {
    pub id: Uuid,
    /// Stable identifier on the anchor platform (a place ID). Unique.
    pub place_ref: String,
    pub name: String,
    pub city: String,
    pub region: Region,
    pub address: Option<String>,
    /// Latest anchor-rating snapshot on the platform's 1-5 scale.
    pub anchor_rating: Option<f64>,
    pub anchor_rating_count: i64,
    /// Canonical published score, 0-100.
    pub composite_score: f64,
    /// Recency-weighted mean sentiment remapped to 0-100. Diagnostic only.
    pub net_sentiment: f64,
    pub signal_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// One unit of evidence about a venue: a review, mention, or rating snapshot.
///
/// Immutable once written, including `weight` — the recency multiplier is
/// frozen at insertion time and never re-decayed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub id: Uuid,
    pub venue_id: Uuid,
    pub source: SignalSource,
    pub content: String,
    pub url: Option<String>,
    /// Classifier output in [-1, 1].
    pub sentiment: f64,
    pub weight: f64,
    pub published_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Defaults applied when a venue is first created. Ignored if a venue with the
/// same place reference already exists.
#[derive(Debug, Clone)]
pub struct NewVenue {
    pub place_ref: String,
    pub name: String,
    pub city: String,
    pub region: Region,
    pub address: Option<String>,
}

/// Recomputed scores written back onto a venue at the end of a cycle.
#[derive(Debug, Clone, Copy)]
pub struct ScoreUpdate {
    pub net_sentiment: f64,
    pub composite_score: f64,
    pub signal_count: i64,
    pub anchor_rating: Option<f64>,
    pub anchor_rating_count: i64,
}

// --- Adapter-level payloads ---

/// An entity located on a source platform by a text search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub id: String,
    pub address: Option<String>,
}

/// An unscored signal as returned by a source adapter.
#[derive(Debug, Clone)]
pub struct RawSignal {
    pub source: SignalSource,
    pub text: String,
    pub url: Option<String>,
    /// Publish time when the source reports one; ingestion time is used as the
    /// effective publish time when absent.
    pub published_at: Option<DateTime<Utc>>,
    pub engagement: Option<i64>,
}

/// Everything one source returns for one venue in one fetch.
#[derive(Debug, Clone, Default)]
pub struct SignalBatch {
    pub signals: Vec<RawSignal>,
    pub anchor_rating: Option<f64>,
    pub anchor_rating_count: i64,
}

/// Operational snapshot from the delivery platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeliveryLoad {
    pub eta_minutes: Option<i64>,
    /// Venue rating on the platform's 0-10 scale.
    pub rating: Option<f64>,
}
