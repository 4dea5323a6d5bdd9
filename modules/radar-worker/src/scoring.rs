//! Score math: recency decay, Bayesian shrinkage, and the 100-point
//! composite.
//!
//! The composite is a sum of four bounded components:
//!
//!   anchor    0-40  shrunk anchor-platform rating
//!   social    0-30  recent social mention volume, saturating
//!   sentiment 0-15  weighted mean sentiment of recent signals
//!   delivery  0-15  delivery-platform rating, flat baseline when unlisted
//!
//! "Recent" means published within `ScoringParams::freshness_days`. Older
//! signals drop out of the social and sentiment components but keep feeding
//! the net-sentiment diagnostic with the weight frozen at insertion.

use chrono::{DateTime, Duration, Utc};

use radar_common::{ScoringParams, Signal};

/// Multiplier for a signal based on its age at insertion time.
///
/// First 24 hours: a linear boost from 3.0 down to 1.0. After that:
/// exponential decay with the configured half-life, floored at 0.1 so
/// history never vanishes entirely. Signals without a publish time count
/// as current; future-dated ones are treated as age zero.
pub fn recency_weight(
    published_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    half_life_hours: f64,
) -> f64 {
    let Some(published_at) = published_at else {
        return 1.0;
    };
    let age_hours = ((now - published_at).num_seconds() as f64 / 3600.0).max(0.0);
    if age_hours <= 24.0 {
        (3.0 - 2.0 * (age_hours / 24.0)).max(1.0)
    } else {
        (-(age_hours - 24.0) / half_life_hours).exp().max(0.1)
    }
}

/// Pull an observed mean toward a prior. With few observations the prior
/// dominates; at `prior_strength` observations they contribute equally.
///
/// The same helper expresses the earlier all-in-one scoring scheme, where
/// a net sentiment percentage was shrunk toward 50 with strength 5.
pub fn bayesian_shrink(
    observed_mean: f64,
    observations: f64,
    prior: f64,
    prior_strength: f64,
) -> f64 {
    let n = observations.max(0.0);
    let c = prior_strength;
    if n + c <= 0.0 {
        return prior;
    }
    (n / (n + c)) * observed_mean + (c / (n + c)) * prior
}

/// Anchor-platform component. A venue with no rating, or a rating backed
/// by no reviews, sits exactly at the prior.
pub fn anchor_component(rating: Option<f64>, rating_count: i64, params: &ScoringParams) -> f64 {
    let shrunk = match rating {
        Some(rating) => bayesian_shrink(
            rating,
            rating_count as f64,
            params.anchor_prior,
            params.anchor_confidence,
        ),
        None => params.anchor_prior,
    };
    (shrunk / 5.0) * params.anchor_points
}

/// Social-volume component: linear in the recent mention count, full marks
/// at `social_saturation` mentions.
pub fn social_volume_component(recent_mentions: usize, params: &ScoringParams) -> f64 {
    let ratio = recent_mentions as f64 / params.social_saturation;
    ratio.min(1.0) * params.social_points
}

/// Recent-sentiment component over `(sentiment, weight)` samples. Neutral
/// midpoint when nothing recent carries weight.
pub fn sentiment_component(samples: &[(f64, f64)], params: &ScoringParams) -> f64 {
    match weighted_mean(samples) {
        Some(mean) => ((mean + 1.0) / 2.0) * params.sentiment_points,
        None => params.sentiment_points / 2.0,
    }
}

/// Delivery-platform component. Unlisted venues get the flat baseline
/// rather than zero: absence of a listing says nothing about the food.
pub fn delivery_component(rating: Option<f64>, params: &ScoringParams) -> f64 {
    match rating {
        Some(rating) => (rating / 10.0) * params.delivery_points,
        None => params.delivery_baseline,
    }
}

/// The published 0-100 composite for one venue.
pub fn composite_score(
    signals: &[Signal],
    anchor_rating: Option<f64>,
    anchor_rating_count: i64,
    delivery_rating: Option<f64>,
    now: DateTime<Utc>,
    params: &ScoringParams,
) -> f64 {
    let cutoff = now - Duration::days(params.freshness_days);
    let recent: Vec<&Signal> = signals.iter().filter(|s| s.published_at >= cutoff).collect();

    let social_mentions = recent.iter().filter(|s| s.source.is_social()).count();
    let sentiment_samples: Vec<(f64, f64)> =
        recent.iter().map(|s| (s.sentiment, s.weight)).collect();

    let total = anchor_component(anchor_rating, anchor_rating_count, params)
        + social_volume_component(social_mentions, params)
        + sentiment_component(&sentiment_samples, params)
        + delivery_component(delivery_rating, params);
    total.clamp(0.0, 100.0)
}

/// Weighted mean sentiment over the venue's whole history, remapped to
/// 0-100. Diagnostic only; a venue with no weighted signals reads 0.
pub fn net_sentiment(signals: &[Signal]) -> f64 {
    let samples: Vec<(f64, f64)> = signals.iter().map(|s| (s.sentiment, s.weight)).collect();
    match weighted_mean(&samples) {
        Some(mean) => ((mean + 1.0) / 2.0) * 100.0,
        None => 0.0,
    }
}

fn weighted_mean(samples: &[(f64, f64)]) -> Option<f64> {
    let total_weight: f64 = samples.iter().map(|(_, w)| w).sum();
    if total_weight <= 0.0 {
        return None;
    }
    let weighted_sum: f64 = samples.iter().map(|(s, w)| s * w).sum();
    Some(weighted_sum / total_weight)
}
