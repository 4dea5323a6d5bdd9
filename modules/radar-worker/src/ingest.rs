//! Per-venue ingestion: resolve the place, gather signals from every
//! source, dedup and persist them, then recompute the venue's scores.
//!
//! Source failures never abort a scan. The anchor and chatter fetches
//! degrade to empty batches, delivery enrichment degrades to its
//! defaults, and only store errors propagate.

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use radar_common::{
    classify, DeliveryLoad, NewVenue, Region, ScoreUpdate, ScoringParams, Signal, SignalBatch,
};

use crate::scoring;
use crate::seeds::SeedTarget;
use crate::traits::{DeliveryAdapter, SentimentClassifier, SourceAdapter, VenueStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    /// Signals were ingested (or re-seen) and scores recomputed.
    Done,
    /// Nothing to ingest: no place match, or every source came back empty.
    Skipped,
}

/// Counters from one venue scan.
#[derive(Debug, Default, Clone, Copy)]
pub struct IngestStats {
    pub anchor_reviews: u32,
    pub social_mentions: u32,
    pub signals_fetched: u32,
    pub signals_empty: u32,
    pub signals_duplicate: u32,
    pub signals_stored: u32,
}

#[derive(Debug)]
pub struct ScanOutcome {
    pub status: ScanStatus,
    pub stats: IngestStats,
}

impl ScanOutcome {
    fn skipped() -> Self {
        Self {
            status: ScanStatus::Skipped,
            stats: IngestStats::default(),
        }
    }
}

pub struct Ingestor {
    store: Arc<dyn VenueStore>,
    anchor: Arc<dyn SourceAdapter>,
    chatter: Arc<dyn SourceAdapter>,
    delivery: Arc<dyn DeliveryAdapter>,
    sentiment: Arc<dyn SentimentClassifier>,
    params: ScoringParams,
}

impl Ingestor {
    pub fn new(
        store: Arc<dyn VenueStore>,
        anchor: Arc<dyn SourceAdapter>,
        chatter: Arc<dyn SourceAdapter>,
        delivery: Arc<dyn DeliveryAdapter>,
        sentiment: Arc<dyn SentimentClassifier>,
        params: ScoringParams,
    ) -> Self {
        Self {
            store,
            anchor,
            chatter,
            delivery,
            sentiment,
            params,
        }
    }

    /// Run the full pipeline for one target. Safe to repeat: venue and
    /// signal dedup make a re-scan of unchanged sources a no-op apart
    /// from the score recompute.
    pub async fn scan_target(&self, target: &SeedTarget) -> Result<ScanOutcome> {
        let query = target.query.as_str();
        info!(query, "Scanning target");

        let Some(located) = self.anchor.locate(query).await? else {
            info!(query, "No place match, skipping");
            return Ok(ScanOutcome::skipped());
        };

        let name = display_name(query, &target.city);

        // Pull raw signals from every source before touching the database.
        let anchor_batch = self
            .fetch_batch(self.anchor.as_ref(), &name, Some(&located.id))
            .await;
        let chatter_batch = self.fetch_batch(self.chatter.as_ref(), &name, None).await;

        let mut stats = IngestStats {
            anchor_reviews: anchor_batch.signals.len() as u32,
            social_mentions: chatter_batch.signals.len() as u32,
            ..IngestStats::default()
        };

        if anchor_batch.signals.is_empty() && chatter_batch.signals.is_empty() {
            info!(query, "Every source came back empty, skipping");
            return Ok(ScanOutcome {
                status: ScanStatus::Skipped,
                stats,
            });
        }

        let region = match classify(&target.city) {
            Some(region) => region,
            None => {
                if !target.city.is_empty() {
                    warn!(
                        city = target.city.as_str(),
                        "City not in the coverage table, defaulting to center"
                    );
                }
                Region::Center
            }
        };

        let venue = self
            .store
            .get_or_create_venue(&NewVenue {
                place_ref: located.id.clone(),
                name,
                city: target.city.clone(),
                region,
                address: located.address.clone(),
            })
            .await?;

        let now = Utc::now();
        for raw in anchor_batch
            .signals
            .iter()
            .chain(chatter_batch.signals.iter())
        {
            stats.signals_fetched += 1;
            let text = raw.text.trim();
            if text.is_empty() {
                stats.signals_empty += 1;
                continue;
            }
            if self.store.find_signal(venue.id, text).await?.is_some() {
                stats.signals_duplicate += 1;
                continue;
            }
            let sentiment = self.sentiment.classify(text).await;
            let weight = scoring::recency_weight(raw.published_at, now, self.params.half_life_hours);
            let signal = Signal {
                id: Uuid::new_v4(),
                venue_id: venue.id,
                source: raw.source,
                content: text.to_string(),
                url: raw.url.clone(),
                sentiment,
                weight,
                published_at: raw.published_at.unwrap_or(now),
                created_at: now,
            };
            // The unique constraint has the final word; losing a race to a
            // concurrent scan counts as a duplicate, not an error.
            if self.store.insert_signal(&signal).await? {
                stats.signals_stored += 1;
            } else {
                stats.signals_duplicate += 1;
            }
        }
        debug!(
            stored = stats.signals_stored,
            duplicate = stats.signals_duplicate,
            empty = stats.signals_empty,
            "Signals persisted"
        );

        let delivery = self.check_delivery(query).await;

        // Recompute from the venue's full stored history, carrying the
        // last-known anchor snapshot when this fetch had none.
        let signals = self.store.signals_for_venue(venue.id).await?;
        let anchor_rating = anchor_batch.anchor_rating.or(venue.anchor_rating);
        let anchor_rating_count = if anchor_batch.anchor_rating.is_some() {
            anchor_batch.anchor_rating_count
        } else {
            venue.anchor_rating_count
        };
        let update = ScoreUpdate {
            net_sentiment: scoring::net_sentiment(&signals),
            composite_score: scoring::composite_score(
                &signals,
                anchor_rating,
                anchor_rating_count,
                delivery.rating,
                now,
                &self.params,
            ),
            signal_count: signals.len() as i64,
            anchor_rating,
            anchor_rating_count,
        };
        self.store.update_venue_scores(venue.id, &update).await?;

        info!(
            venue = venue.name.as_str(),
            composite = update.composite_score,
            signals = signals.len(),
            "Venue rescored"
        );
        Ok(ScanOutcome {
            status: ScanStatus::Done,
            stats,
        })
    }

    async fn fetch_batch(
        &self,
        adapter: &dyn SourceAdapter,
        venue_name: &str,
        place_ref: Option<&str>,
    ) -> SignalBatch {
        match adapter.fetch_signals(venue_name, place_ref).await {
            Ok(batch) => batch,
            Err(e) => {
                warn!(
                    source = adapter.name(),
                    error = %e,
                    "Signal fetch failed, continuing without"
                );
                SignalBatch::default()
            }
        }
    }

    async fn check_delivery(&self, query: &str) -> DeliveryLoad {
        let slug = match self.delivery.locate_venue(query).await {
            Ok(Some(slug)) => slug,
            Ok(None) => return DeliveryLoad::default(),
            Err(e) => {
                warn!(error = %e, "Delivery lookup failed");
                return DeliveryLoad::default();
            }
        };
        match self.delivery.check_load(&slug).await {
            Ok(load) => {
                if let Some(eta) = load.eta_minutes {
                    info!(slug = slug.as_str(), eta_minutes = eta, "Delivery load");
                }
                load
            }
            Err(e) => {
                warn!(error = %e, "Delivery load check failed");
                DeliveryLoad::default()
            }
        }
    }
}

/// Venue display name: the query with its trailing city stripped.
pub fn display_name(query: &str, city: &str) -> String {
    let trimmed = query.trim();
    if city.is_empty() {
        return trimmed.to_string();
    }
    let stripped = trimmed.replace(&format!(" {city}"), "");
    let stripped = stripped.trim();
    if stripped.is_empty() {
        trimmed.to_string()
    } else {
        stripped.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_suffix_is_stripped_from_the_query() {
        assert_eq!(display_name("שווארמה חזן חיפה", "חיפה"), "שווארמה חזן");
        assert_eq!(display_name("סעיד באר שבע", "באר שבע"), "סעיד");
    }

    #[test]
    fn queries_without_the_city_pass_through() {
        assert_eq!(display_name("מסעדת השף", "תל אביב"), "מסעדת השף");
        assert_eq!(display_name("  הקוסם ", ""), "הקוסם");
    }

    #[test]
    fn a_query_that_is_only_the_city_survives() {
        assert_eq!(display_name("חיפה", "חיפה"), "חיפה");
    }
}
