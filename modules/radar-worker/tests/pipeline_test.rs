//! End-to-end pipeline tests with stub adapters and an in-memory store.
//! No network, no API keys, deterministic inputs.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};

use radar_common::{
    DeliveryLoad, Located, RawSignal, Region, ScoringParams, SignalBatch, SignalSource,
};
use radar_store::RadarStore;
use radar_worker::traits::{DeliveryAdapter, SentimentClassifier, SourceAdapter, VenueStore};
use radar_worker::{Ingestor, ScanStatus, Scheduler, SeedTarget};

// =========================================================================
// Stub adapters
// =========================================================================

/// Anchor stub with one fixed locate answer and one fixed batch.
struct StubAnchor {
    located: Option<Located>,
    batch: SignalBatch,
}

impl StubAnchor {
    fn resolving(place_ref: &str, batch: SignalBatch) -> Self {
        Self {
            located: Some(Located {
                id: place_ref.to_string(),
                address: Some("רחוב הדוגמה 1".to_string()),
            }),
            batch,
        }
    }

    fn unresolved() -> Self {
        Self {
            located: None,
            batch: SignalBatch::default(),
        }
    }
}

#[async_trait]
impl SourceAdapter for StubAnchor {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn locate(&self, _query: &str) -> Result<Option<Located>> {
        Ok(self.located.clone())
    }

    async fn fetch_signals(
        &self,
        _venue_name: &str,
        _place_ref: Option<&str>,
    ) -> Result<SignalBatch> {
        Ok(self.batch.clone())
    }
}

/// Anchor stub that derives the place ref from the query, so different
/// targets resolve to different venues.
struct PerQueryAnchor {
    batch: SignalBatch,
    unresolvable: Vec<String>,
}

#[async_trait]
impl SourceAdapter for PerQueryAnchor {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn locate(&self, query: &str) -> Result<Option<Located>> {
        if self.unresolvable.iter().any(|q| q == query) {
            return Ok(None);
        }
        Ok(Some(Located {
            id: format!("ref({query})"),
            address: None,
        }))
    }

    async fn fetch_signals(
        &self,
        _venue_name: &str,
        _place_ref: Option<&str>,
    ) -> Result<SignalBatch> {
        Ok(self.batch.clone())
    }
}

struct StubChatter {
    batch: SignalBatch,
}

#[async_trait]
impl SourceAdapter for StubChatter {
    fn name(&self) -> &'static str {
        "chatter"
    }

    async fn fetch_signals(
        &self,
        _venue_name: &str,
        _place_ref: Option<&str>,
    ) -> Result<SignalBatch> {
        Ok(self.batch.clone())
    }
}

struct NoDelivery;

#[async_trait]
impl DeliveryAdapter for NoDelivery {
    async fn locate_venue(&self, _query: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn check_load(&self, _venue_ref: &str) -> Result<DeliveryLoad> {
        Ok(DeliveryLoad::default())
    }
}

struct FixedDelivery {
    rating: f64,
}

#[async_trait]
impl DeliveryAdapter for FixedDelivery {
    async fn locate_venue(&self, _query: &str) -> Result<Option<String>> {
        Ok(Some("stub-venue".to_string()))
    }

    async fn check_load(&self, _venue_ref: &str) -> Result<DeliveryLoad> {
        Ok(DeliveryLoad {
            eta_minutes: Some(35),
            rating: Some(self.rating),
        })
    }
}

/// Keyword sentiment: "מעולה" is great, "גרוע" is awful, else neutral.
struct KeywordSentiment;

#[async_trait]
impl SentimentClassifier for KeywordSentiment {
    async fn classify(&self, text: &str) -> f64 {
        if text.contains("מעולה") {
            0.9
        } else if text.contains("גרוע") {
            -0.8
        } else {
            0.0
        }
    }
}

// =========================================================================
// Fixtures
// =========================================================================

fn review(text: &str, age_hours: i64) -> RawSignal {
    raw(SignalSource::Google, text, age_hours)
}

fn raw(source: SignalSource, text: &str, age_hours: i64) -> RawSignal {
    RawSignal {
        source,
        text: text.to_string(),
        url: None,
        published_at: Some(Utc::now() - Duration::hours(age_hours)),
        engagement: None,
    }
}

fn anchor_batch(reviews: Vec<RawSignal>, rating: f64, count: i64) -> SignalBatch {
    SignalBatch {
        signals: reviews,
        anchor_rating: Some(rating),
        anchor_rating_count: count,
    }
}

fn chatter_batch(mentions: Vec<RawSignal>) -> SignalBatch {
    SignalBatch {
        signals: mentions,
        ..Default::default()
    }
}

fn hazan_target() -> SeedTarget {
    SeedTarget::new("שווארמה חזן חיפה", "חיפה")
}

async fn build(
    anchor: impl SourceAdapter + 'static,
    chatter: SignalBatch,
    delivery: impl DeliveryAdapter + 'static,
) -> (Arc<RadarStore>, Arc<Ingestor>) {
    let store = Arc::new(
        RadarStore::connect("sqlite::memory:")
            .await
            .expect("in-memory store"),
    );
    let ingestor = Arc::new(Ingestor::new(
        store.clone() as Arc<dyn VenueStore>,
        Arc::new(anchor),
        Arc::new(StubChatter { batch: chatter }),
        Arc::new(delivery),
        Arc::new(KeywordSentiment),
        ScoringParams::default(),
    ));
    (store, ingestor)
}

// =========================================================================
// Single-target scans
// =========================================================================

#[tokio::test]
async fn full_scan_persists_venue_signals_and_scores() {
    let anchor = StubAnchor::resolving(
        "place-hazan",
        anchor_batch(
            vec![review("מעולה פשוט", 5), review("שירות סביר", 72)],
            4.6,
            800,
        ),
    );
    let chatter = chatter_batch(vec![raw(SignalSource::Tiktok, "מעולה!! חובה להגיע", 2)]);
    let (store, ingestor) = build(anchor, chatter, FixedDelivery { rating: 8.0 }).await;

    let outcome = ingestor.scan_target(&hazan_target()).await.unwrap();
    assert_eq!(outcome.status, ScanStatus::Done);
    assert_eq!(outcome.stats.anchor_reviews, 2);
    assert_eq!(outcome.stats.social_mentions, 1);
    assert_eq!(outcome.stats.signals_fetched, 3);
    assert_eq!(outcome.stats.signals_stored, 3);

    let venue = store
        .find_venue_by_place_ref("place-hazan")
        .await
        .unwrap()
        .expect("venue should exist");
    assert_eq!(venue.name, "שווארמה חזן");
    assert_eq!(venue.city, "חיפה");
    assert_eq!(venue.region, Region::North);
    assert_eq!(venue.address.as_deref(), Some("רחוב הדוגמה 1"));
    assert_eq!(venue.signal_count, 3);
    assert_eq!(venue.anchor_rating, Some(4.6));
    assert_eq!(venue.anchor_rating_count, 800);

    // Strong rating, positive recent sentiment, delivery listing: the
    // composite must clear the no-data baseline without pinning at 100.
    assert!(venue.composite_score > 45.5 && venue.composite_score < 100.0);
    assert!(venue.net_sentiment > 50.0);
}

#[tokio::test]
async fn rescanning_unchanged_sources_is_a_no_op() {
    let anchor = StubAnchor::resolving(
        "place-hazan",
        anchor_batch(vec![review("טעים מאוד", 30)], 4.4, 200),
    );
    let (store, ingestor) = build(anchor, chatter_batch(vec![]), NoDelivery).await;

    let first = ingestor.scan_target(&hazan_target()).await.unwrap();
    assert_eq!(first.status, ScanStatus::Done);
    assert_eq!(first.stats.signals_stored, 1);

    let second = ingestor.scan_target(&hazan_target()).await.unwrap();
    assert_eq!(second.status, ScanStatus::Done);
    assert_eq!(second.stats.signals_stored, 0);
    assert_eq!(second.stats.signals_duplicate, 1);

    let venue = store
        .find_venue_by_place_ref("place-hazan")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(venue.signal_count, 1);
}

#[tokio::test]
async fn unresolved_place_is_skipped() {
    let (store, ingestor) = build(StubAnchor::unresolved(), chatter_batch(vec![]), NoDelivery).await;

    let outcome = ingestor.scan_target(&hazan_target()).await.unwrap();
    assert_eq!(outcome.status, ScanStatus::Skipped);
    assert!(store.list_venues(10, 0).await.unwrap().is_empty());
}

#[tokio::test]
async fn all_empty_sources_skip_without_creating_a_venue() {
    // A rating snapshot alone, with zero signals anywhere, is not enough.
    let anchor = StubAnchor::resolving("place-ghost", anchor_batch(vec![], 4.2, 10));
    let (store, ingestor) = build(anchor, chatter_batch(vec![]), NoDelivery).await;

    let outcome = ingestor.scan_target(&hazan_target()).await.unwrap();
    assert_eq!(outcome.status, ScanStatus::Skipped);
    assert!(store.list_venues(10, 0).await.unwrap().is_empty());
}

#[tokio::test]
async fn blank_texts_are_dropped_before_classification() {
    let anchor = StubAnchor::resolving(
        "place-hazan",
        anchor_batch(
            vec![review("", 4), review("   ", 4), review("שווה", 4)],
            4.0,
            50,
        ),
    );
    let (store, ingestor) = build(anchor, chatter_batch(vec![]), NoDelivery).await;

    let outcome = ingestor.scan_target(&hazan_target()).await.unwrap();
    assert_eq!(outcome.stats.signals_empty, 2);
    assert_eq!(outcome.stats.signals_stored, 1);

    let venue = store
        .find_venue_by_place_ref("place-hazan")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(venue.signal_count, 1);
}

#[tokio::test]
async fn identical_text_from_two_sources_is_stored_once() {
    let text = "חובה להגיע לפה";
    let anchor = StubAnchor::resolving(
        "place-hazan",
        anchor_batch(vec![review(text, 8)], 4.0, 50),
    );
    let chatter = chatter_batch(vec![raw(SignalSource::Tiktok, text, 3)]);
    let (store, ingestor) = build(anchor, chatter, NoDelivery).await;

    let outcome = ingestor.scan_target(&hazan_target()).await.unwrap();
    assert_eq!(outcome.stats.signals_stored, 1);
    assert_eq!(outcome.stats.signals_duplicate, 1);

    let venue = store
        .find_venue_by_place_ref("place-hazan")
        .await
        .unwrap()
        .unwrap();
    let signals = store.signals_for_venue(venue.id).await.unwrap();
    assert_eq!(signals.len(), 1);
    // First occurrence wins; the anchor batch is walked first.
    assert_eq!(signals[0].source, SignalSource::Google);
}

#[tokio::test]
async fn sentiment_and_decay_weight_are_frozen_on_the_signal() {
    let anchor = StubAnchor::resolving(
        "place-hazan",
        anchor_batch(vec![review("מעולה, חוויה מטורפת", 6)], 4.5, 120),
    );
    let (store, ingestor) = build(anchor, chatter_batch(vec![]), NoDelivery).await;

    ingestor.scan_target(&hazan_target()).await.unwrap();

    let venue = store
        .find_venue_by_place_ref("place-hazan")
        .await
        .unwrap()
        .unwrap();
    let signals = store.signals_for_venue(venue.id).await.unwrap();
    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].sentiment, 0.9);
    // Six hours old: boost is 3 - 2*(6/24) = 2.5.
    assert!((signals[0].weight - 2.5).abs() < 0.01);
}

#[tokio::test]
async fn missing_rating_and_delivery_fall_back_to_neutral_parts() {
    let anchor = StubAnchor::resolving(
        "place-quiet",
        SignalBatch {
            signals: vec![review("בסדר גמור", 240)],
            anchor_rating: None,
            anchor_rating_count: 0,
        },
    );
    let (store, ingestor) = build(anchor, chatter_batch(vec![]), NoDelivery).await;

    ingestor.scan_target(&hazan_target()).await.unwrap();

    let venue = store
        .find_venue_by_place_ref("place-quiet")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(venue.anchor_rating, None);
    // Prior anchor (28) + no mentions (0) + one neutral signal (7.5) +
    // unlisted delivery (10).
    assert!((venue.composite_score - 45.5).abs() < 1e-9);
}

// =========================================================================
// Scheduler cycles and on-demand scans
// =========================================================================

fn scheduler_fixture(
    store: Arc<RadarStore>,
    ingestor: Arc<Ingestor>,
    seeds: Vec<SeedTarget>,
) -> Scheduler {
    Scheduler::new(
        ingestor,
        store as Arc<dyn VenueStore>,
        seeds,
        StdDuration::from_secs(1800),
        4,
    )
}

#[tokio::test]
async fn a_cycle_scans_every_seed_and_survives_misses() {
    let anchor = PerQueryAnchor {
        batch: anchor_batch(vec![review("טעים מאוד", 3)], 4.1, 80),
        unresolvable: vec!["מקום שלא קיים".to_string()],
    };
    let (store, ingestor) = build(anchor, chatter_batch(vec![]), NoDelivery).await;
    let scheduler = scheduler_fixture(
        store.clone(),
        ingestor,
        vec![
            SeedTarget::new("שווארמה חזן חיפה", "חיפה"),
            SeedTarget::new("הקוסם תל אביב", "תל אביב"),
            SeedTarget::new("מקום שלא קיים", ""),
        ],
    );

    let stats = scheduler.run_cycle().await;
    assert_eq!(stats.targets, 3);
    assert_eq!(stats.done, 2);
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.failed, 0);
    assert_eq!(stats.signals_stored, 2);

    let ranked = store.ranked_venues(None, 10).await.unwrap();
    assert_eq!(ranked.len(), 2);
}

#[tokio::test]
async fn a_zero_cycle_interval_still_runs_cycles() {
    let anchor = PerQueryAnchor {
        batch: anchor_batch(vec![review("פתוח עד מאוחר", 6)], 4.3, 90),
        unresolvable: vec![],
    };
    let (store, ingestor) = build(anchor, chatter_batch(vec![]), NoDelivery).await;
    let scheduler = Scheduler::new(
        ingestor,
        store.clone() as Arc<dyn VenueStore>,
        vec![hazan_target()],
        StdDuration::ZERO,
        4,
    );

    // The period is floored, so the loop ticks instead of panicking at
    // startup.
    let runner = tokio::spawn(async move { scheduler.run_forever().await });

    let mut appeared = false;
    for _ in 0..100 {
        if store.find_venue_by_name("חזן").await.unwrap().is_some() {
            appeared = true;
            break;
        }
        tokio::time::sleep(StdDuration::from_millis(20)).await;
    }
    runner.abort();
    assert!(appeared, "first cycle never persisted the venue");
}

#[tokio::test]
async fn on_demand_scan_spawns_for_unknown_venues_and_reports_known_ones() {
    let anchor = PerQueryAnchor {
        batch: anchor_batch(vec![review("שווה את הנסיעה", 12)], 4.7, 300),
        unresolvable: vec![],
    };
    let (store, ingestor) = build(anchor, chatter_batch(vec![]), NoDelivery).await;
    let scheduler = scheduler_fixture(store.clone(), ingestor, vec![]);

    // Unknown venue: answer immediately, scan in the background.
    let found = scheduler
        .trigger_scan_if_missing("הקוסם תל אביב", None)
        .await;
    assert!(!found);

    let mut appeared = false;
    for _ in 0..100 {
        if store.find_venue_by_name("הקוסם").await.unwrap().is_some() {
            appeared = true;
            break;
        }
        tokio::time::sleep(StdDuration::from_millis(20)).await;
    }
    assert!(appeared, "background scan never persisted the venue");

    // The stored display name has the city stripped, so the venue is
    // found by its bare name.
    let found = scheduler.trigger_scan_if_missing("הקוסם", None).await;
    assert!(found);
}

#[tokio::test]
async fn an_explicit_city_overrides_query_inference() {
    let anchor = PerQueryAnchor {
        batch: anchor_batch(vec![review("חומוס מהשמיים", 4)], 4.8, 150),
        unresolvable: vec![],
    };
    let (store, ingestor) = build(anchor, chatter_batch(vec![]), NoDelivery).await;
    let scheduler = scheduler_fixture(store.clone(), ingestor, vec![]);

    // "סעיד" alone names no city; the caller supplies one.
    let found = scheduler
        .trigger_scan_if_missing("סעיד", Some("באר שבע"))
        .await;
    assert!(!found);

    let mut venue = None;
    for _ in 0..100 {
        if let Some(v) = store.find_venue_by_name("סעיד").await.unwrap() {
            venue = Some(v);
            break;
        }
        tokio::time::sleep(StdDuration::from_millis(20)).await;
    }
    let venue = venue.expect("background scan never persisted the venue");
    assert_eq!(venue.city, "באר שבע");
    assert_eq!(venue.region, Region::South);
}
