// Trait seams for the ingestion pipeline.
//
// SourceAdapter generalizes the signal platforms: resolve an entity from a
// text query, then pull whatever signals it currently has for a venue.
// DeliveryAdapter covers the delivery platform's two-step slug lookup.
// VenueStore narrows RadarStore to the operations the pipeline performs.
//
// These enable deterministic pipeline tests with in-memory stubs: no
// network, no API keys. `cargo test` in seconds.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use radar_common::{DeliveryLoad, Located, NewVenue, ScoreUpdate, Signal, SignalBatch, Venue};
use radar_store::RadarStore;

// ---------------------------------------------------------------------------
// SourceAdapter — review/chatter platforms
// ---------------------------------------------------------------------------

#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Resolve a free-text query to an entity on this platform. Platforms
    /// that only support keyword search stay with the default `None`.
    async fn locate(&self, _query: &str) -> Result<Option<Located>> {
        Ok(None)
    }

    /// Pull the platform's current signals for a venue. `place_ref` is the
    /// entity id produced by [`locate`](Self::locate) when the platform has
    /// one; keyword platforms search by the venue name instead.
    async fn fetch_signals(
        &self,
        venue_name: &str,
        place_ref: Option<&str>,
    ) -> Result<SignalBatch>;
}

// ---------------------------------------------------------------------------
// DeliveryAdapter — operational enrichment
// ---------------------------------------------------------------------------

#[async_trait]
pub trait DeliveryAdapter: Send + Sync {
    /// Find the platform's id for a venue, if it is listed there at all.
    async fn locate_venue(&self, query: &str) -> Result<Option<String>>;

    /// Operational snapshot for a located venue.
    async fn check_load(&self, venue_ref: &str) -> Result<DeliveryLoad>;
}

// ---------------------------------------------------------------------------
// SentimentClassifier
// ---------------------------------------------------------------------------

#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    /// Score a short text in [-1.0, 1.0]. Implementations degrade to 0.0
    /// (neutral) when classification is unavailable, so callers never have
    /// to handle a failure.
    async fn classify(&self, text: &str) -> f64;
}

// ---------------------------------------------------------------------------
// VenueStore — persistence seam
// ---------------------------------------------------------------------------

#[async_trait]
pub trait VenueStore: Send + Sync {
    async fn get_or_create_venue(&self, defaults: &NewVenue) -> Result<Venue>;
    async fn find_signal(&self, venue_id: Uuid, content: &str) -> Result<Option<Signal>>;
    async fn insert_signal(&self, signal: &Signal) -> Result<bool>;
    async fn signals_for_venue(&self, venue_id: Uuid) -> Result<Vec<Signal>>;
    async fn update_venue_scores(&self, venue_id: Uuid, update: &ScoreUpdate) -> Result<()>;
    async fn find_venue_by_name(&self, needle: &str) -> Result<Option<Venue>>;
}

#[async_trait]
impl VenueStore for RadarStore {
    async fn get_or_create_venue(&self, defaults: &NewVenue) -> Result<Venue> {
        Ok(self.get_or_create_venue(defaults).await?)
    }

    async fn find_signal(&self, venue_id: Uuid, content: &str) -> Result<Option<Signal>> {
        Ok(self.find_signal(venue_id, content).await?)
    }

    async fn insert_signal(&self, signal: &Signal) -> Result<bool> {
        Ok(self.insert_signal(signal).await?)
    }

    async fn signals_for_venue(&self, venue_id: Uuid) -> Result<Vec<Signal>> {
        Ok(self.signals_for_venue(venue_id).await?)
    }

    async fn update_venue_scores(&self, venue_id: Uuid, update: &ScoreUpdate) -> Result<()> {
        Ok(self.update_venue_scores(venue_id, update).await?)
    }

    async fn find_venue_by_name(&self, needle: &str) -> Result<Option<Venue>> {
        Ok(self.find_venue_by_name(needle).await?)
    }
}
