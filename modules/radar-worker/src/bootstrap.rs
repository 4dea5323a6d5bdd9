//! Wires the concrete store, adapters, and scheduler from configuration.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use radar_common::Config;
use radar_store::RadarStore;

use crate::adapters::{ChatterAdapter, PlacesAdapter, WoltAdapter};
use crate::ingest::Ingestor;
use crate::scheduler::Scheduler;
use crate::seeds;
use crate::sentiment::SentimentScorer;
use crate::traits::VenueStore;

/// Everything a process needs to scan and serve.
pub struct Runtime {
    pub store: Arc<RadarStore>,
    pub ingestor: Arc<Ingestor>,
    pub scheduler: Arc<Scheduler>,
}

/// Open the database, construct the adapters, and load the seed list.
pub async fn bootstrap(config: &Config) -> Result<Runtime> {
    let store = Arc::new(RadarStore::connect(&config.database_url).await?);
    let seeds = seeds::load_seeds(config.seed_file.as_deref())?;

    let ingestor = Arc::new(Ingestor::new(
        store.clone() as Arc<dyn VenueStore>,
        Arc::new(PlacesAdapter::new(&config.places_api_key)),
        Arc::new(ChatterAdapter::new(&config.chatter_api_token)),
        Arc::new(WoltAdapter::new()),
        Arc::new(SentimentScorer::new(&config.openai_api_key)),
        config.scoring,
    ));
    let scheduler = Arc::new(Scheduler::new(
        Arc::clone(&ingestor),
        store.clone() as Arc<dyn VenueStore>,
        seeds,
        Duration::from_secs(config.cycle_minutes * 60),
        config.max_concurrent_venues,
    ));

    Ok(Runtime {
        store,
        ingestor,
        scheduler,
    })
}
