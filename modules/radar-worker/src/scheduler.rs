//! Repeating scan cycles over the seed list, with bounded parallelism
//! and an on-demand entry point for the API.

use std::sync::Arc;
use std::time::Duration;

use futures::{stream, StreamExt};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::ingest::{Ingestor, ScanStatus};
use crate::seeds::SeedTarget;
use crate::traits::VenueStore;

/// Aggregate counters for one scan cycle.
#[derive(Debug, Default)]
pub struct CycleStats {
    pub targets: u32,
    pub done: u32,
    pub skipped: u32,
    pub failed: u32,
    pub signals_fetched: u32,
    pub signals_stored: u32,
    pub signals_duplicate: u32,
    pub elapsed: Duration,
}

impl std::fmt::Display for CycleStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Scan Cycle Complete ===")?;
        writeln!(f, "Targets scanned:   {}", self.targets)?;
        writeln!(f, "  done:            {}", self.done)?;
        writeln!(f, "  skipped:         {}", self.skipped)?;
        writeln!(f, "  failed:          {}", self.failed)?;
        writeln!(f, "Signals fetched:   {}", self.signals_fetched)?;
        writeln!(f, "Signals stored:    {}", self.signals_stored)?;
        writeln!(f, "Signals duplicate: {}", self.signals_duplicate)?;
        write!(f, "Elapsed:           {:.1}s", self.elapsed.as_secs_f64())
    }
}

pub struct Scheduler {
    ingestor: Arc<Ingestor>,
    store: Arc<dyn VenueStore>,
    seeds: Vec<SeedTarget>,
    cycle_interval: Duration,
    max_concurrent: usize,
}

impl Scheduler {
    pub fn new(
        ingestor: Arc<Ingestor>,
        store: Arc<dyn VenueStore>,
        seeds: Vec<SeedTarget>,
        cycle_interval: Duration,
        max_concurrent: usize,
    ) -> Self {
        Self {
            ingestor,
            store,
            seeds,
            // tokio::time::interval panics on a zero period.
            cycle_interval: cycle_interval.max(Duration::from_secs(1)),
            max_concurrent: max_concurrent.max(1),
        }
    }

    pub fn seed_count(&self) -> usize {
        self.seeds.len()
    }

    /// Run scan cycles forever. The first cycle starts immediately;
    /// later ones follow the configured interval and never overlap.
    pub async fn run_forever(&self) {
        let mut ticker = tokio::time::interval(self.cycle_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let stats = self.run_cycle().await;
            info!("{stats}");
        }
    }

    /// One pass over the seed list. A failed target never takes the
    /// cycle down with it.
    pub async fn run_cycle(&self) -> CycleStats {
        let started = std::time::Instant::now();
        info!(targets = self.seeds.len(), "Scan cycle starting");

        let results: Vec<_> = stream::iter(self.seeds.clone().into_iter().map(|target| {
            let ingestor = Arc::clone(&self.ingestor);
            async move {
                let result = ingestor.scan_target(&target).await;
                (target, result)
            }
        }))
        .buffer_unordered(self.max_concurrent)
        .collect()
        .await;

        let mut stats = CycleStats {
            targets: self.seeds.len() as u32,
            ..CycleStats::default()
        };
        for (target, result) in results {
            match result {
                Ok(outcome) => {
                    match outcome.status {
                        ScanStatus::Done => stats.done += 1,
                        ScanStatus::Skipped => stats.skipped += 1,
                    }
                    stats.signals_fetched += outcome.stats.signals_fetched;
                    stats.signals_stored += outcome.stats.signals_stored;
                    stats.signals_duplicate += outcome.stats.signals_duplicate;
                }
                Err(e) => {
                    warn!(query = target.query.as_str(), error = %e, "Target scan failed");
                    stats.failed += 1;
                }
            }
        }
        stats.elapsed = started.elapsed();
        stats
    }

    /// On-demand hook for the API: true when a tracked venue already
    /// covers the query, false when a background scan was spawned for it.
    /// The caller gets an answer immediately either way. An explicit
    /// `city` overrides the trailing-city inference on the query.
    pub async fn trigger_scan_if_missing(&self, query: &str, city: Option<&str>) -> bool {
        match self.store.find_venue_by_name(query).await {
            Ok(Some(venue)) => {
                info!(query, venue = venue.name.as_str(), "Scan request already covered");
                true
            }
            Ok(None) => {
                self.spawn_scan(query, city);
                false
            }
            Err(e) => {
                warn!(query, error = %e, "Venue lookup failed, spawning scan anyway");
                self.spawn_scan(query, city);
                false
            }
        }
    }

    fn spawn_scan(&self, query: &str, city: Option<&str>) {
        let target = match city {
            Some(city) => SeedTarget::new(query, city),
            None => SeedTarget::from_query(query),
        };
        info!(
            query = target.query.as_str(),
            city = target.city.as_str(),
            "Spawning on-demand scan"
        );
        let ingestor = Arc::clone(&self.ingestor);
        tokio::spawn(async move {
            match ingestor.scan_target(&target).await {
                Ok(outcome) => info!(
                    query = target.query.as_str(),
                    status = ?outcome.status,
                    "On-demand scan finished"
                ),
                Err(e) => {
                    warn!(query = target.query.as_str(), error = %e, "On-demand scan failed")
                }
            }
        });
    }
}
