pub mod adapters;
pub mod bootstrap;
pub mod ingest;
pub mod scheduler;
pub mod scoring;
pub mod seeds;
pub mod sentiment;
pub mod traits;

pub use bootstrap::Runtime;
pub use ingest::{IngestStats, Ingestor, ScanOutcome, ScanStatus};
pub use scheduler::{CycleStats, Scheduler};
pub use seeds::SeedTarget;
