pub mod config;
pub mod error;
pub mod regions;
pub mod types;

pub use config::{Config, ScoringParams};
pub use error::{RadarError, Result};
pub use regions::{classify, Region};
pub use types::*;
