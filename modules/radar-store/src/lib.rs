pub mod store;

pub use store::RadarStore;
