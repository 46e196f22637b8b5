pub mod cache_state;
pub mod config;
pub mod registry;
pub mod vin;
pub mod wmi;

pub use cache_state::{CacheState, InsertOutcome, Resolution};
pub use config::RegistryConfig;
pub use registry::{EnrichmentSummary, RegistryAttribute, RegistryResponse};
pub use vin::{CheckDigit, DecodedVin, VinError};
