// Export our modules for use in binaries and tests
pub mod config;
pub mod map;
pub mod net;

pub use config::{AppConfig, LayerSource};
pub use net::CensusClient;
