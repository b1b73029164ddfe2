//! planewatch-core: departure spotting logic for OpenSky state vectors.
//!
//! No async, no network: just classification, matching, and formatting.
//! The `planewatch` binary in `planewatch-server` does the fetching and
//! rendering around it.

pub mod config;
pub mod enrich;
pub mod filter;
pub mod matcher;
pub mod opensky;
pub mod pipeline;
pub mod present;
pub mod types;

// Re-export commonly used types at crate root
pub use enrich::AirlineTable;
pub use filter::{ClassifierConfig, StateFilter};
pub use matcher::DepartureMatcher;
pub use pipeline::Pipeline;
pub use present::{PresentationFormatter, PresentationRecord};
pub use types::*;
