//! nearshot-core — locate the device, find a photo taken nearby, show it.
//!
//! # Architecture
//!
//! The crate is one sequential pipeline plus the adapters that present
//! its result:
//!
//! ```text
//! Fix (LocationProvider) → Search (PhotoSearch) → Fetch → Decode
//!                                                           │
//!                                  DisplayAdapter / MapAdapter
//! ```
//!
//! Exactly one run executes at a time; each run delivers exactly one
//! terminal [`pipeline::SearchOutcome`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use nearshot_core::{Config, FlickrClient, ImageDecoder, SearchPipeline};
//! use nearshot_core::location::{create_provider, FixSource};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> nearshot_core::Result<()> {
//!     let config = Config::load()?;
//!     let location = create_provider(FixSource::IpLookup, &config.location);
//!     let search = FlickrClient::from_config(&config.search, &config.limits)?;
//!     let pipeline = SearchPipeline::new(
//!         Arc::from(location),
//!         Arc::new(search),
//!         ImageDecoder::new(config.limits.clone()),
//!     );
//!     let outcome = pipeline.run().await;
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod location;
pub mod pipeline;
pub mod present;
pub mod search;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, NearshotError, PipelineError, PipelineResult, Result};
pub use pipeline::{DecodedImage, ImageDecoder, SearchOutcome, SearchPipeline};
pub use present::{DisplayAdapter, DisplaySurface, MapAdapter, MapRenderer};
pub use search::{FlickrClient, PhotoSearch};
pub use types::{GeoBounds, GeoCoordinate, PhotoRecord};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
