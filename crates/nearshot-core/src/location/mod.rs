//! Location providers: one-shot coordinate fixes.
//!
//! Defines the provider trait plus the factory that picks an
//! implementation for a fix request. Every provider yields exactly one
//! fix per call, or an error; none of them stream updates.

mod fixed;
mod ip_lookup;
mod nominatim;

pub use fixed::FixedProvider;
pub use ip_lookup::IpLookupProvider;
pub use nominatim::NominatimProvider;

use crate::config::LocationConfig;
use crate::error::PipelineResult;
use crate::types::GeoCoordinate;
use async_trait::async_trait;

/// Trait that all location providers implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (the pipeline holds an `Arc<dyn LocationProvider>`).
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Provider name for logging (e.g., "ip-lookup", "nominatim").
    fn name(&self) -> &str;

    /// Obtain one high-accuracy coordinate fix.
    ///
    /// Fails with [`crate::error::PipelineError::LocationUnavailable`]
    /// when no fix can be produced.
    async fn current_fix(&self) -> PipelineResult<GeoCoordinate>;
}

/// Where a fix should come from.
#[derive(Debug, Clone)]
pub enum FixSource {
    /// A coordinate supplied directly by the caller
    Coordinate(GeoCoordinate),
    /// A free-form address to geocode
    Address(String),
    /// Geolocate the device from its public IP
    IpLookup,
}

/// Create the provider matching a fix source.
pub fn create_provider(source: FixSource, config: &LocationConfig) -> Box<dyn LocationProvider> {
    match source {
        FixSource::Coordinate(coordinate) => Box::new(FixedProvider::new(coordinate)),
        FixSource::Address(address) => Box::new(NominatimProvider::new(
            &config.nominatim_endpoint,
            &config.user_agent,
            address,
        )),
        FixSource::IpLookup => Box::new(IpLookupProvider::new(&config.lookup_endpoint)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_picks_provider_by_source() {
        let config = LocationConfig::default();

        let fixed = create_provider(
            FixSource::Coordinate(GeoCoordinate::new(40.0, -105.0)),
            &config,
        );
        assert_eq!(fixed.name(), "fixed");

        let geocoded = create_provider(FixSource::Address("Boulder, CO".into()), &config);
        assert_eq!(geocoded.name(), "nominatim");

        let lookup = create_provider(FixSource::IpLookup, &config);
        assert_eq!(lookup.name(), "ip-lookup");
    }
}
