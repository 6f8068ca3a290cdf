//! Provider that returns a caller-supplied coordinate.

use super::LocationProvider;
use crate::error::PipelineResult;
use crate::types::GeoCoordinate;
use async_trait::async_trait;

/// Yields the same coordinate on every call.
///
/// Backs the CLI `--lat`/`--lon` override; also the natural test double.
pub struct FixedProvider {
    coordinate: GeoCoordinate,
}

impl FixedProvider {
    pub fn new(coordinate: GeoCoordinate) -> Self {
        Self { coordinate }
    }
}

#[async_trait]
impl LocationProvider for FixedProvider {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn current_fix(&self) -> PipelineResult<GeoCoordinate> {
        Ok(self.coordinate)
    }
}
