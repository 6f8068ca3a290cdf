//! Address geocoding via the Nominatim search API.

use super::LocationProvider;
use crate::error::{PipelineError, PipelineResult};
use crate::types::GeoCoordinate;
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use serde::Deserialize;

/// Resolves a free-form address string to a coordinate.
///
/// Takes the first (highest-ranked) match; Nominatim orders results by
/// importance.
pub struct NominatimProvider {
    endpoint: String,
    user_agent: String,
    address: String,
    client: reqwest::Client,
}

impl NominatimProvider {
    pub fn new(endpoint: &str, user_agent: &str, address: String) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            user_agent: user_agent.to_string(),
            address,
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Deserialize)]
struct GeoJsonResponse {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    geometry: Geometry,
}

#[derive(Deserialize)]
struct Geometry {
    /// GeoJSON Point order: [lon, lat]
    coordinates: Vec<f64>,
}

/// Extract the first feature's coordinate from a GeoJSON response body.
fn coordinate_from_geojson(body: &str) -> PipelineResult<Option<GeoCoordinate>> {
    let geojson: GeoJsonResponse = serde_json::from_str(body)
        .map_err(|e| PipelineError::Parse(format!("malformed geocoding response: {e}")))?;

    let Some(feature) = geojson.features.into_iter().next() else {
        return Ok(None);
    };
    match feature.geometry.coordinates.as_slice() {
        [lon, lat, ..] => Ok(Some(GeoCoordinate::new(*lat, *lon))),
        _ => Err(PipelineError::Parse(
            "geocoding feature missing point coordinates".to_string(),
        )),
    }
}

#[async_trait]
impl LocationProvider for NominatimProvider {
    fn name(&self) -> &str {
        "nominatim"
    }

    async fn current_fix(&self) -> PipelineResult<GeoCoordinate> {
        let params = [
            ("q", self.address.as_str()),
            ("format", "geojson"),
            ("limit", "1"),
        ];
        let url = reqwest::Url::parse_with_params(&self.endpoint, &params)
            .map_err(|e| PipelineError::LocationUnavailable(format!("bad endpoint: {e}")))?;

        let resp = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| PipelineError::LocationUnavailable(format!("geocoding failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PipelineError::LocationUnavailable(format!(
                "geocoding returned HTTP {status}"
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| PipelineError::LocationUnavailable(format!("geocoding failed: {e}")))?;

        match coordinate_from_geojson(&body) {
            Ok(Some(coordinate)) => Ok(coordinate),
            Ok(None) => Err(PipelineError::LocationUnavailable(format!(
                "no match for address \"{}\"",
                self.address
            ))),
            Err(e) => Err(PipelineError::LocationUnavailable(e.to_string())),
        }
    }
}
