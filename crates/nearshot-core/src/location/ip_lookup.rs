//! IP-based geolocation provider.
//!
//! Queries an ip-api-style endpoint that geolocates the caller's public
//! address. Accuracy is city-level at best, which is enough to seed a
//! multi-kilometer photo search.

use super::LocationProvider;
use crate::error::{PipelineError, PipelineResult};
use crate::types::GeoCoordinate;
use async_trait::async_trait;
use serde::Deserialize;

pub struct IpLookupProvider {
    endpoint: String,
    client: reqwest::Client,
}

impl IpLookupProvider {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Deserialize)]
struct LookupResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

#[async_trait]
impl LocationProvider for IpLookupProvider {
    fn name(&self) -> &str {
        "ip-lookup"
    }

    async fn current_fix(&self) -> PipelineResult<GeoCoordinate> {
        let resp = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| PipelineError::LocationUnavailable(format!("lookup failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PipelineError::LocationUnavailable(format!(
                "lookup returned HTTP {status}"
            )));
        }

        let lookup: LookupResponse = resp.json().await.map_err(|e| {
            PipelineError::LocationUnavailable(format!("malformed lookup response: {e}"))
        })?;

        if lookup.status != "success" {
            return Err(PipelineError::LocationUnavailable(format!(
                "lookup rejected: {}",
                lookup.message.unwrap_or_else(|| lookup.status.clone())
            )));
        }

        match (lookup.lat, lookup.lon) {
            (Some(lat), Some(lon)) => Ok(GeoCoordinate::new(lat, lon)),
            _ => Err(PipelineError::LocationUnavailable(
                "lookup response missing coordinates".to_string(),
            )),
        }
    }
}
