//! Flickr photo search client.
//!
//! Issues `flickr.photos.search` queries bounded to the configured radius
//! and page size, sorted by distance from the fix, and performs the plain
//! GET that downloads a photo's bytes.

use super::{resolve_env_var, PhotoSearch};
use crate::config::{LimitsConfig, SearchConfig};
use crate::error::{ConfigError, PipelineError, PipelineResult};
use crate::types::{GeoCoordinate, PhotoRecord};
use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use std::time::Duration;

#[derive(Debug)]
pub struct FlickrClient {
    endpoint: String,
    api_key: String,
    radius_km: f64,
    radius_units: String,
    per_page: u32,
    search_timeout: Duration,
    fetch_timeout: Duration,
    client: reqwest::Client,
}

impl FlickrClient {
    /// Build a client from configuration, resolving the API key.
    pub fn from_config(search: &SearchConfig, limits: &LimitsConfig) -> Result<Self, ConfigError> {
        let api_key = resolve_env_var(&search.api_key).ok_or_else(|| {
            ConfigError::ValidationError(
                "Flickr API key not set. Set search.api_key or the FLICKR_API_KEY env var."
                    .to_string(),
            )
        })?;

        Ok(Self {
            endpoint: search.endpoint.clone(),
            api_key,
            radius_km: search.radius_km,
            radius_units: search.radius_units.clone(),
            per_page: search.per_page,
            search_timeout: Duration::from_millis(limits.search_timeout_ms),
            fetch_timeout: Duration::from_millis(limits.fetch_timeout_ms),
            client: reqwest::Client::new(),
        })
    }
}

// --- Response types ---
//
// The REST envelope is `{"stat":"ok",...}` or `{"stat":"fail","message":...}`.
// With `extras=url_s,geo` each photo carries a small-size image URL and its
// coordinates; Flickr serializes the geo fields as strings.

#[derive(Deserialize)]
struct SearchEnvelope {
    stat: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    photos: Option<PhotoPage>,
}

#[derive(Deserialize)]
struct PhotoPage {
    #[serde(default)]
    photo: Vec<PhotoEntry>,
}

#[derive(Deserialize)]
struct PhotoEntry {
    #[serde(default)]
    id: String,
    #[serde(default)]
    owner: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    url_s: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    longitude: Option<f64>,
}

impl PhotoEntry {
    /// Convert to a record, or `None` when the entry is unusable (no
    /// derivable image URL, or empty id/owner).
    fn into_record(self) -> Option<PhotoRecord> {
        if self.id.is_empty() || self.owner.is_empty() {
            return None;
        }
        let url = self.url_s?;
        Some(PhotoRecord {
            id: self.id,
            owner: self.owner,
            url,
            caption: self.title,
            lat: self.latitude.unwrap_or(0.0),
            lon: self.longitude.unwrap_or(0.0),
        })
    }
}

/// Accept a float serialized as either a number or a string.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => None,
        Some(Raw::Num(n)) => Some(n),
        Some(Raw::Text(s)) => s.parse().ok(),
    })
}

/// Parse a search response body into usable records.
///
/// Pure over the body text so it is testable without a server.
fn parse_search_response(body: &str) -> PipelineResult<Vec<PhotoRecord>> {
    let envelope: SearchEnvelope = serde_json::from_str(body)
        .map_err(|e| PipelineError::Parse(format!("malformed search response: {e}")))?;

    if envelope.stat != "ok" {
        return Err(PipelineError::Parse(format!(
            "provider reported \"{}\": {}",
            envelope.stat,
            envelope.message.unwrap_or_default()
        )));
    }

    let page = envelope
        .photos
        .ok_or_else(|| PipelineError::Parse("search response missing photo list".to_string()))?;

    Ok(page
        .photo
        .into_iter()
        .filter_map(PhotoEntry::into_record)
        .collect())
}

#[async_trait]
impl PhotoSearch for FlickrClient {
    fn name(&self) -> &str {
        "flickr"
    }

    async fn search(&self, coordinate: GeoCoordinate) -> PipelineResult<Vec<PhotoRecord>> {
        let params: Vec<(&str, String)> = vec![
            ("method", "flickr.photos.search".to_string()),
            ("api_key", self.api_key.clone()),
            ("format", "json".to_string()),
            ("nojsoncallback", "1".to_string()),
            ("extras", "url_s,geo".to_string()),
            ("sort", "distance".to_string()),
            ("lat", coordinate.lat.to_string()),
            ("lon", coordinate.lon.to_string()),
            ("radius", self.radius_km.to_string()),
            ("radius_units", self.radius_units.clone()),
            ("per_page", self.per_page.to_string()),
        ];
        let url = reqwest::Url::parse_with_params(&self.endpoint, &params)
            .map_err(|e| PipelineError::Parse(format!("invalid search endpoint: {e}")))?;

        let resp = self
            .client
            .get(url)
            .timeout(self.search_timeout)
            .send()
            .await
            .map_err(|e| PipelineError::Network {
                url: self.endpoint.clone(),
                message: format!("search request failed: {e}"),
                status_code: None,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(PipelineError::Network {
                url: self.endpoint.clone(),
                message: format!("search HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        let body = resp.text().await.map_err(|e| PipelineError::Network {
            url: self.endpoint.clone(),
            message: format!("search body read failed: {e}"),
            status_code: None,
        })?;

        let records = parse_search_response(&body)?;
        tracing::debug!(count = records.len(), "search returned records");
        Ok(records)
    }

    async fn fetch_bytes(&self, url: &str) -> PipelineResult<Vec<u8>> {
        let resp = self
            .client
            .get(url)
            .timeout(self.fetch_timeout)
            .send()
            .await
            .map_err(|e| PipelineError::Network {
                url: url.to_string(),
                message: format!("transfer failed: {e}"),
                status_code: None,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PipelineError::Network {
                url: url.to_string(),
                message: format!("HTTP {status}"),
                status_code: Some(status.as_u16()),
            });
        }

        let bytes = resp.bytes().await.map_err(|e| PipelineError::Network {
            url: url.to_string(),
            message: format!("transfer did not complete: {e}"),
            status_code: None,
        })?;

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OK_BODY: &str = r#"{
        "photos": {
            "page": 1, "pages": 3, "perpage": 2, "total": 5,
            "photo": [
                {
                    "id": "54321", "owner": "98765@N00", "secret": "abcd",
                    "server": "65535", "farm": 66, "title": "Boulder flatirons",
                    "ispublic": 1,
                    "latitude": "40.013", "longitude": "-105.285",
                    "url_s": "https://live.staticflickr.com/65535/54321_abcd_m.jpg",
                    "height_s": 160, "width_s": 240
                },
                {
                    "id": "54322", "owner": "11111@N02", "secret": "efgh",
                    "server": "65535", "farm": 66, "title": "No small size",
                    "ispublic": 1,
                    "latitude": 40.02, "longitude": -105.29
                }
            ]
        },
        "stat": "ok"
    }"#;

    #[test]
    fn test_parse_keeps_entries_with_image_url() {
        let records = parse_search_response(OK_BODY).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "54321");
        assert_eq!(records[0].caption, "Boulder flatirons");
        assert_eq!(
            records[0].url,
            "https://live.staticflickr.com/65535/54321_abcd_m.jpg"
        );
    }

    #[test]
    fn test_parse_accepts_string_coordinates() {
        let records = parse_search_response(OK_BODY).unwrap();
        assert_eq!(records[0].lat, 40.013);
        assert_eq!(records[0].lon, -105.285);
    }

    #[test]
    fn test_parse_drops_entries_without_owner() {
        let body = r#"{
            "photos": {"photo": [
                {"id": "1", "owner": "", "title": "orphan",
                 "url_s": "https://live.staticflickr.com/1/1_a_m.jpg"}
            ]},
            "stat": "ok"
        }"#;
        assert!(parse_search_response(body).unwrap().is_empty());
    }

    #[test]
    fn test_parse_empty_photo_list() {
        let body = r#"{"photos": {"photo": []}, "stat": "ok"}"#;
        assert!(parse_search_response(body).unwrap().is_empty());
    }

    #[test]
    fn test_parse_fail_envelope() {
        let body = r#"{"stat": "fail", "code": 100, "message": "Invalid API Key"}"#;
        let err = parse_search_response(body).unwrap_err();
        assert!(matches!(err, PipelineError::Parse(_)));
        assert!(err.to_string().contains("Invalid API Key"));
    }

    #[test]
    fn test_parse_not_json() {
        let err = parse_search_response("oops").unwrap_err();
        assert!(matches!(err, PipelineError::Parse(_)));
    }

    #[test]
    fn test_from_config_requires_api_key() {
        let search = SearchConfig {
            api_key: "${DEFINITELY_NOT_SET_XYZ_123}".to_string(),
            ..SearchConfig::default()
        };
        let err = FlickrClient::from_config(&search, &LimitsConfig::default()).unwrap_err();
        assert!(err.to_string().contains("API key"));
    }

    #[test]
    fn test_from_config_with_literal_key() {
        let search = SearchConfig {
            api_key: "literal-key".to_string(),
            ..SearchConfig::default()
        };
        let client = FlickrClient::from_config(&search, &LimitsConfig::default()).unwrap();
        assert_eq!(client.api_key, "literal-key");
        assert_eq!(client.per_page, 100);
    }
}
