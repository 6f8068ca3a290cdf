//! Sub-configuration structs with defaults.

use serde::{Deserialize, Serialize};

/// Photo search provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search REST endpoint
    pub endpoint: String,

    /// Provider API key; `${ENV_VAR}` references are resolved at client
    /// construction time
    pub api_key: String,

    /// Search radius around the fix
    pub radius_km: f64,

    /// Units passed to the provider for the radius
    pub radius_units: String,

    /// Maximum results per search (the provider page size)
    pub per_page: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.flickr.com/services/rest/".to_string(),
            api_key: "${FLICKR_API_KEY}".to_string(),
            radius_km: 5.0,
            radius_units: "km".to_string(),
            per_page: 100,
        }
    }
}

/// Location provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// Endpoint for IP-based geolocation
    pub lookup_endpoint: String,

    /// Endpoint for address geocoding
    pub nominatim_endpoint: String,

    /// User-Agent sent to geocoding services (Nominatim usage policy
    /// requires an identifying agent)
    pub user_agent: String,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            lookup_endpoint: "http://ip-api.com/json".to_string(),
            nominatim_endpoint: "https://nominatim.openstreetmap.org/search".to_string(),
            user_agent: format!("nearshot/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Resource limits and timeouts for the pipeline stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Location fix and search request timeout in milliseconds
    pub search_timeout_ms: u64,

    /// Image download timeout in milliseconds
    pub fetch_timeout_ms: u64,

    /// Decode timeout in milliseconds
    pub decode_timeout_ms: u64,

    /// Maximum downloaded image size in megabytes
    pub max_image_bytes_mb: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            search_timeout_ms: 15000,
            fetch_timeout_ms: 30000,
            decode_timeout_ms: 5000,
            max_image_bytes_mb: 50,
        }
    }
}

/// Map presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Fixed visual inset, in pixels, around the camera bounds
    pub camera_margin_px: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            camera_margin_px: 100,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level ("trace", "debug", "info", "warn", "error")
    pub level: String,

    /// Output format ("pretty" or "json")
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
