//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

// Flickr rejects radii above 32 km.
const MAX_RADIUS_KM: f64 = 32.0;
const MAX_PER_PAGE: u32 = 500;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.search.radius_km <= 0.0 || self.search.radius_km > MAX_RADIUS_KM {
            return Err(ConfigError::ValidationError(format!(
                "search.radius_km must be in (0, {MAX_RADIUS_KM}]"
            )));
        }
        if self.search.per_page == 0 || self.search.per_page > MAX_PER_PAGE {
            return Err(ConfigError::ValidationError(format!(
                "search.per_page must be in [1, {MAX_PER_PAGE}]"
            )));
        }
        if self.search.radius_units != "km" && self.search.radius_units != "mi" {
            return Err(ConfigError::ValidationError(
                "search.radius_units must be \"km\" or \"mi\"".into(),
            ));
        }
        if self.limits.search_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.search_timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.fetch_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.fetch_timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.decode_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.decode_timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.max_image_bytes_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_bytes_mb must be > 0".into(),
            ));
        }
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "logging.level must be a valid level, got \"{other}\""
                )));
            }
        }
        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "logging.format must be \"pretty\" or \"json\", got \"{other}\""
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_radius() {
        let mut config = Config::default();
        config.search.radius_km = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("radius_km"));
    }

    #[test]
    fn test_validate_rejects_oversized_radius() {
        let mut config = Config::default();
        config.search.radius_km = 50.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("radius_km"));
    }

    #[test]
    fn test_validate_rejects_zero_per_page() {
        let mut config = Config::default();
        config.search.per_page = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("per_page"));
    }

    #[test]
    fn test_validate_rejects_unknown_units() {
        let mut config = Config::default();
        config.search.radius_units = "furlongs".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("radius_units"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.limits.decode_timeout_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("decode_timeout_ms"));
    }

    #[test]
    fn test_validate_rejects_unknown_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("logging.level"));
    }
}
