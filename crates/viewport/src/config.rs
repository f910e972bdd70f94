use std::fs;
use std::path::Path;
use std::time::Duration;

use layers::cluster::ClusterConfig;
use scene::camera::FrameLimits;
use scene::visibility::VisibilityProbe;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunables for one map viewport. Every field has a default, so an empty
/// JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    /// Lookahead around the browser viewport for starting initialization.
    pub visibility_margin_px: f64,
    /// Forced initialization when no visibility signal arrives in time.
    pub fallback_timeout_ms: u64,
    /// Delay before a user-triggered retry re-attempts initialization.
    pub retry_delay_ms: u64,
    pub default_zoom: u8,
    pub single_point_zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
    /// Closest-out zoom used when following a hovered supplier.
    pub follow_min_zoom: u8,
    pub cluster_radius_px: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            visibility_margin_px: 200.0,
            fallback_timeout_ms: 3_000,
            retry_delay_ms: 200,
            default_zoom: scene::camera::DEFAULT_ZOOM,
            single_point_zoom: scene::camera::SINGLE_POINT_ZOOM,
            min_zoom: scene::camera::MIN_ZOOM,
            max_zoom: scene::camera::MAX_ZOOM,
            follow_min_zoom: 6,
            cluster_radius_px: 50.0,
        }
    }
}

impl MapConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        let config: MapConfig = serde_json::from_str(payload).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let payload = fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&payload)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_zoom > self.max_zoom {
            return Err(ConfigError::Invalid(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        for (name, zoom) in [
            ("default_zoom", self.default_zoom),
            ("single_point_zoom", self.single_point_zoom),
            ("follow_min_zoom", self.follow_min_zoom),
        ] {
            if zoom < self.min_zoom || zoom > self.max_zoom {
                return Err(ConfigError::Invalid(format!(
                    "{name} {zoom} outside [{}, {}]",
                    self.min_zoom, self.max_zoom
                )));
            }
        }
        if !(self.cluster_radius_px.is_finite() && self.cluster_radius_px > 0.0) {
            return Err(ConfigError::Invalid(
                "cluster_radius_px must be positive".to_string(),
            ));
        }
        if !(self.visibility_margin_px.is_finite() && self.visibility_margin_px >= 0.0) {
            return Err(ConfigError::Invalid(
                "visibility_margin_px must be non-negative".to_string(),
            ));
        }
        Ok(())
    }

    pub fn frame_limits(&self) -> FrameLimits {
        FrameLimits {
            default_zoom: self.default_zoom,
            single_point_zoom: self.single_point_zoom,
            min_zoom: self.min_zoom,
            max_zoom: self.max_zoom,
        }
    }

    pub fn cluster_config(&self) -> ClusterConfig {
        ClusterConfig {
            radius_px: self.cluster_radius_px,
            max_zoom: self.max_zoom,
        }
    }

    pub fn visibility_probe(&self) -> VisibilityProbe {
        VisibilityProbe::new(self.visibility_margin_px)
    }

    pub fn fallback_timeout(&self) -> Duration {
        Duration::from_millis(self.fallback_timeout_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}
