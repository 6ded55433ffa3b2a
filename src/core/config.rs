//! Configuration for the map view controller
//!
//! Every field has a default matching the node map page, so a partial JSON
//! document only needs to name the values it overrides.

use crate::core::constants::{
    CLUSTER_IMAGE_PATH, DEFAULT_ZOOM, ENGINE_MAX_ZOOM, FIT_PADDING, MAX_CLUSTER_ZOOM, MIN_ZOOM,
    VIEWPORT_SIZE, VOICE_CHANNEL,
};
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapViewConfig {
    /// Zoom the map is created with
    pub default_zoom: u8,
    /// Zoom guard floor
    pub min_zoom: u8,
    /// Highest zoom at which markers are still clustered
    pub max_cluster_zoom: u8,
    pub cluster_image_path: String,
    /// Channel tag that turns an observation marker green
    pub voice_channel: String,
    pub viewport: ViewportConfig,
}

impl MapViewConfig {
    /// Parses a (possibly partial) JSON configuration and validates it
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Zoom used when focusing a marker without an explicit zoom
    pub fn close_up_zoom(&self) -> u8 {
        self.max_cluster_zoom.saturating_add(1)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_zoom > self.default_zoom {
            return Err(MapError::Config(format!(
                "min_zoom {} is above default_zoom {}",
                self.min_zoom, self.default_zoom
            )));
        }
        if self.min_zoom > self.max_cluster_zoom {
            return Err(MapError::Config(format!(
                "min_zoom {} is above max_cluster_zoom {}",
                self.min_zoom, self.max_cluster_zoom
            )));
        }
        if self.close_up_zoom() > ENGINE_MAX_ZOOM {
            return Err(MapError::Config(format!(
                "max_cluster_zoom {} leaves no close-up zoom below {}",
                self.max_cluster_zoom, ENGINE_MAX_ZOOM
            )));
        }
        if self.voice_channel.is_empty() {
            return Err(MapError::Config("voice_channel must not be empty".to_string()));
        }
        self.viewport.validate()
    }
}

impl Default for MapViewConfig {
    fn default() -> Self {
        Self {
            default_zoom: DEFAULT_ZOOM,
            min_zoom: MIN_ZOOM,
            max_cluster_zoom: MAX_CLUSTER_ZOOM,
            cluster_image_path: CLUSTER_IMAGE_PATH.to_string(),
            voice_channel: VOICE_CHANNEL.to_string(),
            viewport: ViewportConfig::default(),
        }
    }
}

/// Pixel size of the hosted view and the padding kept around fitted bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl ViewportConfig {
    fn validate(&self) -> Result<()> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(MapError::Config(format!(
                "viewport size {}x{} must be positive",
                self.width, self.height
            )));
        }
        if self.padding < 0.0 || self.padding * 2.0 >= self.width.min(self.height) {
            return Err(MapError::Config(format!(
                "padding {} does not fit a {}x{} viewport",
                self.padding, self.width, self.height
            )));
        }
        Ok(())
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: VIEWPORT_SIZE.0,
            height: VIEWPORT_SIZE.1,
            padding: FIT_PADDING,
        }
    }
}
