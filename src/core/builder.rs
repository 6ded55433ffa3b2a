//! Map view builder for fluent configuration
//!
//! Collects the dataset, the display parameters and the configuration, and
//! initializes a `MapView` against a backend in one go.

use crate::{
    backend::HeadlessMap,
    core::{config::MapViewConfig, map::MapView},
    data::{dataset::Dataset, params::DisplayParams},
    traits::MapBackend,
    MapError, Result,
};

/// Builder for creating and configuring MapView instances
#[derive(Debug, Clone, Default)]
pub struct MapViewBuilder {
    dataset: Option<Dataset>,
    params: DisplayParams,
    config: MapViewConfig,
}

impl MapViewBuilder {
    /// Create a new MapViewBuilder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dataset(mut self, dataset: Dataset) -> Self {
        self.dataset = Some(dataset);
        self
    }

    /// Read display parameters from a page address
    pub fn address(mut self, address: &str) -> Self {
        self.params = DisplayParams::from_address(address);
        self
    }

    pub fn params(mut self, params: DisplayParams) -> Self {
        self.params = params;
        self
    }

    pub fn config(mut self, config: MapViewConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the lowest zoom the view may settle at
    pub fn min_zoom(mut self, zoom: u8) -> Self {
        self.config.min_zoom = zoom;
        self
    }

    /// Set the highest zoom at which markers are clustered
    pub fn max_cluster_zoom(mut self, zoom: u8) -> Self {
        self.config.max_cluster_zoom = zoom;
        self
    }

    pub fn voice_channel(mut self, channel: impl Into<String>) -> Self {
        self.config.voice_channel = channel.into();
        self
    }

    /// Validate the configuration and initialize the view on `backend`
    pub fn build(self, backend: &mut dyn MapBackend) -> Result<MapView> {
        self.config.validate()?;
        let dataset = self
            .dataset
            .ok_or_else(|| MapError::Dataset("no dataset provided".to_string()))?;

        Ok(MapView::initialize(&dataset, self.params, self.config, backend))
    }

    /// Same as `build`, on a fresh in-process backend sized from the config
    pub fn build_headless(self) -> Result<(MapView, HeadlessMap)> {
        let mut map = HeadlessMap::new(&self.config.viewport);
        let view = self.build(&mut map)?;
        Ok((view, map))
    }
}
