use crate::{core::config::MapViewConfig, layers::marker::MarkerId};
use serde::{Deserialize, Serialize};

/// Options handed to the backend's clusterer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterOptions {
    /// Prefix of the cluster icon images
    pub image_path: String,
    /// Highest zoom at which markers are still grouped
    pub max_zoom: u8,
    /// Whether clicking a cluster zooms into it
    pub zoom_on_click: bool,
}

impl ClusterOptions {
    pub fn from_config(config: &MapViewConfig) -> Self {
        Self {
            image_path: config.cluster_image_path.clone(),
            max_zoom: config.max_cluster_zoom,
            zoom_on_click: true,
        }
    }

    /// Ceiling applied after zooming into a clicked cluster
    pub fn click_zoom_ceiling(&self) -> f64 {
        f64::from(self.max_zoom) + 1.0
    }
}

/// Clustering layer attached over the marker set
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterLayer {
    options: ClusterOptions,
    members: Vec<MarkerId>,
}

impl ClusterLayer {
    pub fn new(options: ClusterOptions, members: Vec<MarkerId>) -> Self {
        Self { options, members }
    }

    pub fn options(&self) -> &ClusterOptions {
        &self.options
    }

    pub fn members(&self) -> &[MarkerId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Zoom to keep after the backend fitted a clicked cluster's bounds
    pub fn clamp_click_zoom(&self, fitted_zoom: f64) -> Option<f64> {
        (fitted_zoom > f64::from(self.options.max_zoom)).then(|| self.options.click_zoom_ceiling())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_config() {
        let options = ClusterOptions::from_config(&MapViewConfig::default());
        assert_eq!(options.image_path, "mapcluster.d/m");
        assert_eq!(options.max_zoom, 17);
        assert!(options.zoom_on_click);
        assert_eq!(options.click_zoom_ceiling(), 18.0);
    }

    #[test]
    fn test_click_zoom_clamp() {
        let layer = ClusterLayer::new(
            ClusterOptions::from_config(&MapViewConfig::default()),
            vec![MarkerId(0), MarkerId(1)],
        );
        assert_eq!(layer.len(), 2);
        assert_eq!(layer.members()[1], MarkerId(1));
        assert_eq!(layer.clamp_click_zoom(12.0), None);
        assert_eq!(layer.clamp_click_zoom(17.0), None);
        assert_eq!(layer.clamp_click_zoom(21.0), Some(18.0));
    }
}
