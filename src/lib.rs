//! # nodemap
//!
//! Map view controller for radio node maps.
//!
//! A dataset of one reference node and the users it heard becomes a set of
//! markers, optionally clustered. Address parameters pick a marker to focus
//! and a zoom, and six age presets hide stale observations. The map engine
//! is reached through [`MapBackend`]; [`HeadlessMap`] is the in-process
//! implementation and the `wasm` feature binds a browser map.

pub mod backend;
pub mod core;
pub mod data;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod traits;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    builder::MapViewBuilder,
    config::MapViewConfig,
    geo::{LatLng, LatLngBounds},
    map::{FocusPlan, MapView, MapViewState},
    viewport::Viewport,
};

pub use crate::data::{
    dataset::{Dataset, MapPoint, PointKind},
    params::{parse_display_params, DisplayParams, MapStyle},
};

pub use crate::layers::{
    cluster::{ClusterLayer, ClusterOptions},
    filter::AgeFilter,
    marker::{Marker, MarkerIcon, MarkerId},
};

pub use crate::input::{events::MapEvent, handler::EventQueue};

pub use crate::backend::HeadlessMap;

pub use crate::traits::MapBackend;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dataset error: {0}")]
    Dataset(String),
}

/// Error type alias for convenience
pub type Error = MapError;
