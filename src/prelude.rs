//! Prelude module for common nodemap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use nodemap::prelude::*;`

pub use crate::core::{
    builder::MapViewBuilder,
    config::{MapViewConfig, ViewportConfig},
    geo::{LatLng, LatLngBounds, Point},
    map::{FocusPlan, MapView, MapViewState},
    viewport::Viewport,
};

pub use crate::data::{
    dataset::{Dataset, MapPoint, PointKind},
    params::{parse_display_params, parse_query_vars, DisplayParams, MapStyle},
};

pub use crate::layers::{
    cluster::{ClusterLayer, ClusterOptions},
    filter::AgeFilter,
    marker::{Marker, MarkerIcon, MarkerId},
};

pub use crate::input::{
    events::{EventHandled, EventKind, MapEvent},
    handler::EventQueue,
};

pub use crate::backend::HeadlessMap;
pub use crate::traits::MapBackend;
pub use crate::ui::popup::ActivePopup;

pub use crate::{Error as MapError, Result};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
