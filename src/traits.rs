//! Capability the controller needs from a map engine
//!
//! The engine itself (tiles, projection, gestures, the clustering algorithm)
//! lives behind this trait. `HeadlessMap` implements it in-process; the
//! `wasm` feature binds it to a JavaScript map adapter.

use crate::{
    core::geo::{LatLng, LatLngBounds},
    input::events::{EventKind, MapEvent},
    layers::{cluster::ClusterOptions, marker::Marker, marker::MarkerId},
};

pub trait MapBackend {
    /// Start delivering events of this kind through `poll_event`
    fn subscribe(&mut self, kind: EventKind);

    /// Next pending event, in the order the engine produced them
    fn poll_event(&mut self) -> Option<MapEvent>;

    fn center(&self) -> LatLng;
    fn set_center(&mut self, center: LatLng);

    fn zoom(&self) -> f64;
    /// Changing the zoom makes the engine report `ZoomChanged`
    fn set_zoom(&mut self, zoom: f64);

    /// Show the whole rectangle; the engine picks center and zoom
    fn fit_bounds(&mut self, bounds: &LatLngBounds);

    /// Place a marker on the map with its icon, title and click handling
    fn add_marker(&mut self, marker: &Marker);
    fn set_marker_visible(&mut self, marker: MarkerId, visible: bool);

    /// Open the shared popup on `anchor`, replacing any previous content
    fn open_popup(&mut self, anchor: MarkerId, content: &str);
    fn close_popup(&mut self);

    /// Legend and age filter panel
    fn set_panel_visible(&mut self, visible: bool);

    fn attach_clusterer(&mut self, options: &ClusterOptions, markers: &[MarkerId]);
}
