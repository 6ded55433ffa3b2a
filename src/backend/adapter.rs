//! Backend over an external map engine reached through a thin adapter.
//!
//! The engine owns the view; `AdapterMap` forwards commands to it and keeps
//! the controller's event queue. Zoom changes caused by the controller itself
//! are queued here, so the engine's host only has to forward changes made
//! by the user.

use crate::{
    core::geo::{LatLng, LatLngBounds},
    input::{
        events::{EventKind, MapEvent},
        handler::EventQueue,
    },
    layers::{cluster::ClusterOptions, marker::Marker, marker::MarkerId},
    traits::MapBackend,
};

/// Commands an external map engine understands
pub trait MapAdapter {
    /// Start listening for an engine event, named as in [`EventKind`]'s display form
    fn listen(&mut self, event: &str);

    fn center(&self) -> LatLng;
    fn set_center(&mut self, center: LatLng);

    fn zoom(&self) -> f64;
    fn set_zoom(&mut self, zoom: f64);
    fn fit_bounds(&mut self, bounds: &LatLngBounds);

    fn add_marker(&mut self, marker: &Marker);
    fn set_marker_visible(&mut self, marker: MarkerId, visible: bool);

    fn open_popup(&mut self, anchor: MarkerId, content: &str);
    fn close_popup(&mut self);

    fn set_panel_visible(&mut self, visible: bool);
    fn attach_clusterer(&mut self, options: &ClusterOptions, markers: &[MarkerId]);
}

/// `MapBackend` that drives a [`MapAdapter`]
#[derive(Debug)]
pub struct AdapterMap<A> {
    adapter: A,
    events: EventQueue,
}

impl<A: MapAdapter> AdapterMap<A> {
    pub fn new(adapter: A) -> Self {
        Self {
            adapter,
            events: EventQueue::new(),
        }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Queue an event forwarded by the engine's host
    pub fn push_event(&mut self, event: MapEvent) -> bool {
        self.events.emit(event)
    }

    fn report_zoom_change(&mut self, old_zoom: f64) {
        let zoom = self.adapter.zoom();
        if zoom != old_zoom {
            self.events.emit(MapEvent::ZoomChanged { zoom });
        }
    }
}

impl<A: MapAdapter> MapBackend for AdapterMap<A> {
    fn subscribe(&mut self, kind: EventKind) {
        if !self.events.is_subscribed(kind) {
            self.adapter.listen(&kind.to_string());
        }
        self.events.subscribe(kind);
    }

    fn poll_event(&mut self) -> Option<MapEvent> {
        self.events.poll()
    }

    fn center(&self) -> LatLng {
        self.adapter.center()
    }

    fn set_center(&mut self, center: LatLng) {
        self.adapter.set_center(center);
    }

    fn zoom(&self) -> f64 {
        self.adapter.zoom()
    }

    fn set_zoom(&mut self, zoom: f64) {
        let old_zoom = self.adapter.zoom();
        self.adapter.set_zoom(zoom);
        self.report_zoom_change(old_zoom);
    }

    fn fit_bounds(&mut self, bounds: &LatLngBounds) {
        if bounds.is_empty() {
            return;
        }
        let old_zoom = self.adapter.zoom();
        self.adapter.fit_bounds(bounds);
        self.report_zoom_change(old_zoom);
    }

    fn add_marker(&mut self, marker: &Marker) {
        self.adapter.add_marker(marker);
    }

    fn set_marker_visible(&mut self, marker: MarkerId, visible: bool) {
        self.adapter.set_marker_visible(marker, visible);
    }

    fn open_popup(&mut self, anchor: MarkerId, content: &str) {
        self.adapter.open_popup(anchor, content);
    }

    fn close_popup(&mut self) {
        self.adapter.close_popup();
    }

    fn set_panel_visible(&mut self, visible: bool) {
        self.adapter.set_panel_visible(visible);
    }

    fn attach_clusterer(&mut self, options: &ClusterOptions, markers: &[MarkerId]) {
        self.adapter.attach_clusterer(options, markers);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{config::MapViewConfig, map::MapView},
        data::{dataset::Dataset, params::parse_display_params},
    };

    /// Engine stand-in: clamps zoom to 0..=21 and fits every bounds at zoom 12
    #[derive(Debug, Default)]
    struct RecordingEngine {
        listening: Vec<String>,
        center: LatLng,
        zoom: f64,
        zoom_calls: Vec<f64>,
        markers: usize,
        panel_visible: Option<bool>,
    }

    impl MapAdapter for RecordingEngine {
        fn listen(&mut self, event: &str) {
            self.listening.push(event.to_string());
        }

        fn center(&self) -> LatLng {
            self.center
        }

        fn set_center(&mut self, center: LatLng) {
            self.center = center;
        }

        fn zoom(&self) -> f64 {
            self.zoom
        }

        fn set_zoom(&mut self, zoom: f64) {
            self.zoom_calls.push(zoom);
            self.zoom = zoom.clamp(0.0, 21.0);
        }

        fn fit_bounds(&mut self, bounds: &LatLngBounds) {
            self.center = bounds.center();
            self.zoom = 12.0;
        }

        fn add_marker(&mut self, _marker: &Marker) {
            self.markers += 1;
        }

        fn set_marker_visible(&mut self, _marker: MarkerId, _visible: bool) {}

        fn open_popup(&mut self, _anchor: MarkerId, _content: &str) {}

        fn close_popup(&mut self) {}

        fn set_panel_visible(&mut self, visible: bool) {
            self.panel_visible = Some(visible);
        }

        fn attach_clusterer(&mut self, _options: &ClusterOptions, _markers: &[MarkerId]) {}
    }

    fn dataset() -> Dataset {
        Dataset::from_json_str(
            r#"{
                "node": { "user_id": "N1", "lat": 0, "lng": 0, "age": 0 },
                "user": [ { "user_id": "U2", "lat": 3, "lng": 4, "age": 10 } ]
            }"#,
        )
        .unwrap()
    }

    fn initialize(address: &str) -> (MapView, AdapterMap<RecordingEngine>) {
        let mut map = AdapterMap::new(RecordingEngine::default());
        let view = MapView::initialize(
            &dataset(),
            parse_display_params(address),
            MapViewConfig::default(),
            &mut map,
        );
        (view, map)
    }

    #[test]
    fn test_focus_below_min_zoom_settles_at_min_zoom() {
        let (_, map) = initialize("?userid=U2&zoom=1");

        assert_eq!(map.adapter().center, LatLng::new(3.0, 4.0));
        assert_eq!(map.zoom(), 2.0);
        assert_eq!(map.adapter().zoom_calls, vec![5.0, 1.0, 2.0]);
    }

    #[test]
    fn test_own_zoom_changes_are_queued_once_subscribed() {
        let mut map = AdapterMap::new(RecordingEngine::default());
        map.set_zoom(4.0);
        assert_eq!(map.poll_event(), None);

        map.subscribe(EventKind::ZoomChanged);
        map.subscribe(EventKind::ZoomChanged);
        assert_eq!(map.adapter().listening, vec!["zoom_changed"]);

        map.set_zoom(4.0);
        assert_eq!(map.poll_event(), None);

        map.fit_bounds(&LatLngBounds::from_coords(0.0, 0.0, 1.0, 1.0));
        assert_eq!(map.poll_event(), Some(MapEvent::ZoomChanged { zoom: 12.0 }));

        map.fit_bounds(&LatLngBounds::empty());
        assert_eq!(map.poll_event(), None);
    }

    #[test]
    fn test_user_zoom_forwarded_by_host_is_guarded() {
        let (mut view, mut map) = initialize("");
        assert_eq!(map.adapter().markers, 2);
        assert_eq!(map.adapter().panel_visible, Some(true));

        map.adapter.zoom = 0.0;
        assert!(map.push_event(MapEvent::ZoomChanged { zoom: 0.0 }));
        view.pump(&mut map);
        assert_eq!(map.zoom(), 2.0);
        assert_eq!(map.poll_event(), None);
    }
}
