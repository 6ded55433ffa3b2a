use crate::{
    core::{
        config::ViewportConfig,
        geo::{LatLng, LatLngBounds, Point},
        viewport::Viewport,
    },
    input::{
        events::{EventKind, MapEvent},
        handler::EventQueue,
    },
    layers::{
        cluster::{ClusterLayer, ClusterOptions},
        marker::{Marker, MarkerId},
    },
    traits::MapBackend,
    ui::popup::{ActivePopup, PopupSlot},
};

/// In-process map engine.
///
/// Keeps a Web Mercator viewport, the placed markers and the UI chrome the
/// controller drives, and reports zoom changes the way a browser map does.
/// The desktop viewer renders from it and the tests assert against it.
#[derive(Debug)]
pub struct HeadlessMap {
    viewport: Viewport,
    padding: f64,
    events: EventQueue,
    markers: Vec<Marker>,
    popup: PopupSlot,
    panel_visible: bool,
    clusterer: Option<ClusterLayer>,
}

impl HeadlessMap {
    pub fn new(config: &ViewportConfig) -> Self {
        let size = Point::new(config.width, config.height);
        Self::with_viewport(Viewport::new(LatLng::default(), 0.0, size), config.padding)
    }

    pub fn with_viewport(viewport: Viewport, padding: f64) -> Self {
        Self {
            viewport,
            padding,
            events: EventQueue::new(),
            markers: Vec::new(),
            popup: PopupSlot::new(),
            panel_visible: true,
            clusterer: None,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.set_size(Point::new(width, height));
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn marker(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id() == id)
    }

    pub fn visible_markers(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter().filter(|m| m.is_visible())
    }

    pub fn popup(&self) -> Option<&ActivePopup> {
        self.popup.active()
    }

    pub fn panel_visible(&self) -> bool {
        self.panel_visible
    }

    pub fn clusterer(&self) -> Option<&ClusterLayer> {
        self.clusterer.as_ref()
    }

    pub fn pending_events(&self) -> usize {
        self.events.pending_events()
    }

    /// User clicked a marker. Hidden or unknown markers are not clickable.
    pub fn click_marker(&mut self, id: MarkerId) -> bool {
        if !self.marker(id).is_some_and(Marker::is_visible) {
            return false;
        }
        self.events.emit(MapEvent::MarkerClick { marker: id })
    }

    /// User clicked a cluster icon covering `bounds`
    pub fn click_cluster(&mut self, bounds: LatLngBounds) -> bool {
        if self.clusterer.is_none() {
            return false;
        }
        self.events.emit(MapEvent::ClusterClick { bounds })
    }

    /// User closed the popup with its close button
    pub fn dismiss_popup(&mut self) -> bool {
        if self.popup.close().is_none() {
            return false;
        }
        self.events.emit(MapEvent::PopupClosed)
    }

    /// Scroll-wheel style zoom by `delta` levels
    pub fn zoom_by(&mut self, delta: f64) {
        let zoom = self.viewport.zoom + delta;
        self.set_zoom(zoom);
    }

    /// Topmost visible marker within `radius` pixels of a container point
    pub fn marker_at(&self, pixel: Point, radius: f64) -> Option<MarkerId> {
        self.markers
            .iter()
            .rev()
            .filter(|m| m.is_visible())
            .map(|m| (m.id(), self.viewport.lat_lng_to_pixel(&m.position())))
            .find(|(_, p)| p.distance_to(&pixel) <= radius)
            .map(|(id, _)| id)
    }

    fn report_zoom_change(&mut self, old_zoom: f64) {
        if self.viewport.zoom != old_zoom {
            self.events.emit(MapEvent::ZoomChanged {
                zoom: self.viewport.zoom,
            });
        }
    }
}

impl MapBackend for HeadlessMap {
    fn subscribe(&mut self, kind: EventKind) {
        self.events.subscribe(kind);
    }

    fn poll_event(&mut self) -> Option<MapEvent> {
        self.events.poll()
    }

    fn center(&self) -> LatLng {
        self.viewport.center
    }

    fn set_center(&mut self, center: LatLng) {
        self.viewport.set_center(center);
    }

    fn zoom(&self) -> f64 {
        self.viewport.zoom
    }

    fn set_zoom(&mut self, zoom: f64) {
        let old_zoom = self.viewport.zoom;
        self.viewport.set_zoom(zoom);
        self.report_zoom_change(old_zoom);
    }

    fn fit_bounds(&mut self, bounds: &LatLngBounds) {
        let old_zoom = self.viewport.zoom;
        self.viewport.fit_bounds(bounds, self.padding);
        self.report_zoom_change(old_zoom);
    }

    fn add_marker(&mut self, marker: &Marker) {
        self.markers.push(marker.clone());
    }

    fn set_marker_visible(&mut self, marker: MarkerId, visible: bool) {
        if let Some(m) = self.markers.iter_mut().find(|m| m.id() == marker) {
            m.set_visible(visible);
        }
    }

    fn open_popup(&mut self, anchor: MarkerId, content: &str) {
        self.popup.open(anchor, content);
    }

    fn close_popup(&mut self) {
        self.popup.close();
    }

    fn set_panel_visible(&mut self, visible: bool) {
        self.panel_visible = visible;
    }

    fn attach_clusterer(&mut self, options: &ClusterOptions, markers: &[MarkerId]) {
        self.clusterer = Some(ClusterLayer::new(options.clone(), markers.to_vec()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::{MapPoint, PointKind};

    fn marker(id: usize, lat: f64, lng: f64) -> Marker {
        let point = MapPoint {
            id: format!("U{}", id),
            lat,
            lng,
            age_seconds: 0,
            label: String::new(),
            kind: PointKind::Node {
                call: String::new(),
                number: String::new(),
            },
        };
        Marker::from_point(MarkerId(id), &point, "V-CH")
    }

    fn map() -> HeadlessMap {
        HeadlessMap::new(&ViewportConfig::default())
    }

    #[test]
    fn test_zoom_change_reported_only_when_subscribed() {
        let mut map = map();
        map.set_zoom(4.0);
        assert_eq!(map.poll_event(), None);

        map.subscribe(EventKind::ZoomChanged);
        map.set_zoom(6.0);
        map.set_zoom(6.0);
        assert_eq!(map.poll_event(), Some(MapEvent::ZoomChanged { zoom: 6.0 }));
        assert_eq!(map.poll_event(), None);
    }

    #[test]
    fn test_zoom_by_scroll() {
        let mut map = map();
        map.subscribe(EventKind::ZoomChanged);
        map.set_zoom(3.0);
        map.poll_event();

        map.zoom_by(-2.0);
        assert_eq!(map.zoom(), 1.0);
        assert_eq!(map.poll_event(), Some(MapEvent::ZoomChanged { zoom: 1.0 }));
    }

    #[test]
    fn test_click_hidden_marker_ignored() {
        let mut map = map();
        map.subscribe(EventKind::MarkerClick);
        map.add_marker(&marker(0, 0.0, 0.0));
        map.set_marker_visible(MarkerId(0), false);

        assert!(!map.click_marker(MarkerId(0)));
        assert!(!map.click_marker(MarkerId(9)));

        map.set_marker_visible(MarkerId(0), true);
        assert!(map.click_marker(MarkerId(0)));
    }

    #[test]
    fn test_cluster_click_needs_clusterer() {
        let mut map = map();
        map.subscribe(EventKind::ClusterClick);
        assert!(!map.click_cluster(LatLngBounds::from_coords(0.0, 0.0, 1.0, 1.0)));

        map.attach_clusterer(
            &ClusterOptions {
                image_path: "m".to_string(),
                max_zoom: 17,
                zoom_on_click: true,
            },
            &[MarkerId(0)],
        );
        assert!(map.click_cluster(LatLngBounds::from_coords(0.0, 0.0, 1.0, 1.0)));
    }

    #[test]
    fn test_marker_hit_testing() {
        let mut map = map();
        map.add_marker(&marker(0, 0.0, 0.0));
        map.add_marker(&marker(1, 10.0, 10.0));
        map.set_center(LatLng::new(0.0, 0.0));
        map.set_zoom(5.0);

        assert_eq!(map.marker_at(Point::new(600.0, 400.0), 8.0), Some(MarkerId(0)));
        assert_eq!(map.marker_at(Point::new(10.0, 10.0), 8.0), None);

        map.set_marker_visible(MarkerId(0), false);
        assert_eq!(map.marker_at(Point::new(600.0, 400.0), 8.0), None);
    }

    #[test]
    fn test_dismiss_popup() {
        let mut map = map();
        map.subscribe(EventKind::PopupClosed);
        assert!(!map.dismiss_popup());

        map.open_popup(MarkerId(0), "hello");
        assert!(map.dismiss_popup());
        assert!(map.popup().is_none());
        assert_eq!(map.poll_event(), Some(MapEvent::PopupClosed));
    }
}
