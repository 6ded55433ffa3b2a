use crate::{
    core::{
        config::MapViewConfig,
        geo::{LatLng, LatLngBounds},
    },
    data::{
        dataset::{Dataset, MapPoint},
        params::DisplayParams,
    },
    input::events::{EventHandled, EventKind, MapEvent},
    layers::{
        cluster::{ClusterLayer, ClusterOptions},
        filter::AgeFilter,
        marker::{Marker, MarkerId},
    },
    traits::MapBackend,
    ui::popup::{ActivePopup, PopupSlot},
};

/// Everything the controller owns between events
#[derive(Debug, Clone, PartialEq)]
pub struct MapViewState {
    pub markers: Vec<Marker>,
    pub bounds: LatLngBounds,
    pub params: DisplayParams,
    pub popup: PopupSlot,
    pub cluster: Option<ClusterLayer>,
    pub panel_visible: bool,
    /// Threshold of the last age filter applied, if any
    pub age_threshold: Option<i64>,
}

impl MapViewState {
    fn new(params: DisplayParams) -> Self {
        Self {
            markers: Vec::new(),
            bounds: LatLngBounds::empty(),
            params,
            popup: PopupSlot::new(),
            cluster: None,
            panel_visible: true,
            age_threshold: None,
        }
    }

    pub fn marker(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.get(id.0).filter(|m| m.id() == id)
    }

    /// First marker whose title matches exactly
    pub fn find_by_title(&self, title: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.title() == title)
    }
}

/// Where the initial view goes
#[derive(Debug, Clone, PartialEq)]
pub enum FocusPlan {
    Marker {
        marker: MarkerId,
        center: LatLng,
        zoom: f64,
    },
    FitBounds,
}

impl FocusPlan {
    /// Decides the initial view from the focus parameters.
    ///
    /// A non-empty focus id selects the first marker with that exact title;
    /// a positive zoom parameter overrides `close_up_zoom`. No focus id or no
    /// matching marker means showing everything.
    pub fn resolve(params: &DisplayParams, markers: &[Marker], close_up_zoom: u8) -> Self {
        let Some(focus_id) = params.focus() else {
            return FocusPlan::FitBounds;
        };

        match markers.iter().find(|m| m.title() == focus_id) {
            Some(marker) => {
                let zoom = match params.zoom {
                    Some(zoom) if zoom > 0 => f64::from(zoom),
                    _ => f64::from(close_up_zoom),
                };
                FocusPlan::Marker {
                    marker: marker.id(),
                    center: marker.position(),
                    zoom,
                }
            }
            None => FocusPlan::FitBounds,
        }
    }
}

/// Controller for one map view.
///
/// All mutation goes through `&mut self` plus the backend handed in by the
/// caller; handlers run one at a time and read the backend fresh each time.
#[derive(Debug, Clone)]
pub struct MapView {
    config: MapViewConfig,
    state: MapViewState,
}

impl MapView {
    /// Builds markers, resolves the display style, installs the zoom guard
    /// and applies the initial focus. Pending engine events are drained
    /// before returning.
    pub fn initialize(
        dataset: &Dataset,
        params: DisplayParams,
        config: MapViewConfig,
        backend: &mut dyn MapBackend,
    ) -> Self {
        let mut view = Self {
            config,
            state: MapViewState::new(params),
        };

        let node = MapPoint::from(&dataset.node);
        backend.set_center(node.position());
        backend.set_zoom(f64::from(view.config.default_zoom));

        for point in dataset.points() {
            view.make_marker(&point, backend);
        }
        backend.subscribe(EventKind::MarkerClick);
        backend.subscribe(EventKind::PopupClosed);

        view.apply_display_style(backend);

        backend.subscribe(EventKind::ZoomChanged);

        let plan = view.resolve_focus(backend);
        log::debug!(
            "map view ready: {} markers, clustered: {}, focus: {:?}",
            view.state.markers.len(),
            view.is_clustered(),
            plan
        );

        view.pump(backend);
        view
    }

    /// Creates the marker for `point`, places it and records it in the
    /// ordered marker list and the bounds
    pub fn make_marker(&mut self, point: &MapPoint, backend: &mut dyn MapBackend) -> MarkerId {
        let id = MarkerId(self.state.markers.len());
        let marker = Marker::from_point(id, point, &self.config.voice_channel);
        if !marker.position().is_valid() {
            log::warn!("{} ({}) is off the globe: {:?}", id, point.id, marker.position());
        }

        backend.add_marker(&marker);
        self.state.bounds.extend(&marker.position());
        self.state.markers.push(marker);
        id
    }

    /// Either a clustering layer over every marker with the panel hidden,
    /// or no layer and the panel shown
    fn apply_display_style(&mut self, backend: &mut dyn MapBackend) {
        if self.state.params.wants_clustering() {
            let options = ClusterOptions::from_config(&self.config);
            let members: Vec<_> = self.state.markers.iter().map(Marker::id).collect();

            backend.attach_clusterer(&options, &members);
            backend.subscribe(EventKind::ClusterClick);
            backend.set_panel_visible(false);

            self.state.cluster = Some(ClusterLayer::new(options, members));
            self.state.panel_visible = false;
        } else {
            backend.set_panel_visible(true);
            self.state.cluster = None;
            self.state.panel_visible = true;
        }
    }

    /// Centers on the focus marker or fits all markers
    pub fn resolve_focus(&mut self, backend: &mut dyn MapBackend) -> FocusPlan {
        let plan = FocusPlan::resolve(
            &self.state.params,
            &self.state.markers,
            self.config.close_up_zoom(),
        );

        match &plan {
            FocusPlan::Marker { center, zoom, .. } => {
                backend.set_center(*center);
                backend.set_zoom(*zoom);
            }
            FocusPlan::FitBounds => {
                if self.state.params.focus().is_some() {
                    log::debug!("focus id {:?} matched no marker", self.state.params.focus_id);
                }
                backend.fit_bounds(&self.state.bounds);
            }
        }

        plan
    }

    /// Shows markers younger than `threshold_secs` and hides the rest.
    /// Returns how many markers are visible afterwards.
    pub fn toggle_markers(&mut self, threshold_secs: i64, backend: &mut dyn MapBackend) -> usize {
        let mut visible_count = 0;

        for marker in &mut self.state.markers {
            let visible = marker.passes_age(threshold_secs);
            marker.set_visible(visible);
            backend.set_marker_visible(marker.id(), visible);

            if visible {
                visible_count += 1;
            } else if self.state.popup.is_anchored_to(marker.id()) {
                self.state.popup.close();
                backend.close_popup();
            }
        }

        self.state.age_threshold = Some(threshold_secs);
        log::debug!(
            "age filter {}s: {}/{} markers visible",
            threshold_secs,
            visible_count,
            self.state.markers.len()
        );
        visible_count
    }

    pub fn apply_filter(&mut self, filter: AgeFilter, backend: &mut dyn MapBackend) -> usize {
        self.toggle_markers(filter.threshold_secs(), backend)
    }

    /// Dispatches one engine event
    pub fn handle_event(&mut self, event: MapEvent, backend: &mut dyn MapBackend) -> EventHandled {
        match event {
            MapEvent::MarkerClick { marker } => self.on_marker_click(marker, backend),
            MapEvent::ZoomChanged { .. } => self.on_zoom_changed(backend),
            MapEvent::ClusterClick { bounds } => self.on_cluster_click(&bounds, backend),
            MapEvent::PopupClosed => {
                self.state.popup.close();
                EventHandled::Handled
            }
        }
    }

    /// Handles pending engine events until the backend has none left.
    /// Returns the number of events processed.
    pub fn pump(&mut self, backend: &mut dyn MapBackend) -> usize {
        let mut processed = 0;
        while let Some(event) = backend.poll_event() {
            self.handle_event(event, backend);
            processed += 1;
        }
        processed
    }

    fn on_marker_click(&mut self, id: MarkerId, backend: &mut dyn MapBackend) -> EventHandled {
        let Some(marker) = self.state.marker(id) else {
            log::warn!("click on unknown {}", id);
            return EventHandled::NotHandled;
        };

        let content = marker.popup_content().to_string();
        backend.open_popup(id, &content);
        self.state.popup.open(id, content);
        EventHandled::Handled
    }

    /// Zoom guard: never let the view settle below the minimum zoom
    fn on_zoom_changed(&mut self, backend: &mut dyn MapBackend) -> EventHandled {
        let min_zoom = f64::from(self.config.min_zoom);
        if backend.zoom() < min_zoom {
            backend.set_zoom(min_zoom);
            EventHandled::Handled
        } else {
            EventHandled::NotHandled
        }
    }

    fn on_cluster_click(
        &mut self,
        bounds: &LatLngBounds,
        backend: &mut dyn MapBackend,
    ) -> EventHandled {
        let Some(cluster) = &self.state.cluster else {
            return EventHandled::NotHandled;
        };
        if !cluster.options().zoom_on_click {
            return EventHandled::NotHandled;
        }

        backend.fit_bounds(bounds);
        if let Some(zoom) = cluster.clamp_click_zoom(backend.zoom()) {
            backend.set_zoom(zoom);
        }
        EventHandled::Handled
    }

    pub fn config(&self) -> &MapViewConfig {
        &self.config
    }

    pub fn state(&self) -> &MapViewState {
        &self.state
    }

    pub fn markers(&self) -> &[Marker] {
        &self.state.markers
    }

    pub fn marker(&self, id: MarkerId) -> Option<&Marker> {
        self.state.marker(id)
    }

    pub fn bounds(&self) -> &LatLngBounds {
        &self.state.bounds
    }

    pub fn params(&self) -> &DisplayParams {
        &self.state.params
    }

    pub fn popup(&self) -> Option<&ActivePopup> {
        self.state.popup.active()
    }

    pub fn cluster(&self) -> Option<&ClusterLayer> {
        self.state.cluster.as_ref()
    }

    pub fn is_clustered(&self) -> bool {
        self.state.cluster.is_some()
    }

    pub fn panel_visible(&self) -> bool {
        self.state.panel_visible
    }

    pub fn age_threshold(&self) -> Option<i64> {
        self.state.age_threshold
    }

    pub fn visible_markers(&self) -> impl Iterator<Item = &Marker> {
        self.state.markers.iter().filter(|m| m.is_visible())
    }
}
