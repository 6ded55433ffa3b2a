//! Browser binding: drives a host-side JavaScript map adapter and exposes
//! the controller to the page.
//!
//! The page supplies an object with the methods declared on
//! [`JsMapAdapter`] (usually a thin wrapper over its map library) and
//! forwards engine events to the matching `NodeMap` methods. Zoom changes
//! made by `NodeMap` itself (initial focus, zoom guard, cluster clicks) are
//! handled internally; the page forwards user-driven zoom changes only, or
//! defers the `zoomChanged` call (e.g. with `setTimeout`) so it never runs
//! while another `NodeMap` method is still on the stack.

use crate::{
    backend::adapter::{AdapterMap, MapAdapter},
    core::{
        config::MapViewConfig,
        geo::{LatLng, LatLngBounds},
        map::MapView,
    },
    data::{dataset::Dataset, params::DisplayParams},
    input::events::MapEvent,
    layers::{
        cluster::ClusterOptions,
        filter::AgeFilter,
        marker::{Marker, MarkerId},
    },
    traits::MapBackend,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Element id of the legend/filter panel
const PANEL_ELEMENT_ID: &str = "panel";

#[wasm_bindgen]
extern "C" {
    /// Host object wrapping the page's map engine
    pub type JsMapAdapter;

    #[wasm_bindgen(method, js_name = subscribe)]
    fn js_subscribe(this: &JsMapAdapter, event: &str);

    #[wasm_bindgen(method, js_name = getCenterLat)]
    fn js_center_lat(this: &JsMapAdapter) -> f64;

    #[wasm_bindgen(method, js_name = getCenterLng)]
    fn js_center_lng(this: &JsMapAdapter) -> f64;

    #[wasm_bindgen(method, js_name = setCenter)]
    fn js_set_center(this: &JsMapAdapter, lat: f64, lng: f64);

    #[wasm_bindgen(method, js_name = getZoom)]
    fn js_zoom(this: &JsMapAdapter) -> f64;

    #[wasm_bindgen(method, js_name = setZoom)]
    fn js_set_zoom(this: &JsMapAdapter, zoom: f64);

    #[wasm_bindgen(method, js_name = fitBounds)]
    fn js_fit_bounds(this: &JsMapAdapter, south: f64, west: f64, north: f64, east: f64);

    #[wasm_bindgen(method, js_name = addMarker)]
    fn js_add_marker(
        this: &JsMapAdapter,
        id: u32,
        lat: f64,
        lng: f64,
        title: &str,
        icon_url: &str,
    );

    #[wasm_bindgen(method, js_name = setMarkerVisible)]
    fn js_set_marker_visible(this: &JsMapAdapter, id: u32, visible: bool);

    #[wasm_bindgen(method, js_name = openPopup)]
    fn js_open_popup(this: &JsMapAdapter, id: u32, content: &str);

    #[wasm_bindgen(method, js_name = closePopup)]
    fn js_close_popup(this: &JsMapAdapter);

    #[wasm_bindgen(method, js_name = attachClusterer)]
    fn js_attach_clusterer(this: &JsMapAdapter, ids: &[u32], image_path: &str, max_zoom: u8);
}

fn js_id(marker: MarkerId) -> u32 {
    u32::try_from(marker.0).unwrap_or(u32::MAX)
}

impl MapAdapter for JsMapAdapter {
    fn listen(&mut self, event: &str) {
        self.js_subscribe(event);
    }

    fn center(&self) -> LatLng {
        LatLng::new(self.js_center_lat(), self.js_center_lng())
    }

    fn set_center(&mut self, center: LatLng) {
        self.js_set_center(center.lat, center.lng);
    }

    fn zoom(&self) -> f64 {
        self.js_zoom()
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.js_set_zoom(zoom);
    }

    fn fit_bounds(&mut self, bounds: &LatLngBounds) {
        self.js_fit_bounds(
            bounds.south_west.lat,
            bounds.south_west.lng,
            bounds.north_east.lat,
            bounds.north_east.lng,
        );
    }

    fn add_marker(&mut self, marker: &Marker) {
        let position = marker.position();
        self.js_add_marker(
            js_id(marker.id()),
            position.lat,
            position.lng,
            marker.title(),
            &marker.icon().url(),
        );
    }

    fn set_marker_visible(&mut self, marker: MarkerId, visible: bool) {
        self.js_set_marker_visible(js_id(marker), visible);
    }

    fn open_popup(&mut self, anchor: MarkerId, content: &str) {
        self.js_open_popup(js_id(anchor), content);
    }

    fn close_popup(&mut self) {
        self.js_close_popup();
    }

    fn set_panel_visible(&mut self, visible: bool) {
        let Some(panel) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(PANEL_ELEMENT_ID))
            .and_then(|e| e.dyn_into::<web_sys::HtmlElement>().ok())
        else {
            log::warn!("no #{} element to toggle", PANEL_ELEMENT_ID);
            return;
        };

        let visibility = if visible { "visible" } else { "hidden" };
        if panel.style().set_property("visibility", visibility).is_err() {
            log::warn!("could not set panel visibility");
        }
    }

    fn attach_clusterer(&mut self, options: &ClusterOptions, markers: &[MarkerId]) {
        let ids: Vec<u32> = markers.iter().copied().map(js_id).collect();
        self.js_attach_clusterer(&ids, &options.image_path, options.max_zoom);
    }
}

/// `MapBackend` over the page-provided adapter
pub type WebMap = AdapterMap<JsMapAdapter>;

/// Current page address, or an empty string outside a browser window
fn page_address() -> String {
    web_sys::window()
        .and_then(|w| w.location().href().ok())
        .unwrap_or_default()
}

/// Node map controller exported to the page
#[wasm_bindgen]
pub struct NodeMap {
    view: MapView,
    map: WebMap,
}

#[wasm_bindgen]
impl NodeMap {
    /// Builds the map from the page's dataset JSON and the current address
    #[wasm_bindgen(constructor)]
    pub fn new(data_json: &str, adapter: JsMapAdapter) -> Result<NodeMap, JsValue> {
        #[cfg(target_arch = "wasm32")]
        console_error_panic_hook::set_once();

        let dataset =
            Dataset::from_json_str(data_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let params = DisplayParams::from_address(&page_address());
        let mut map = WebMap::new(adapter);
        let view = MapView::initialize(&dataset, params, MapViewConfig::default(), &mut map);

        Ok(NodeMap { view, map })
    }

    /// Generic age filter; returns the number of visible markers
    #[wasm_bindgen(js_name = toggleMarkers)]
    pub fn toggle_markers(&mut self, threshold_secs: f64) -> usize {
        self.view.toggle_markers(threshold_secs as i64, &mut self.map)
    }

    #[wasm_bindgen(js_name = allMarkers)]
    pub fn all_markers(&mut self) -> usize {
        self.view.apply_filter(AgeFilter::OneYear, &mut self.map)
    }

    #[wasm_bindgen(js_name = thirtyMarkers)]
    pub fn thirty_markers(&mut self) -> usize {
        self.view.apply_filter(AgeFilter::ThirtyDays, &mut self.map)
    }

    #[wasm_bindgen(js_name = tenMarkers)]
    pub fn ten_markers(&mut self) -> usize {
        self.view.apply_filter(AgeFilter::TenDays, &mut self.map)
    }

    #[wasm_bindgen(js_name = sevenMarkers)]
    pub fn seven_markers(&mut self) -> usize {
        self.view.apply_filter(AgeFilter::SevenDays, &mut self.map)
    }

    #[wasm_bindgen(js_name = twoMarkers)]
    pub fn two_markers(&mut self) -> usize {
        self.view.apply_filter(AgeFilter::TwoDays, &mut self.map)
    }

    #[wasm_bindgen(js_name = oneMarkers)]
    pub fn one_markers(&mut self) -> usize {
        self.view.apply_filter(AgeFilter::OneDay, &mut self.map)
    }

    #[wasm_bindgen(js_name = markerClicked)]
    pub fn marker_clicked(&mut self, id: u32) {
        self.dispatch(MapEvent::MarkerClick {
            marker: MarkerId(id as usize),
        });
    }

    #[wasm_bindgen(js_name = zoomChanged)]
    pub fn zoom_changed(&mut self) {
        let zoom = self.map.zoom();
        self.dispatch(MapEvent::ZoomChanged { zoom });
    }

    #[wasm_bindgen(js_name = clusterClicked)]
    pub fn cluster_clicked(&mut self, south: f64, west: f64, north: f64, east: f64) {
        self.dispatch(MapEvent::ClusterClick {
            bounds: LatLngBounds::from_coords(south, west, north, east),
        });
    }

    #[wasm_bindgen(js_name = popupClosed)]
    pub fn popup_closed(&mut self) {
        self.dispatch(MapEvent::PopupClosed);
    }

    fn dispatch(&mut self, event: MapEvent) {
        if self.map.push_event(event) {
            self.view.pump(&mut self.map);
        }
    }
}
