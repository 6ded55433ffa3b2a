use crate::core::geo::LatLngBounds;
use crate::layers::marker::MarkerId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Events delivered by the map backend to the controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MapEvent {
    /// A marker was clicked
    MarkerClick { marker: MarkerId },
    /// The view zoom changed, for any reason
    ZoomChanged { zoom: f64 },
    /// A cluster icon was clicked; carries the cluster's bounds
    ClusterClick { bounds: LatLngBounds },
    /// The user dismissed the info popup
    PopupClosed,
}

/// Event categories a controller can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    MarkerClick,
    ZoomChanged,
    ClusterClick,
    PopupClosed,
}

impl MapEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            MapEvent::MarkerClick { .. } => EventKind::MarkerClick,
            MapEvent::ZoomChanged { .. } => EventKind::ZoomChanged,
            MapEvent::ClusterClick { .. } => EventKind::ClusterClick,
            MapEvent::PopupClosed => EventKind::PopupClosed,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::MarkerClick => "click",
            EventKind::ZoomChanged => "zoom_changed",
            EventKind::ClusterClick => "clusterclick",
            EventKind::PopupClosed => "closeclick",
        };
        f.write_str(name)
    }
}

/// Whether an event changed controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventHandled {
    Handled,
    NotHandled,
}
