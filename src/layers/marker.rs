use crate::{
    core::geo::{LatLng, LatLngBounds},
    data::dataset::{MapPoint, PointKind},
    layers::filter,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a marker in the controller's ordered marker list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MarkerId(pub usize);

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "marker#{}", self.0)
    }
}

/// Pin colors available to markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerIcon {
    Red,
    Yellow,
    Blue,
    Green,
    LtBlue,
    Orange,
    Pink,
    Purple,
}

impl MarkerIcon {
    /// Fill color as RRGGBB hex
    pub fn hex(&self) -> &'static str {
        match self {
            MarkerIcon::Red => "FF0000",
            MarkerIcon::Yellow => "FFFF00",
            MarkerIcon::Blue => "0000FF",
            MarkerIcon::Green => "00FF00",
            MarkerIcon::LtBlue => "008CFF",
            MarkerIcon::Orange => "F0762D",
            MarkerIcon::Pink => "FF1493",
            MarkerIcon::Purple => "800080",
        }
    }

    pub fn rgb(&self) -> [u8; 3] {
        let hex = self.hex();
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
        [channel(0), channel(2), channel(4)]
    }

    /// Chart-API pin image for this color
    pub fn url(&self) -> String {
        format!(
            "http://chart.apis.google.com/chart?cht=mm&chs=24x32&chco=FFFFFF,{},000000&ext=.png",
            self.hex()
        )
    }

    /// Icon rule: the reference node is red, observations on the voice
    /// channel green, everything else blue
    pub fn for_point(point: &MapPoint, voice_channel: &str) -> Self {
        match &point.kind {
            PointKind::Node { .. } => MarkerIcon::Red,
            PointKind::Observation { channel, .. } if channel.as_deref() == Some(voice_channel) => {
                MarkerIcon::Green
            }
            PointKind::Observation { .. } => MarkerIcon::Blue,
        }
    }
}

impl fmt::Display for MarkerIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MarkerIcon::Red => "red",
            MarkerIcon::Yellow => "yellow",
            MarkerIcon::Blue => "blue",
            MarkerIcon::Green => "green",
            MarkerIcon::LtBlue => "ltblue",
            MarkerIcon::Orange => "orange",
            MarkerIcon::Pink => "pink",
            MarkerIcon::Purple => "purple",
        };
        f.write_str(name)
    }
}

/// A clickable map annotation derived from one dataset point
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    id: MarkerId,
    /// Identifying label; the focus parameter is matched against it
    title: String,
    position: LatLng,
    icon: MarkerIcon,
    popup_content: String,
    age_seconds: i64,
    visible: bool,
}

impl Marker {
    pub fn from_point(id: MarkerId, point: &MapPoint, voice_channel: &str) -> Self {
        Self {
            id,
            title: point.id.clone(),
            position: point.position(),
            icon: MarkerIcon::for_point(point, voice_channel),
            popup_content: point.label.clone(),
            age_seconds: point.age_seconds,
            visible: true,
        }
    }

    pub fn id(&self) -> MarkerId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn icon(&self) -> MarkerIcon {
        self.icon
    }

    pub fn popup_content(&self) -> &str {
        &self.popup_content
    }

    pub fn age_seconds(&self) -> i64 {
        self.age_seconds
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Visibility under an age threshold in seconds
    pub fn passes_age(&self, threshold_secs: i64) -> bool {
        filter::is_visible(self.age_seconds, threshold_secs)
    }

    pub fn bounds(&self) -> LatLngBounds {
        LatLngBounds::new(self.position, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::{Dataset, FieldText, NodeRecord, UserRecord};

    fn user(id: &str, channel: Option<&str>) -> UserRecord {
        UserRecord {
            user_id: FieldText::from(id),
            lat: 1.0,
            lng: 2.0,
            age: 100,
            distance: FieldText::from("3"),
            heard: FieldText::default(),
            posit: FieldText::default(),
            channel: channel.map(str::to_string),
        }
    }

    fn dataset() -> Dataset {
        Dataset {
            node: NodeRecord {
                user_id: FieldText::from("N1"),
                lat: 0.0,
                lng: 0.0,
                age: 0,
                call: FieldText::from("VE4N"),
                number: FieldText::from("1"),
            },
            user: vec![
                user("U1", Some("V-CH")),
                user("U2", Some("D-CH")),
                user("U3", None),
                user("U4", Some("v-ch")),
            ],
        }
    }

    #[test]
    fn test_icon_rule() {
        let icons: Vec<_> = dataset()
            .points()
            .iter()
            .map(|p| MarkerIcon::for_point(p, "V-CH"))
            .collect();
        assert_eq!(
            icons,
            vec![
                MarkerIcon::Red,
                MarkerIcon::Green,
                MarkerIcon::Blue,
                MarkerIcon::Blue,
                MarkerIcon::Blue
            ]
        );
    }

    #[test]
    fn test_marker_from_point() {
        let points = dataset().points();
        let marker = Marker::from_point(MarkerId(1), &points[1], "V-CH");

        assert_eq!(marker.id(), MarkerId(1));
        assert_eq!(marker.title(), "U1");
        assert_eq!(marker.position(), LatLng::new(1.0, 2.0));
        assert_eq!(marker.popup_content(), points[1].label);
        assert!(marker.is_visible());
        assert!(marker.passes_age(101));
        assert!(!marker.passes_age(100));
    }

    #[test]
    fn test_icon_colors() {
        assert_eq!(MarkerIcon::Green.rgb(), [0, 255, 0]);
        assert_eq!(MarkerIcon::Orange.rgb(), [0xF0, 0x76, 0x2D]);
        assert!(MarkerIcon::Red.url().contains("chco=FFFFFF,FF0000,000000"));
        assert_eq!(MarkerIcon::LtBlue.to_string(), "ltblue");
    }
}
