//! Dataset handed over by the hosting page: one reference node and the
//! users heard by it.

use crate::core::constants::NODE_SUBTITLE;
use crate::core::geo::LatLng;
use crate::Result;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;

/// Text field that the page may deliver either as a JSON string or number
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldText(String);

impl FieldText {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FieldText {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for FieldText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for FieldText {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => s,
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        };
        Ok(Self(text))
    }
}

/// Ages arrive as whole seconds, but fractional values are truncated rather
/// than rejected.
fn deserialize_age<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match &value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .ok_or_else(|| serde::de::Error::custom(format!("age out of range: {}", n))),
        serde_json::Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| serde::de::Error::custom(format!("age is not an integer: {:?}", s))),
        serde_json::Value::Null => Ok(0),
        other => Err(serde::de::Error::custom(format!(
            "age must be a number, got {}",
            other
        ))),
    }
}

/// Reference node record (`mapData.node`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub user_id: FieldText,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, deserialize_with = "deserialize_age")]
    pub age: i64,
    #[serde(default)]
    pub call: FieldText,
    #[serde(default)]
    pub number: FieldText,
}

/// Observed user record (`mapData.user[]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: FieldText,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, deserialize_with = "deserialize_age")]
    pub age: i64,
    #[serde(default)]
    pub distance: FieldText,
    #[serde(default)]
    pub heard: FieldText,
    #[serde(default)]
    pub posit: FieldText,
    #[serde(default)]
    pub channel: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub node: NodeRecord,
    #[serde(default)]
    pub user: Vec<UserRecord>,
}

impl Dataset {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// The reference node followed by every observation, in dataset order
    pub fn points(&self) -> Vec<MapPoint> {
        std::iter::once(MapPoint::from(&self.node))
            .chain(self.user.iter().map(MapPoint::from))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PointKind {
    Node {
        call: String,
        number: String,
    },
    Observation {
        distance: String,
        channel: Option<String>,
        heard: String,
        posit: String,
    },
}

/// A positioned dataset entry with its precomputed popup label
#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub age_seconds: i64,
    pub label: String,
    pub kind: PointKind,
}

impl MapPoint {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }

    pub fn channel(&self) -> Option<&str> {
        match &self.kind {
            PointKind::Observation { channel, .. } => channel.as_deref(),
            PointKind::Node { .. } => None,
        }
    }
}

impl From<&NodeRecord> for MapPoint {
    fn from(record: &NodeRecord) -> Self {
        let label = format!(
            "<b>{}</b><br>{}<br>{}({})",
            record.user_id, NODE_SUBTITLE, record.call, record.number
        );
        Self {
            id: record.user_id.to_string(),
            lat: record.lat,
            lng: record.lng,
            age_seconds: record.age,
            label,
            kind: PointKind::Node {
                call: record.call.to_string(),
                number: record.number.to_string(),
            },
        }
    }
}

impl From<&UserRecord> for MapPoint {
    fn from(record: &UserRecord) -> Self {
        let label = format!(
            "<b>{}</b><br>{} km<br>{}<br>{}",
            record.user_id, record.distance, record.heard, record.posit
        );
        Self {
            id: record.user_id.to_string(),
            lat: record.lat,
            lng: record.lng,
            age_seconds: record.age,
            label,
            kind: PointKind::Observation {
                distance: record.distance.to_string(),
                channel: record.channel.clone(),
                heard: record.heard.to_string(),
                posit: record.posit.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "node": { "user_id": "VE4XYZ", "lat": 49.9, "lng": -97.1, "age": 0,
                  "call": "VE4XYZ", "number": 3021 },
        "user": [
            { "user_id": "VA4ABC", "lat": 50.1, "lng": -96.8, "age": 3600,
              "distance": 25.4, "heard": "2026-10-18 21:14", "posit": "Selkirk",
              "channel": "V-CH" },
            { "user_id": 4402, "lat": 49.5, "lng": -98.0, "age": 90000.7,
              "distance": "81", "heard": "2026-10-17 20:01", "posit": "Portage" }
        ]
    }"#;

    #[test]
    fn test_parse_sample_dataset() {
        let dataset = Dataset::from_json_str(SAMPLE).unwrap();
        assert_eq!(dataset.node.user_id.as_str(), "VE4XYZ");
        assert_eq!(dataset.node.number.as_str(), "3021");
        assert_eq!(dataset.user.len(), 2);
        assert_eq!(dataset.user[1].user_id.as_str(), "4402");
        assert_eq!(dataset.user[1].age, 90000);
        assert_eq!(dataset.user[1].channel, None);
    }

    #[test]
    fn test_points_keep_order_and_labels() {
        let dataset = Dataset::from_json_str(SAMPLE).unwrap();
        let points = dataset.points();

        assert_eq!(points.len(), 3);
        assert!(matches!(points[0].kind, PointKind::Node { .. }));
        assert_eq!(points[0].label, "<b>VE4XYZ</b><br>This Node<br>VE4XYZ(3021)");
        assert_eq!(
            points[1].label,
            "<b>VA4ABC</b><br>25.4 km<br>2026-10-18 21:14<br>Selkirk"
        );
        assert_eq!(points[1].channel(), Some("V-CH"));
        assert_eq!(points[2].id, "4402");
        assert_eq!(points[2].position(), LatLng::new(49.5, -98.0));
    }

    #[test]
    fn test_missing_user_list_is_empty() {
        let dataset =
            Dataset::from_json_str(r#"{ "node": { "user_id": "N1", "lat": 0, "lng": 0 } }"#)
                .unwrap();
        assert!(dataset.user.is_empty());
        assert_eq!(dataset.points().len(), 1);
    }

    #[test]
    fn test_malformed_dataset_is_error() {
        assert!(Dataset::from_json_str(r#"{ "user": [] }"#).is_err());
    }
}
