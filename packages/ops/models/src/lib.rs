#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Shared data model for the RLIS operations dashboard.
//!
//! Defines the logistics network nodes ([`Location`]), decoded driver-log
//! reports ([`Incident`]), the transient classification payload returned
//! by the analysis service ([`ClassificationResult`]), and the map focus
//! state shared between the reconciler and the map projection.
//!
//! Wire decoding is deliberately lenient: a malformed coordinate pair or
//! an unknown node type degrades to "absent" / [`LocationKind::Other`]
//! instead of failing the whole payload.

pub mod state;
mod wire;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use state::{ActiveFocus, FocusCause, OpsState, SearchSelection};

/// Map center used whenever no better target is known (Ludhiana, Punjab).
pub const DEFAULT_CENTER: Coordinates = Coordinates::new(30.9010, 75.8573);

/// Location label used when the service does not name one.
pub const UNKNOWN_AREA: &str = "Unknown Area";

/// Category used when the service does not classify the log.
pub const DEFAULT_CATEGORY: &str = "General";

/// Priority used when the service does not rank the log.
pub const DEFAULT_PRIORITY: &str = "Low";

/// A WGS84 coordinate pair.
///
/// Serialized as a `[lat, lng]` JSON array, matching the service's
/// `position` and `geo_target` fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

impl Coordinates {
    /// Creates a coordinate pair.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether both components are finite numbers.
    ///
    /// NaN and infinities are rejected so they never reach the map layer.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Builds a pair from two optional components, returning `None` unless
    /// both are present and finite.
    #[must_use]
    pub fn from_parts(lat: Option<f64>, lng: Option<f64>) -> Option<Self> {
        let coords = Self::new(lat?, lng?);
        coords.is_valid().then_some(coords)
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(coords: Coordinates) -> Self {
        [coords.lat, coords.lng]
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:.4}, {:.4}]", self.lat, self.lng)
    }
}

/// Kind of logistics network node.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum LocationKind {
    /// Transport hub / depot.
    Hub,
    /// Grain market.
    Mandi,
    /// Village node.
    Village,
    /// Key route or road segment.
    Road,
    /// Missing or unrecognised type.
    #[default]
    #[serde(other)]
    Other,
}

/// A node of the logistics network as listed by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Service-assigned identifier.
    #[serde(default)]
    pub id: i64,
    /// Unique display name (e.g. "Khanna Mandi"). Null decodes as empty.
    #[serde(default, deserialize_with = "wire::string_or_empty")]
    pub name: String,
    /// Node type. Unknown values decode as [`LocationKind::Other`].
    #[serde(rename = "type", default, deserialize_with = "wire::lenient_kind")]
    pub kind: LocationKind,
    /// Latitude, if the service has one.
    #[serde(default)]
    pub lat: Option<f64>,
    /// Longitude, if the service has one.
    #[serde(default)]
    pub lng: Option<f64>,
}

impl Location {
    /// Returns the node's coordinates when both components are valid.
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.lat, self.lng)
    }
}

/// Incident priority as ranked by the analysis service.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Priority {
    /// Routine update.
    Low,
    /// Slowdown (fog, rain, queues).
    Medium,
    /// Blockage (jams, protests).
    High,
    /// Hazard (accidents, fires, leaks).
    Critical,
}

impl Priority {
    /// Classifies a free-form priority string by case-insensitive substring,
    /// checking the most severe level first.
    ///
    /// Returns `None` when no level name occurs in the string.
    #[must_use]
    pub fn loose(value: &str) -> Option<Self> {
        let lower = value.to_lowercase();
        [Self::Critical, Self::High, Self::Medium, Self::Low]
            .into_iter()
            .find(|p| lower.contains(&p.as_ref().to_lowercase()))
    }

    /// Badge colour used by the operator panel.
    #[must_use]
    pub const fn badge_color(self) -> &'static str {
        match self {
            Self::Critical => "red",
            Self::High => "orange",
            Self::Medium => "yellow",
            Self::Low => "green",
        }
    }
}

/// A decoded incident shown in the feed and on the map.
///
/// Deserialization goes through [`IncidentRecord`] so that absent or null
/// fields fall back to the dashboard defaults instead of rejecting the
/// record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "IncidentRecord")]
pub struct Incident {
    /// Identifier (service id, or wall-clock milliseconds for local ones).
    pub id: i64,
    /// Map position; `None` when the service sent no usable pair.
    pub position: Option<Coordinates>,
    /// Resolved location name.
    pub location_name: String,
    /// Incident category (e.g. "Traffic Jam").
    pub category: String,
    /// Priority string as received (e.g. "Critical").
    pub priority: String,
    /// Original driver log text.
    pub text: String,
    /// Display time (`HH:MM`).
    pub time: String,
}

/// Permissive wire form of [`Incident`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    /// Identifier.
    #[serde(default)]
    pub id: Option<i64>,
    /// `[lat, lng]`, possibly malformed.
    #[serde(default, deserialize_with = "wire::lenient_pair")]
    pub position: Option<Coordinates>,
    /// Location name; stored rows call this `location`.
    #[serde(default, alias = "location")]
    pub location_name: Option<String>,
    /// Category.
    #[serde(default)]
    pub category: Option<String>,
    /// Priority.
    #[serde(default)]
    pub priority: Option<String>,
    /// Original log text.
    #[serde(default)]
    pub text: Option<String>,
    /// Display time; stored rows carry a `timestamp` instead.
    #[serde(default, alias = "timestamp")]
    pub time: Option<String>,
}

impl From<IncidentRecord> for Incident {
    fn from(record: IncidentRecord) -> Self {
        Self {
            id: record.id.unwrap_or_default(),
            position: record.position,
            location_name: record
                .location_name
                .unwrap_or_else(|| UNKNOWN_AREA.to_string()),
            category: record
                .category
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            priority: record
                .priority
                .unwrap_or_else(|| DEFAULT_PRIORITY.to_string()),
            text: record.text.unwrap_or_default(),
            time: record.time.unwrap_or_default(),
        }
    }
}

/// The `incident` object of a classification response. Every field is
/// optional; defaults are applied when the reconciler builds an
/// [`Incident`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedIncident {
    /// Id of the stored row, if the service persisted one.
    #[serde(default)]
    pub id: Option<i64>,
    /// Echo of the submitted text.
    #[serde(default)]
    pub text: Option<String>,
    /// Extracted location name.
    #[serde(default)]
    pub location: Option<String>,
    /// Inferred category.
    #[serde(default)]
    pub category: Option<String>,
    /// Inferred priority.
    #[serde(default)]
    pub priority: Option<String>,
    /// Server-side timestamp.
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Debug payload describing how the service processed a log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NlpDebug {
    /// Processing time, usually a string like `"12.5ms"`.
    #[serde(default)]
    pub processing_time: Option<serde_json::Value>,
    /// Extracted entity tokens.
    #[serde(default, deserialize_with = "wire::lenient_strings")]
    pub entities: Vec<String>,
    /// Detected language mix.
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub lang: Option<String>,
    /// Sentiment score or label.
    #[serde(default)]
    pub sentiment: Option<serde_json::Value>,
    /// Detected intent.
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub intent: Option<String>,
}

impl NlpDebug {
    /// Processing time rendered for display.
    #[must_use]
    pub fn processing_time_label(&self) -> String {
        match &self.processing_time {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Null) | None => "-".to_string(),
            Some(other) => other.to_string(),
        }
    }
}

/// Response of the `/predict` endpoint. Consumed once to build an
/// [`Incident`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Structured incident; absent means nothing was decoded.
    #[serde(default)]
    pub incident: Option<DecodedIncident>,
    /// Resolved `[lat, lng]` target, if the service geocoded one.
    #[serde(default, deserialize_with = "wire::lenient_pair")]
    pub geo_target: Option<Coordinates>,
    /// Processing diagnostics. A malformed payload decodes as absent.
    #[serde(default, deserialize_with = "wire::lenient_object")]
    pub nlp_debug: Option<NlpDebug>,
}

/// Request body of the `/predict` endpoint.
///
/// The service expects exactly the `raw_text` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSubmission {
    /// The operator's free-text driver log.
    pub raw_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_reject_nan_and_missing_parts() {
        assert!(Coordinates::from_parts(Some(30.9), Some(75.8)).is_some());
        assert!(Coordinates::from_parts(None, Some(75.8)).is_none());
        assert!(Coordinates::from_parts(Some(f64::NAN), Some(75.8)).is_none());
        assert!(Coordinates::from_parts(Some(30.9), Some(f64::INFINITY)).is_none());
        assert!(!Coordinates::new(f64::NAN, 1.0).is_valid());
    }

    #[test]
    fn coordinates_serialize_as_pair() {
        let json = serde_json::to_value(Coordinates::new(30.91, 75.85)).unwrap();
        assert_eq!(json, serde_json::json!([30.91, 75.85]));
    }

    #[test]
    fn location_with_unknown_type_decodes_as_other() {
        let locations: Vec<Location> = serde_json::from_value(serde_json::json!([
            {"id": 1, "name": "Ludhiana Transport Nagar", "type": "Hub", "lat": 30.91, "lng": 75.85},
            {"id": 2, "name": "Checkpost", "type": "Toll", "lat": 30.5, "lng": 76.1},
            {"id": 3, "name": "Nowhere", "lat": null, "lng": 76.0},
            {"id": 4, "name": "Untyped", "type": null, "lat": 31.0, "lng": 75.0}
        ]))
        .unwrap();

        assert_eq!(locations[0].kind, LocationKind::Hub);
        assert_eq!(locations[1].kind, LocationKind::Other);
        assert_eq!(locations[2].kind, LocationKind::Other);
        assert_eq!(locations[3].kind, LocationKind::Other);
        assert!(locations[2].coordinates().is_none());
        assert_eq!(
            locations[0].coordinates(),
            Some(Coordinates::new(30.91, 75.85))
        );
    }

    #[test]
    fn incident_record_fills_defaults() {
        let incident: Incident = serde_json::from_value(serde_json::json!({
            "id": 7,
            "location": null,
            "position": [30.1, null],
            "text": "fog near Moga"
        }))
        .unwrap();

        assert_eq!(incident.id, 7);
        assert_eq!(incident.location_name, UNKNOWN_AREA);
        assert_eq!(incident.category, DEFAULT_CATEGORY);
        assert_eq!(incident.priority, DEFAULT_PRIORITY);
        assert!(incident.position.is_none());
    }

    #[test]
    fn incident_accepts_camel_case_shape() {
        let incident: Incident = serde_json::from_value(serde_json::json!({
            "id": 3,
            "position": [30.7, 76.2],
            "locationName": "Khanna Mandi",
            "category": "Traffic Jam",
            "priority": "High",
            "text": "lambi line",
            "time": "09:15"
        }))
        .unwrap();

        assert_eq!(incident.location_name, "Khanna Mandi");
        assert_eq!(incident.position, Some(Coordinates::new(30.7, 76.2)));
        assert_eq!(incident.time, "09:15");
    }

    #[test]
    fn classification_tolerates_missing_and_malformed_parts() {
        let result: ClassificationResult =
            serde_json::from_value(serde_json::json!({"incident": {}, "geo_target": "nope"}))
                .unwrap();
        assert_eq!(result.incident, Some(DecodedIncident::default()));
        assert!(result.geo_target.is_none());
        assert!(result.nlp_debug.is_none());

        let empty: ClassificationResult = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(empty.incident.is_none());
    }

    #[test]
    fn loose_priority_prefers_most_severe_match() {
        assert_eq!(Priority::loose("CRITICAL"), Some(Priority::Critical));
        assert_eq!(Priority::loose("very high"), Some(Priority::High));
        assert_eq!(Priority::loose("Medium-ish"), Some(Priority::Medium));
        assert_eq!(Priority::loose("low"), Some(Priority::Low));
        assert_eq!(Priority::loose("urgent"), None);
        assert_eq!(Priority::loose("high / critical"), Some(Priority::Critical));
    }

    #[test]
    fn processing_time_label_handles_numbers() {
        let debug = NlpDebug {
            processing_time: Some(serde_json::json!(12.5)),
            ..NlpDebug::default()
        };
        assert_eq!(debug.processing_time_label(), "12.5");
        assert_eq!(NlpDebug::default().processing_time_label(), "-");
    }

    #[test]
    fn sloppy_debug_payload_keeps_the_incident() {
        let result: ClassificationResult = serde_json::from_value(serde_json::json!({
            "incident": {"location": "Khanna Mandi", "priority": "High"},
            "nlp_debug": {"processing_time": "1ms", "entities": null, "lang": 3, "intent": ["x"]}
        }))
        .unwrap();
        assert_eq!(result.incident.unwrap().location.as_deref(), Some("Khanna Mandi"));
        let debug = result.nlp_debug.unwrap();
        assert!(debug.entities.is_empty());
        assert!(debug.lang.is_none());
        assert!(debug.intent.is_none());
        assert_eq!(debug.processing_time_label(), "1ms");

        let mixed: NlpDebug =
            serde_json::from_value(serde_json::json!({"entities": ["Gas", 7, null, "Road"]}))
                .unwrap();
        assert_eq!(mixed.entities, vec!["Gas", "Road"]);

        let result: ClassificationResult = serde_json::from_value(serde_json::json!({
            "incident": {},
            "nlp_debug": "debug disabled"
        }))
        .unwrap();
        assert!(result.incident.is_some());
        assert!(result.nlp_debug.is_none());
    }

    #[test]
    fn null_location_name_does_not_fail_the_list() {
        let locations: Vec<Location> = serde_json::from_value(serde_json::json!([
            {"id": 1, "name": "Ludhiana Transport Nagar", "type": "Hub", "lat": 30.91, "lng": 75.85},
            {"id": 2, "name": null, "type": "Village", "lat": 30.80, "lng": 75.70},
            {"id": 3, "type": "Road", "lat": 30.75, "lng": 75.60}
        ]))
        .unwrap();
        assert_eq!(locations.len(), 3);
        assert_eq!(locations[0].name, "Ludhiana Transport Nagar");
        assert_eq!(locations[1].name, "");
        assert_eq!(locations[2].name, "");
    }
}
