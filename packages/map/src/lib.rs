#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map projection for the RLIS operations dashboard.
//!
//! [`project`] is a pure function from [`OpsState`] to the set of markers a
//! map widget should draw:
//!
//! - one pin per network node with valid coordinates, iconed by node type
//!   (unknown types fall back to the village icon);
//! - one pulsing dot per incident with a valid position, pulse chosen by
//!   priority;
//! - the search pin, layered above everything else;
//! - the static sandbox boundary.
//!
//! Records with missing or non-finite coordinates are skipped. The
//! [`camera`] module turns focus changes into fly-to moves, and
//! [`MarkerSet::to_geojson`] hands the whole set to any GeoJSON-aware map.

pub mod boundary;
pub mod camera;
pub mod icons;

use geojson::{Feature, FeatureCollection, Geometry, feature::Id};
use rlis_ops_models::{Coordinates, Incident, Location, OpsState, Priority, SearchSelection};
use serde::Serialize;
use strum_macros::Display;

pub use boundary::BoundaryOverlay;
pub use camera::{CameraController, CameraMove, MapView, initial_view};
pub use icons::{IconSpec, LegendEntry, MarkerIcon, PulseClass, legend};

/// Z-index of network node pins.
pub const LOCATION_Z_INDEX: i32 = 0;
/// Z-index of incident dots.
pub const INCIDENT_Z_INDEX: i32 = 100;
/// Z-index of the search pin.
pub const SEARCH_Z_INDEX: i32 = 1000;

/// Which data layer a marker belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MarkerLayer {
    /// Network node.
    Location,
    /// Decoded incident.
    Incident,
    /// Search pin.
    Search,
}

/// Popup content attached to a marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Popup {
    /// Headline.
    pub title: String,
    /// Secondary line (node type or log text).
    pub body: String,
    /// Whether the headline is rendered in alert colour.
    pub emphasis: bool,
}

/// A single renderable marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    /// Stable key for the widget (e.g. `location-3`).
    pub key: String,
    /// Data layer.
    pub layer: MarkerLayer,
    /// Marker position.
    pub position: Coordinates,
    /// Icon contract.
    pub icon: IconSpec,
    /// Pulse class, for incident markers only.
    pub pulse: Option<PulseClass>,
    /// Stacking order; higher draws on top.
    pub z_index: i32,
    /// Popup content.
    pub popup: Popup,
}

/// Everything the map should draw for one state snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerSet {
    /// Network node pins.
    pub locations: Vec<Marker>,
    /// Incident dots, in feed order.
    pub incidents: Vec<Marker>,
    /// Search pin, if a valid selection exists.
    pub search: Option<Marker>,
    /// Static zone overlay.
    pub boundary: BoundaryOverlay,
}

/// Projects dashboard state into renderable markers.
#[must_use]
pub fn project(state: &OpsState) -> MarkerSet {
    let locations: Vec<Marker> = state.locations.iter().filter_map(location_marker).collect();
    let incidents: Vec<Marker> = state.incidents.iter().filter_map(incident_marker).collect();

    let skipped = state.locations.len() - locations.len() + state.incidents.len() - incidents.len();
    if skipped > 0 {
        log::trace!("Skipped {skipped} record(s) without valid coordinates");
    }

    MarkerSet {
        locations,
        incidents,
        search: state.selection.as_ref().and_then(search_marker),
        boundary: BoundaryOverlay::sandbox(),
    }
}

fn location_marker(location: &Location) -> Option<Marker> {
    let position = location.coordinates()?;
    Some(Marker {
        key: format!("location-{}", location.id),
        layer: MarkerLayer::Location,
        position,
        icon: MarkerIcon::for_kind(location.kind).spec(),
        pulse: None,
        z_index: LOCATION_Z_INDEX,
        popup: Popup {
            title: location.name.to_uppercase(),
            body: location.kind.to_string(),
            emphasis: false,
        },
    })
}

fn incident_marker(incident: &Incident) -> Option<Marker> {
    let position = incident.position.filter(|p| p.is_valid())?;
    let pulse = PulseClass::from_priority(&incident.priority);
    Some(Marker {
        key: format!("incident-{}", incident.id),
        layer: MarkerLayer::Incident,
        position,
        icon: pulse.spec(),
        pulse: Some(pulse),
        z_index: INCIDENT_Z_INDEX,
        popup: Popup {
            title: format!("{} ALERT", incident.category),
            body: incident.text.clone(),
            emphasis: Priority::loose(&incident.priority) == Some(Priority::Critical),
        },
    })
}

fn search_marker(selection: &SearchSelection) -> Option<Marker> {
    if !selection.coords.is_valid() {
        return None;
    }
    Some(Marker {
        key: "search".to_string(),
        layer: MarkerLayer::Search,
        position: selection.coords,
        icon: MarkerIcon::Search.spec(),
        pulse: None,
        z_index: SEARCH_Z_INDEX,
        popup: Popup {
            title: selection.label.to_uppercase(),
            body: String::new(),
            emphasis: true,
        },
    })
}

impl MarkerSet {
    /// Markers in drawing order, bottom layer first.
    pub fn draw_order(&self) -> impl Iterator<Item = &Marker> {
        self.locations
            .iter()
            .chain(self.incidents.iter())
            .chain(self.search.iter())
    }

    /// Total number of point markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len() + self.incidents.len() + usize::from(self.search.is_some())
    }

    /// Whether there are no point markers (the boundary is always drawn).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Exports markers and the boundary as a GeoJSON feature collection.
    ///
    /// Points are emitted in `[lng, lat]` order as GeoJSON requires.
    #[must_use]
    pub fn to_geojson(&self) -> FeatureCollection {
        let mut features: Vec<Feature> = self.draw_order().map(marker_feature).collect();
        features.push(boundary_feature(&self.boundary));

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

fn marker_feature(marker: &Marker) -> Feature {
    let point = geo::Point::new(marker.position.lng, marker.position.lat);
    let mut feature = Feature::from(Geometry::new(geojson::Value::from(&point)));
    feature.id = Some(Id::String(marker.key.clone()));
    feature.set_property("layer", marker.layer.to_string());
    feature.set_property("icon", marker.icon.class_name.clone());
    feature.set_property("zIndex", marker.z_index);
    feature.set_property("label", marker.popup.title.clone());
    if let Some(pulse) = marker.pulse {
        feature.set_property("pulse", pulse.as_ref());
    }
    feature
}

fn boundary_feature(boundary: &BoundaryOverlay) -> Feature {
    let mut feature = Feature::from(Geometry::new(geojson::Value::from(&boundary.polygon())));
    feature.id = Some(Id::String("boundary".to_string()));
    feature.set_property("layer", "boundary");
    feature.set_property("label", boundary.label);
    feature.set_property("stroke", boundary.style.color);
    feature.set_property("fillOpacity", boundary.style.fill_opacity);
    feature
}

#[cfg(test)]
mod tests {
    use super::*;
    use rlis_ops_models::{FocusCause, LocationKind};

    fn node(id: i64, kind: LocationKind, lat: Option<f64>, lng: Option<f64>) -> Location {
        Location {
            id,
            name: format!("Node {id}"),
            kind,
            lat,
            lng,
        }
    }

    fn incident(id: i64, priority: &str, position: Option<Coordinates>) -> Incident {
        Incident {
            id,
            position,
            location_name: "Khanna Mandi".to_string(),
            category: "Traffic Jam".to_string(),
            priority: priority.to_string(),
            text: "lambi line".to_string(),
            time: "10:00".to_string(),
        }
    }

    #[test]
    fn empty_state_still_draws_boundary() {
        let markers = project(&OpsState::default());
        assert!(markers.is_empty());
        assert_eq!(markers.boundary.vertices.len(), 4);
        assert_eq!(markers.to_geojson().features.len(), 1);
    }

    #[test]
    fn nodes_without_valid_coordinates_are_skipped() {
        let state = OpsState {
            locations: vec![
                node(1, LocationKind::Hub, Some(30.9), Some(75.8)),
                node(2, LocationKind::Mandi, None, Some(76.2)),
                node(3, LocationKind::Road, Some(f64::NAN), Some(76.2)),
                node(4, LocationKind::Other, Some(31.0), Some(75.5)),
            ],
            ..OpsState::default()
        };
        let markers = project(&state);

        assert_eq!(markers.locations.len(), 2);
        assert_eq!(markers.locations[0].icon, MarkerIcon::Hub.spec());
        assert_eq!(markers.locations[1].icon, MarkerIcon::Village.spec());
        assert_eq!(markers.locations[1].popup.body, "Other");
    }

    #[test]
    fn incidents_pulse_by_priority_and_skip_bad_positions() {
        let here = Some(Coordinates::new(30.7, 76.2));
        let state = OpsState {
            incidents: vec![
                incident(3, "Critical", here),
                incident(2, "medium", here),
                incident(1, "High", None),
            ],
            ..OpsState::default()
        };
        let markers = project(&state);

        assert_eq!(markers.incidents.len(), 2);
        assert_eq!(markers.incidents[0].pulse, Some(PulseClass::Critical));
        assert!(markers.incidents[0].popup.emphasis);
        assert_eq!(markers.incidents[0].popup.title, "Traffic Jam ALERT");
        assert_eq!(markers.incidents[1].pulse, Some(PulseClass::Medium));
        assert!(!markers.incidents[1].popup.emphasis);
    }

    #[test]
    fn search_pin_draws_on_top() {
        let mut state = OpsState {
            locations: vec![node(1, LocationKind::Hub, Some(30.9), Some(75.8))],
            incidents: vec![incident(1, "Low", Some(Coordinates::new(30.7, 76.2)))],
            ..OpsState::default()
        };
        state.focus_on(
            Coordinates::new(30.9, 75.8),
            "Node 1".to_string(),
            FocusCause::Location {
                name: "Node 1".to_string(),
            },
        );
        let markers = project(&state);

        let order: Vec<MarkerLayer> = markers.draw_order().map(|m| m.layer).collect();
        assert_eq!(
            order,
            vec![MarkerLayer::Location, MarkerLayer::Incident, MarkerLayer::Search]
        );
        let top = markers.draw_order().map(|m| m.z_index).max();
        assert_eq!(top, Some(SEARCH_Z_INDEX));
        assert_eq!(markers.search.as_ref().map(|m| m.icon.size), Some([48, 48]));
    }

    #[test]
    fn geojson_uses_lng_lat_order() {
        let state = OpsState {
            locations: vec![node(7, LocationKind::Mandi, Some(30.7), Some(76.2))],
            ..OpsState::default()
        };
        let collection = project(&state).to_geojson();
        let json = serde_json::to_value(&collection).unwrap();

        let first = &json["features"][0];
        assert_eq!(first["id"], "location-7");
        assert_eq!(first["geometry"]["coordinates"], serde_json::json!([76.2, 30.7]));
        assert_eq!(first["properties"]["layer"], "location");
        assert_eq!(json["features"][1]["properties"]["layer"], "boundary");
    }
}
