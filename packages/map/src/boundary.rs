//! The fixed "active operation zone" overlay.

use geo::{Contains, LineString, Point, Polygon};
use rlis_ops_models::Coordinates;
use serde::Serialize;

/// Corners of the sandbox zone (Amritsar/Ferozepur to Patiala/Rupnagar).
pub const SANDBOX_BOUNDARY: [Coordinates; 4] = [
    Coordinates::new(31.75, 74.50),
    Coordinates::new(31.75, 76.80),
    Coordinates::new(30.15, 76.80),
    Coordinates::new(30.15, 74.50),
];

/// Permanent caption drawn above the zone.
pub const SANDBOX_LABEL: &str = "ACTIVE OPERATION ZONE (SANDBOX V1)";

/// Stroke and fill of the zone outline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryStyle {
    /// Stroke colour.
    pub color: &'static str,
    /// Stroke width in pixels.
    pub weight: u32,
    /// Dash pattern.
    pub dash_array: &'static str,
    /// Fill colour.
    pub fill_color: &'static str,
    /// Fill opacity.
    pub fill_opacity: f64,
}

/// Static polygon overlay, drawn regardless of data state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryOverlay {
    /// Polygon corners in drawing order.
    pub vertices: Vec<Coordinates>,
    /// Outline style.
    pub style: BoundaryStyle,
    /// Permanent tooltip text.
    pub label: &'static str,
}

impl BoundaryOverlay {
    /// The sandbox operation zone.
    #[must_use]
    pub fn sandbox() -> Self {
        Self {
            vertices: SANDBOX_BOUNDARY.to_vec(),
            style: BoundaryStyle {
                color: "#339af0",
                weight: 2,
                dash_array: "10, 10",
                fill_color: "#339af0",
                fill_opacity: 0.03,
            },
            label: SANDBOX_LABEL,
        }
    }

    /// The zone as a closed `geo` polygon in `(lng, lat)` order.
    #[must_use]
    pub fn polygon(&self) -> Polygon<f64> {
        let ring: Vec<(f64, f64)> = self.vertices.iter().map(|c| (c.lng, c.lat)).collect();
        Polygon::new(LineString::from(ring), vec![])
    }

    /// Whether `coords` lies strictly inside the zone.
    #[must_use]
    pub fn contains(&self, coords: Coordinates) -> bool {
        coords.is_valid() && self.polygon().contains(&Point::new(coords.lng, coords.lat))
    }
}
