//! Icon and pulse selection for map markers.

use rlis_ops_models::{LocationKind, Priority};
use serde::Serialize;
use strum_macros::{AsRefStr, Display};

/// Rendering contract for a marker icon: a CSS class on a square div,
/// anchored in pixels from its top-left corner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IconSpec {
    /// CSS class list of the icon element.
    pub class_name: String,
    /// Width and height in pixels.
    pub size: [u32; 2],
    /// Anchor point in pixels.
    pub anchor: [u32; 2],
}

impl IconSpec {
    /// A square icon anchored at its bottom center (pins).
    fn pin(class_name: &str, size: u32) -> Self {
        Self {
            class_name: class_name.to_string(),
            size: [size, size],
            anchor: [size / 2, size],
        }
    }
}

/// Static node icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr)]
pub enum MarkerIcon {
    /// Logistics hub.
    Hub,
    /// Grain mandi.
    Mandi,
    /// Village node; also the fallback for unknown types.
    Village,
    /// Key route / road.
    Road,
    /// High-visibility search pin.
    Search,
}

impl MarkerIcon {
    /// Node icons in legend order.
    pub const NODES: &[Self] = &[Self::Hub, Self::Mandi, Self::Village, Self::Road];

    /// Picks the icon for a node type. Unknown types get the village icon
    /// rather than being dropped.
    #[must_use]
    pub const fn for_kind(kind: LocationKind) -> Self {
        match kind {
            LocationKind::Hub => Self::Hub,
            LocationKind::Mandi => Self::Mandi,
            LocationKind::Road => Self::Road,
            LocationKind::Village | LocationKind::Other => Self::Village,
        }
    }

    /// Icon rendering contract.
    #[must_use]
    pub fn spec(self) -> IconSpec {
        match self {
            Self::Hub => IconSpec::pin("custom-icon-hub", 26),
            Self::Mandi => IconSpec::pin("custom-icon-mandi", 26),
            Self::Village => IconSpec::pin("custom-icon-village", 24),
            Self::Road => IconSpec::pin("custom-icon-road", 24),
            Self::Search => IconSpec::pin("search-pin", 48),
        }
    }

    /// Legend caption.
    #[must_use]
    pub const fn legend_label(self) -> &'static str {
        match self {
            Self::Hub => "Logistics Hub",
            Self::Mandi => "Grain Mandi",
            Self::Village => "Village Node",
            Self::Road => "Key Route / Road",
            Self::Search => "Search Target",
        }
    }
}

/// Pulse animation class of an incident marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PulseClass {
    /// Fastest ("panic") pulse.
    Critical,
    /// Fast pulse.
    High,
    /// Slow pulse.
    Medium,
    /// Calm, no pulse.
    None,
}

impl PulseClass {
    /// Signal classes in legend order.
    pub const ALL: &[Self] = &[Self::Critical, Self::High, Self::Medium, Self::None];

    /// Maps a priority string by case-insensitive substring: "critical",
    /// then "high", then "medium"; anything else is calm.
    #[must_use]
    pub fn from_priority(priority: &str) -> Self {
        match Priority::loose(priority) {
            Some(Priority::Critical) => Self::Critical,
            Some(Priority::High) => Self::High,
            Some(Priority::Medium) => Self::Medium,
            Some(Priority::Low) | None => Self::None,
        }
    }

    /// CSS severity class of the pulsing dot.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Critical => "severity-critical",
            Self::High => "severity-high",
            Self::Medium => "severity-medium",
            Self::None => "severity-low",
        }
    }

    /// Icon rendering contract: a 20px dot anchored at its center.
    #[must_use]
    pub fn spec(self) -> IconSpec {
        IconSpec {
            class_name: format!("incident-dot {}", self.css_class()),
            size: [20, 20],
            anchor: [10, 10],
        }
    }

    /// Legend caption.
    #[must_use]
    pub const fn legend_label(self) -> &'static str {
        match self {
            Self::Critical => "Critical (Panic Pulse)",
            Self::High => "High (Fast Pulse)",
            Self::Medium => "Medium (Slow Pulse)",
            Self::None => "Low (Calm - No Pulse)",
        }
    }
}

/// One row of the "Network Directory" legend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    /// Caption.
    pub label: &'static str,
    /// Icon drawn next to the caption.
    pub icon: IconSpec,
}

/// The static legend: node types first, then signal classes.
#[must_use]
pub fn legend() -> Vec<LegendEntry> {
    let nodes = MarkerIcon::NODES.iter().map(|icon| LegendEntry {
        label: icon.legend_label(),
        icon: icon.spec(),
    });
    let signals = PulseClass::ALL.iter().map(|pulse| LegendEntry {
        label: pulse.legend_label(),
        icon: pulse.spec(),
    });
    nodes.chain(signals).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulse_mapping_is_total_and_case_insensitive() {
        let cases = [
            ("Critical", PulseClass::Critical),
            ("CRITICAL", PulseClass::Critical),
            ("High", PulseClass::High),
            ("high", PulseClass::High),
            ("Medium", PulseClass::Medium),
            ("mEdIuM", PulseClass::Medium),
            ("Low", PulseClass::None),
            ("", PulseClass::None),
            ("Urgent", PulseClass::None),
            ("Highway blocked", PulseClass::High),
        ];
        for (priority, expected) in cases {
            assert_eq!(
                PulseClass::from_priority(priority),
                expected,
                "priority {priority:?}"
            );
        }
    }

    #[test]
    fn every_node_kind_has_an_icon() {
        assert_eq!(MarkerIcon::for_kind(LocationKind::Hub), MarkerIcon::Hub);
        assert_eq!(MarkerIcon::for_kind(LocationKind::Other), MarkerIcon::Village);
        assert_eq!(MarkerIcon::for_kind(LocationKind::Road), MarkerIcon::Road);
    }

    #[test]
    fn pin_anchor_is_bottom_center() {
        let spec = MarkerIcon::Search.spec();
        assert_eq!(spec.size, [48, 48]);
        assert_eq!(spec.anchor, [24, 48]);
        assert_eq!(
            PulseClass::Critical.spec().class_name,
            "incident-dot severity-critical"
        );
    }

    #[test]
    fn legend_lists_nodes_then_signals() {
        let entries = legend();
        assert_eq!(entries.len(), 8);
        assert_eq!(entries[0].label, "Logistics Hub");
        assert_eq!(entries[3].icon, MarkerIcon::Road.spec());
        assert_eq!(entries[4].label, "Critical (Panic Pulse)");
        assert_eq!(entries[7].icon.class_name, "incident-dot severity-low");
    }
}
