//! Dashboard state shared between the reconciler (writer) and the map
//! projection and panel (readers).

use serde::Serialize;

use crate::{Coordinates, DEFAULT_CENTER, Incident, Location};

/// What put the camera where it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FocusCause {
    /// Startup default.
    DefaultCenter,
    /// An operator looked up a node by name.
    Location {
        /// Node name.
        name: String,
    },
    /// A freshly decoded incident.
    Incident {
        /// Incident id.
        id: i64,
    },
}

/// The single current camera target. Last write wins.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveFocus {
    /// Coordinates the camera should center on.
    pub target: Coordinates,
    /// Why the target was chosen.
    pub cause: FocusCause,
    /// Incremented on every write, including writes of an identical
    /// target, so observers can detect "focus changed".
    pub revision: u64,
}

impl Default for ActiveFocus {
    fn default() -> Self {
        Self {
            target: DEFAULT_CENTER,
            cause: FocusCause::DefaultCenter,
            revision: 0,
        }
    }
}

impl ActiveFocus {
    /// Points the focus at `target` and bumps the revision.
    pub fn retarget(&mut self, target: Coordinates, cause: FocusCause) {
        self.target = target;
        self.cause = cause;
        self.revision += 1;
    }
}

/// The highlighted search target drawn as the high-visibility pin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchSelection {
    /// Pin position.
    pub coords: Coordinates,
    /// Pin label.
    pub label: String,
}

/// Everything the reconciler owns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpsState {
    /// Known network nodes, as fetched at startup.
    pub locations: Vec<Location>,
    /// Decoded incidents, newest first.
    pub incidents: Vec<Incident>,
    /// Current camera target.
    pub focus: ActiveFocus,
    /// Current search pin, if any.
    pub selection: Option<SearchSelection>,
}

impl OpsState {
    /// Finds a node by exact name.
    #[must_use]
    pub fn find_location(&self, name: &str) -> Option<&Location> {
        if name.is_empty() {
            return None;
        }
        self.locations.iter().find(|l| l.name == name)
    }

    /// Non-empty node names sorted for autocomplete.
    #[must_use]
    pub fn node_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .locations
            .iter()
            .filter(|l| !l.name.is_empty())
            .map(|l| l.name.clone())
            .collect();
        names.sort();
        names
    }

    /// Moves both the camera focus and the search pin to `coords`.
    pub fn focus_on(&mut self, coords: Coordinates, label: String, cause: FocusCause) {
        self.focus.retarget(coords, cause);
        self.selection = Some(SearchSelection { coords, label });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LocationKind;

    fn location(id: i64, name: &str) -> Location {
        Location {
            id,
            name: name.to_string(),
            kind: LocationKind::Mandi,
            lat: Some(30.0),
            lng: Some(76.0),
        }
    }

    #[test]
    fn default_focus_is_default_center() {
        let state = OpsState::default();
        assert_eq!(state.focus.target, DEFAULT_CENTER);
        assert_eq!(state.focus.cause, FocusCause::DefaultCenter);
        assert_eq!(state.focus.revision, 0);
        assert!(state.selection.is_none());
    }

    #[test]
    fn retargeting_same_point_still_bumps_revision() {
        let mut state = OpsState::default();
        let target = Coordinates::new(30.5, 76.0);
        state.focus_on(target, "A".to_string(), FocusCause::Incident { id: 1 });
        state.focus_on(target, "A".to_string(), FocusCause::Incident { id: 1 });
        assert_eq!(state.focus.revision, 2);
        assert_eq!(state.selection.as_ref().map(|s| s.coords), Some(target));
    }

    #[test]
    fn node_names_are_sorted() {
        let state = OpsState {
            locations: vec![location(1, "Moga Grain Market"), location(2, "Doraha")],
            ..OpsState::default()
        };
        assert_eq!(state.node_names(), vec!["Doraha", "Moga Grain Market"]);
        assert!(state.find_location("Doraha").is_some());
        assert!(state.find_location("doraha").is_none());
    }

    #[test]
    fn unnamed_nodes_are_not_searchable() {
        let state = OpsState {
            locations: vec![location(1, ""), location(2, "Doraha")],
            ..OpsState::default()
        };
        assert_eq!(state.node_names(), vec!["Doraha"]);
        assert!(state.find_location("").is_none());
    }
}
