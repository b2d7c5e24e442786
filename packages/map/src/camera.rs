//! Camera follow behaviour.
//!
//! The camera reacts to focus writes but never writes back into the
//! dashboard state.

use std::time::Duration;

use rlis_ops_models::{ActiveFocus, Coordinates, DEFAULT_CENTER};
use serde::Serialize;

/// Zoom level of the initial overview.
pub const INITIAL_ZOOM: u8 = 9;

/// Zoom level used when flying to a focus target.
pub const FOCUS_ZOOM: u8 = 13;

/// Length of the fly-to animation.
pub const FLY_DURATION: Duration = Duration::from_millis(1500);

/// A static camera position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapView {
    /// View center.
    pub center: Coordinates,
    /// Zoom level.
    pub zoom: u8,
}

/// The view the map opens with.
#[must_use]
pub const fn initial_view() -> MapView {
    MapView {
        center: DEFAULT_CENTER,
        zoom: INITIAL_ZOOM,
    }
}

/// A smooth transition the map widget should perform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraMove {
    /// Destination center.
    pub target: Coordinates,
    /// Destination zoom.
    pub zoom: u8,
    /// Animation length.
    pub duration: Duration,
}

/// Tracks which focus revision the camera has already flown to.
#[derive(Debug, Default)]
pub struct CameraController {
    seen_revision: u64,
}

impl CameraController {
    /// Returns the move to perform if `focus` changed since the last call
    /// and points at a valid target.
    pub fn observe(&mut self, focus: &ActiveFocus) -> Option<CameraMove> {
        if focus.revision == self.seen_revision {
            return None;
        }
        self.seen_revision = focus.revision;

        if !focus.target.is_valid() {
            log::warn!("Ignoring invalid focus target {}", focus.target);
            return None;
        }

        Some(CameraMove {
            target: focus.target,
            zoom: FOCUS_ZOOM,
            duration: FLY_DURATION,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rlis_ops_models::FocusCause;

    #[test]
    fn flies_once_per_focus_write() {
        let mut camera = CameraController::default();
        let mut focus = ActiveFocus::default();
        assert_eq!(camera.observe(&focus), None);

        let target = Coordinates::new(30.70, 76.22);
        focus.retarget(
            target,
            FocusCause::Location {
                name: "Khanna Mandi".to_string(),
            },
        );
        let flight = camera.observe(&focus).expect("focus changed");
        assert_eq!(flight.target, target);
        assert_eq!(flight.zoom, FOCUS_ZOOM);
        assert_eq!(flight.duration, Duration::from_millis(1500));
        assert_eq!(camera.observe(&focus), None);

        focus.retarget(target, FocusCause::Incident { id: 1 });
        assert!(camera.observe(&focus).is_some());
    }

    #[test]
    fn invalid_target_is_not_flown_to() {
        let mut camera = CameraController::default();
        let mut focus = ActiveFocus::default();
        focus.retarget(Coordinates::new(f64::NAN, 76.0), FocusCause::Incident { id: 1 });
        assert_eq!(camera.observe(&focus), None);
        assert_eq!(initial_view().zoom, 9);
    }
}
