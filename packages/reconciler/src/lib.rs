#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident ingestion and state reconciliation.
//!
//! The [`Reconciler`] owns the authoritative dashboard state: the network
//! nodes fetched at startup, the newest-first incident feed, the active
//! map focus and the search pin. Operator text flows in through
//! [`Reconciler::analyze`], goes out to the analysis service, and the
//! structured answer is merged back as a new [`Incident`] that also
//! retargets the camera.
//!
//! At most one analysis can be in flight. A second submission while one
//! is pending is rejected with [`AnalyzeOutcome::Busy`] and never reaches
//! the network.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use rlis_client::{FailureKind, OpsApi};
use rlis_ops_models::{
    ClassificationResult, Coordinates, DEFAULT_CATEGORY, DEFAULT_CENTER, DEFAULT_PRIORITY,
    DecodedIncident, FocusCause, Incident, Location, OpsState, UNKNOWN_AREA,
};

/// What happened to a submitted log.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzeOutcome {
    /// An incident was decoded and merged into the state.
    Decoded(ClassificationResult),
    /// The text was empty after trimming; nothing was sent.
    EmptyInput,
    /// Another analysis is still in flight; nothing was sent.
    Busy,
    /// The service answered but did not decode an incident.
    NothingDecoded,
    /// The service could not be used.
    Unavailable(FailureKind),
}

impl AnalyzeOutcome {
    /// Collapses the outcome to the decoded result, if any.
    #[must_use]
    pub fn into_result(self) -> Option<ClassificationResult> {
        match self {
            Self::Decoded(result) => Some(result),
            _ => None,
        }
    }

    /// Whether an incident was decoded.
    #[must_use]
    pub const fn is_decoded(&self) -> bool {
        matches!(self, Self::Decoded(_))
    }
}

/// Owner of the dashboard state.
pub struct Reconciler<A> {
    api: A,
    state: Mutex<OpsState>,
    in_flight: AtomicBool,
    last_incident_id: AtomicI64,
}

impl<A: OpsApi> Reconciler<A> {
    /// Creates a reconciler with empty collections and the default focus.
    #[must_use]
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: Mutex::new(OpsState::default()),
            in_flight: AtomicBool::new(false),
            last_incident_id: AtomicI64::new(0),
        }
    }

    /// The underlying service client.
    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Seeds locations and incident history from the service.
    ///
    /// Both fetches run concurrently and each replaces its own collection
    /// as soon as it resolves. A failed fetch yields an empty collection.
    pub async fn initialize(&self) {
        let load_locations = async {
            let locations = self.api.list_locations().await;
            log::debug!("Replacing locations ({} fetched)", locations.len());
            self.lock_state().locations = locations;
        };
        let load_incidents = async {
            let incidents = self.api.list_incidents().await;
            log::debug!("Replacing incidents ({} fetched)", incidents.len());
            self.lock_state().incidents = incidents;
        };

        futures::join!(load_locations, load_incidents);

        let state = self.lock_state();
        log::info!(
            "Loaded {} locations and {} incidents",
            state.locations.len(),
            state.incidents.len()
        );
    }

    /// Submits `text` for analysis and merges the decoded incident.
    ///
    /// Returns the full classification result (debug payload included) on
    /// success, `None` otherwise. See [`Self::analyze_outcome`] for the
    /// distinguishing variant.
    pub async fn analyze(&self, text: &str) -> Option<ClassificationResult> {
        self.analyze_outcome(text).await.into_result()
    }

    /// Submits `text` for analysis and reports exactly what happened.
    ///
    /// State changes only on [`AnalyzeOutcome::Decoded`]: the new incident
    /// is prepended to the feed and both the focus and the search pin move
    /// to it.
    pub async fn analyze_outcome(&self, text: &str) -> AnalyzeOutcome {
        if text.trim().is_empty() {
            return AnalyzeOutcome::EmptyInput;
        }

        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            log::warn!("Analysis already in flight; ignoring submission");
            return AnalyzeOutcome::Busy;
        };

        let result = match self.api.classify(text).await {
            Ok(result) => result,
            Err(e) => {
                log::error!("Error analyzing log: {e}");
                return AnalyzeOutcome::Unavailable(e.kind());
            }
        };

        let Some(decoded) = &result.incident else {
            log::info!("Service returned no incident for submitted log");
            return AnalyzeOutcome::NothingDecoded;
        };

        let incident = self.build_incident(text, decoded, result.geo_target);
        log::info!(
            "Decoded {} incident at {} ({})",
            incident.priority,
            incident.location_name,
            incident.category
        );

        let mut state = self.lock_state();
        if let Some(position) = incident.position {
            state.focus_on(
                position,
                incident.location_name.clone(),
                FocusCause::Incident { id: incident.id },
            );
        }
        state.incidents.insert(0, incident);
        drop(state);

        AnalyzeOutcome::Decoded(result)
    }

    /// Focuses the map on the node named exactly `name`.
    ///
    /// Unknown names and nodes without valid coordinates are a silent
    /// no-op. Returns whether the focus moved.
    pub fn select_location(&self, name: &str) -> bool {
        let mut state = self.lock_state();

        let Some(coords) = state.find_location(name).and_then(Location::coordinates) else {
            log::debug!("No locatable node named {name:?}");
            return false;
        };

        state.focus_on(
            coords,
            name.to_string(),
            FocusCause::Location {
                name: name.to_string(),
            },
        );
        true
    }

    /// Whether an analysis is currently in flight.
    #[must_use]
    pub fn is_analyzing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// A copy of the current state for rendering.
    #[must_use]
    pub fn snapshot(&self) -> OpsState {
        self.lock_state().clone()
    }

    /// Node names sorted for autocomplete.
    #[must_use]
    pub fn node_names(&self) -> Vec<String> {
        self.lock_state().node_names()
    }

    fn build_incident(
        &self,
        text: &str,
        decoded: &DecodedIncident,
        geo_target: Option<Coordinates>,
    ) -> Incident {
        Incident {
            id: self.next_incident_id(),
            position: Some(
                geo_target
                    .filter(|c| c.is_valid())
                    .unwrap_or(DEFAULT_CENTER),
            ),
            location_name: decoded
                .location
                .clone()
                .unwrap_or_else(|| UNKNOWN_AREA.to_string()),
            category: decoded
                .category
                .clone()
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            priority: decoded
                .priority
                .clone()
                .unwrap_or_else(|| DEFAULT_PRIORITY.to_string()),
            text: text.to_string(),
            time: chrono::Local::now().format("%H:%M").to_string(),
        }
    }

    /// Wall-clock milliseconds, bumped to stay strictly increasing.
    fn next_incident_id(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let prev = self
            .last_incident_id
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|prev| prev);
        now.max(prev + 1)
    }

    fn lock_state(&self) -> MutexGuard<'_, OpsState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Single-slot in-flight marker, released on drop (including when the
/// analysis future is dropped mid-request).
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
