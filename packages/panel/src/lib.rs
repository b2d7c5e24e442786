#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Operator panel for the RLIS operations dashboard.
//!
//! The panel owns only transient input state ([`UiState`]): the text box,
//! the in-flight flag, the last extraction shown inline, and an optional
//! notice. Every submission is delegated to the
//! [`Reconciler`](rlis_reconciler::Reconciler); the panel never talks to the
//! network itself.
//!
//! Manual submissions clear the text box after a successful decode.
//! Scenario injections ([`PanelController::run_scenario`]) write the canned
//! text into the box first and leave it there.

pub mod scenarios;

use std::sync::Arc;

use rlis_client::{FailureKind, OpsApi};
use rlis_ops_models::{DecodedIncident, NlpDebug, Priority};
use rlis_reconciler::{AnalyzeOutcome, Reconciler};
use serde::Serialize;

/// One-click node lookups shown under the search box: `(badge, node name)`.
pub const QUICK_PICKS: &[(&str, &str)] = &[
    ("HUB: Ludhiana", "Ludhiana Transport Nagar"),
    ("MANDI: Khanna", "Khanna Mandi"),
];

/// Transient panel state, owned by the top-level controller.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    /// Current text-box contents.
    pub input_text: String,
    /// Whether a submission is in flight.
    pub loading: bool,
    /// Debug payload of the last decoded log.
    pub last_debug: Option<NlpDebug>,
    /// Incident of the last decoded log.
    pub last_incident: Option<DecodedIncident>,
    /// Operator-facing message about the last failed submission.
    pub notice: Option<String>,
    /// Whether the system-architecture modal is open.
    pub settings_open: bool,
}

/// Where a submission came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Submission {
    /// Typed by the operator.
    Manual,
    /// Injected from the scenario list.
    Scenario,
}

/// Inline extraction summary of the last decoded log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionView {
    /// Extracted location.
    pub target: String,
    /// Extracted event category.
    pub event: String,
    /// Priority label.
    pub alert: String,
    /// Badge colour of the priority.
    pub alert_color: &'static str,
    /// Entity tokens, or `"None"`.
    pub tokens: String,
    /// Service processing time.
    pub processing_time: String,
}

/// A row of the decoded incident feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry {
    /// Location name, upper-cased.
    pub location: String,
    /// Original log text.
    pub text: String,
    /// Display time.
    pub time: String,
    /// Bullet colour derived from the priority.
    pub color: &'static str,
}

/// Panel controller bound to a shared reconciler.
pub struct PanelController<A> {
    reconciler: Arc<Reconciler<A>>,
    ui: UiState,
}

impl<A: OpsApi> PanelController<A> {
    /// Creates a panel with an empty text box.
    #[must_use]
    pub fn new(reconciler: Arc<Reconciler<A>>) -> Self {
        Self {
            reconciler,
            ui: UiState::default(),
        }
    }

    /// Current panel state.
    #[must_use]
    pub const fn ui(&self) -> &UiState {
        &self.ui
    }

    /// The reconciler this panel submits to.
    #[must_use]
    pub const fn reconciler(&self) -> &Arc<Reconciler<A>> {
        &self.reconciler
    }

    /// Replaces the text-box contents.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.ui.input_text = text.into();
    }

    /// Whether the submit action is enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.ui.loading && !self.ui.input_text.trim().is_empty()
    }

    /// Submits the text box. Clears it when an incident is decoded.
    pub async fn submit(&mut self) -> AnalyzeOutcome {
        let text = self.ui.input_text.clone();
        self.process(text, Submission::Manual).await
    }

    /// Writes `text` into the text box and submits it. The box keeps the
    /// text afterwards.
    pub async fn run_scenario(&mut self, text: &str) -> AnalyzeOutcome {
        self.ui.input_text = text.to_string();
        self.process(text.to_string(), Submission::Scenario).await
    }

    async fn process(&mut self, text: String, source: Submission) -> AnalyzeOutcome {
        if text.trim().is_empty() {
            return AnalyzeOutcome::EmptyInput;
        }

        self.ui.last_debug = None;
        self.ui.last_incident = None;
        self.ui.notice = None;
        self.ui.loading = true;

        let outcome = self.reconciler.analyze_outcome(&text).await;

        self.ui.loading = false;
        match &outcome {
            AnalyzeOutcome::Decoded(result) => {
                self.ui.last_debug.clone_from(&result.nlp_debug);
                self.ui.last_incident.clone_from(&result.incident);
                if source == Submission::Manual {
                    self.ui.input_text.clear();
                }
            }
            other => {
                self.ui.notice = notice_for(other);
                log::debug!("Submission produced no incident: {other:?}");
            }
        }

        outcome
    }

    /// Looks up a node by name and focuses the map on it.
    pub fn select_node(&self, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        self.reconciler.select_location(name)
    }

    /// Autocomplete options for the node search box.
    #[must_use]
    pub fn node_options(&self) -> Vec<String> {
        self.reconciler.node_names()
    }

    /// Opens or closes the system-architecture modal.
    pub const fn toggle_settings(&mut self) {
        self.ui.settings_open = !self.ui.settings_open;
    }

    /// Header badge text.
    #[must_use]
    pub fn status_line(&self) -> String {
        format!(
            "SYSTEM ONLINE: {} NODES",
            self.reconciler.snapshot().locations.len()
        )
    }

    /// The inline extraction summary, shown only after a decode that
    /// carried both an incident and a debug payload.
    #[must_use]
    pub fn extraction(&self) -> Option<ExtractionView> {
        let (Some(debug), Some(incident)) = (&self.ui.last_debug, &self.ui.last_incident) else {
            return None;
        };

        let alert = incident.priority.clone().unwrap_or_default();
        Some(ExtractionView {
            target: incident.location.clone().unwrap_or_default(),
            event: incident.category.clone().unwrap_or_default(),
            alert_color: badge_color(&alert),
            alert,
            tokens: if debug.entities.is_empty() {
                "None".to_string()
            } else {
                debug.entities.join(", ")
            },
            processing_time: debug.processing_time_label(),
        })
    }

    /// The decoded incident feed, newest first.
    #[must_use]
    pub fn feed(&self) -> Vec<FeedEntry> {
        self.reconciler
            .snapshot()
            .incidents
            .into_iter()
            .map(|incident| FeedEntry {
                location: incident.location_name.to_uppercase(),
                color: priority_color(&incident.priority),
                text: incident.text,
                time: incident.time,
            })
            .collect()
    }
}

/// Extraction badge colour: exact level names only, anything else is
/// green.
#[must_use]
pub fn badge_color(priority: &str) -> &'static str {
    priority
        .parse::<Priority>()
        .map_or("green", Priority::badge_color)
}

/// Feed bullet colour by case-insensitive substring; unknown values are
/// green.
#[must_use]
pub fn priority_color(priority: &str) -> &'static str {
    Priority::loose(priority).map_or("green", Priority::badge_color)
}

fn notice_for(outcome: &AnalyzeOutcome) -> Option<String> {
    let message = match outcome {
        AnalyzeOutcome::Decoded(_) | AnalyzeOutcome::EmptyInput => return None,
        AnalyzeOutcome::Busy => "An analysis is already running.",
        AnalyzeOutcome::NothingDecoded => "No incident could be decoded from this log.",
        AnalyzeOutcome::Unavailable(FailureKind::Transport) => "Analysis service unreachable.",
        AnalyzeOutcome::Unavailable(FailureKind::Status) => "Analysis service rejected the log.",
        AnalyzeOutcome::Unavailable(FailureKind::Malformed) => {
            "Analysis service sent an unreadable response."
        }
    };
    Some(message.to_string())
}
