//! Compile-time registry of canned driver logs for scenario injection.
//!
//! Each scenario is defined in a TOML file under `scenarios/`. The
//! registry embeds these at compile time and exposes them via
//! [`all_scenarios`] and [`find_scenario`].

use rlis_ops_models::Priority;
use serde::Deserialize;
use thiserror::Error;

/// A canned driver log.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Unique identifier (e.g., `"tanker_leak"`).
    pub id: String,
    /// Button caption.
    pub title: String,
    /// Literal log text submitted to the service.
    pub text: String,
    /// Priority the service is expected to assign.
    pub expected_priority: Priority,
}

/// Errors from scenario lookup.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// No scenario has the requested id.
    #[error("Unknown scenario: {id}")]
    Unknown {
        /// The requested id.
        id: String,
    },
}

// ── Compile-time embedded TOML files ────────────────────────────────

const SCENARIO_TOMLS: &[(&str, &str)] = &[
    ("tanker_leak", include_str!("../scenarios/tanker_leak.toml")),
    (
        "mandi_chakka_jam",
        include_str!("../scenarios/mandi_chakka_jam.toml"),
    ),
    ("heavy_fog", include_str!("../scenarios/heavy_fog.toml")),
    (
        "logistics_update",
        include_str!("../scenarios/logistics_update.toml"),
    ),
];

#[cfg(test)]
const EXPECTED_SCENARIO_COUNT: usize = 4;

/// Returns every scenario, most severe first.
///
/// # Panics
///
/// Panics if any TOML config is malformed (this is a compile-time guarantee
/// since the configs are embedded).
#[must_use]
pub fn all_scenarios() -> Vec<Scenario> {
    SCENARIO_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse scenario '{name}': {e}"))
        })
        .collect()
}

/// Looks up a scenario by id.
///
/// # Errors
///
/// Returns [`ScenarioError::Unknown`] if no scenario has that id.
pub fn find_scenario(id: &str) -> Result<Scenario, ScenarioError> {
    all_scenarios()
        .into_iter()
        .find(|s| s.id == id)
        .ok_or_else(|| ScenarioError::Unknown { id: id.to_string() })
}
