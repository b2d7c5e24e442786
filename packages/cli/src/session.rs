//! One operator session: the panel, the camera, and terminal rendering.

use rlis_cli_utils::{Activity, MultiProgress};
use rlis_client::OpsApi;
use rlis_map::{CameraController, MarkerSet};
use rlis_panel::{PanelController, scenarios::Scenario};
use rlis_reconciler::AnalyzeOutcome;

/// Panel plus camera, rendered to stdout.
pub struct Session<A> {
    panel: PanelController<A>,
    camera: CameraController,
    multi: MultiProgress,
}

impl<A: OpsApi> Session<A> {
    pub fn new(panel: PanelController<A>, multi: MultiProgress) -> Self {
        Self {
            panel,
            camera: CameraController::default(),
            multi,
        }
    }

    pub const fn panel(&self) -> &PanelController<A> {
        &self.panel
    }

    /// Submits `text` as if typed by the operator.
    pub async fn submit(&mut self, text: &str) -> AnalyzeOutcome {
        self.panel.set_input(text);
        let activity = Activity::start(&self.multi, "Analyzing log...");
        let outcome = self.panel.submit().await;
        drop(activity);
        self.report(&outcome);
        outcome
    }

    /// Injects a canned scenario.
    pub async fn inject(&mut self, scenario: &Scenario) -> AnalyzeOutcome {
        println!("Injecting \"{}\": {}", scenario.title, scenario.text);
        let activity = Activity::start(&self.multi, "Analyzing log...");
        let outcome = self.panel.run_scenario(&scenario.text).await;
        drop(activity);
        self.report(&outcome);
        outcome
    }

    /// Focuses the map on a node.
    pub fn locate(&mut self, name: &str) -> bool {
        if !self.panel.select_node(name) {
            println!("No node with coordinates named \"{name}\".");
            return false;
        }
        self.follow_focus();
        true
    }

    fn report(&mut self, outcome: &AnalyzeOutcome) {
        if let Some(view) = self.panel.extraction() {
            println!();
            println!("  TARGET  {}", view.target);
            println!("  EVENT   {}", view.event);
            println!("  ALERT   {} ({})", view.alert, view.alert_color);
            println!("  TOKENS  {}", view.tokens);
            println!("  TIME    {}", view.processing_time);
            println!();
        } else if outcome.is_decoded() {
            println!("Incident logged.");
        }
        if let Some(notice) = &self.panel.ui().notice {
            eprintln!("{notice}");
        }
        self.follow_focus();
    }

    fn follow_focus(&mut self) {
        let focus = self.panel.reconciler().snapshot().focus;
        if let Some(flight) = self.camera.observe(&focus) {
            println!(
                "Camera -> {} (zoom {}, {} ms)",
                flight.target,
                flight.zoom,
                flight.duration.as_millis()
            );
        }
    }

    pub fn print_locations(&self) {
        let state = self.panel.reconciler().snapshot();
        if state.locations.is_empty() {
            println!("No nodes loaded.");
            return;
        }

        println!("{:<6} {:<8} {:<22} NAME", "ID", "TYPE", "POSITION");
        println!("{}", "-".repeat(70));
        for location in &state.locations {
            let position = location
                .coordinates()
                .map_or_else(|| "-".to_string(), |c| c.to_string());
            println!(
                "{:<6} {:<8} {:<22} {}",
                location.id, location.kind, position, location.name
            );
        }
        println!("\n{}", self.panel.status_line());
    }

    pub fn print_feed(&self) {
        let feed = self.panel.feed();
        if feed.is_empty() {
            println!("No incidents.");
            return;
        }

        for entry in &feed {
            println!(
                "[{}] {:<6} {:<28} {}",
                entry.time, entry.color, entry.location, entry.text
            );
        }
        println!("\n{} incident(s)", feed.len());
    }

    pub fn print_markers(&self, geojson: bool) -> Result<(), serde_json::Error> {
        let markers = rlis_map::project(&self.panel.reconciler().snapshot());
        if geojson {
            println!("{}", serde_json::to_string_pretty(&markers.to_geojson())?);
        } else {
            print_marker_table(&markers);
        }
        Ok(())
    }
}

pub fn print_legend() {
    println!("NETWORK DIRECTORY");
    for entry in rlis_map::legend() {
        println!("  {:<32} {}", entry.icon.class_name, entry.label);
    }
}

fn print_marker_table(markers: &MarkerSet) {
    println!("{:<16} {:<9} {:<22} {:<5} LABEL", "KEY", "LAYER", "POSITION", "Z");
    println!("{}", "-".repeat(80));
    for marker in markers.draw_order() {
        println!(
            "{:<16} {:<9} {:<22} {:<5} {}",
            marker.key,
            marker.layer.to_string(),
            marker.position.to_string(),
            marker.z_index,
            marker.popup.title
        );
    }
    println!(
        "\n{} marker(s), boundary: {}",
        markers.len(),
        markers.boundary.label
    );
}
