//! Menu-driven operator loop.

use dialoguer::{Confirm, Input, Select};
use rlis_client::OpsApi;
use rlis_panel::{QUICK_PICKS, scenarios};

use crate::session::{self, Session};

/// Top-level actions in the operator menu.
enum Action {
    SubmitLog,
    InjectScenario,
    LocateNode,
    ShowFeed,
    ShowNodes,
    ShowMarkers,
    ShowLegend,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::SubmitLog,
        Self::InjectScenario,
        Self::LocateNode,
        Self::ShowFeed,
        Self::ShowNodes,
        Self::ShowMarkers,
        Self::ShowLegend,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::SubmitLog => "Submit a driver log",
            Self::InjectScenario => "Inject a test scenario",
            Self::LocateNode => "Locate a network node",
            Self::ShowFeed => "Show incident feed",
            Self::ShowNodes => "Show network nodes",
            Self::ShowMarkers => "Show map markers",
            Self::ShowLegend => "Show map legend",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the operator menu until the user quits.
///
/// # Errors
///
/// Returns an error if a prompt fails or the marker export cannot be
/// serialized.
pub async fn run<A: OpsApi>(session: &mut Session<A>) -> Result<(), Box<dyn std::error::Error>> {
    println!("RLIS Operations Dashboard");
    println!("{}", session.panel().status_line());
    println!();

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    loop {
        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        match Action::ALL[idx] {
            Action::SubmitLog => handle_submit(session).await?,
            Action::InjectScenario => handle_scenario(session).await?,
            Action::LocateNode => handle_locate(session)?,
            Action::ShowFeed => session.print_feed(),
            Action::ShowNodes => session.print_locations(),
            Action::ShowMarkers => {
                let geojson = Confirm::new()
                    .with_prompt("Export as GeoJSON?")
                    .default(false)
                    .interact()?;
                session.print_markers(geojson)?;
            }
            Action::ShowLegend => session::print_legend(),
            Action::Quit => return Ok(()),
        }
        println!();
    }
}

async fn handle_submit<A: OpsApi>(
    session: &mut Session<A>,
) -> Result<(), Box<dyn std::error::Error>> {
    let text: String = Input::new()
        .with_prompt("Driver log")
        .allow_empty(true)
        .interact_text()?;

    if text.trim().is_empty() {
        println!("Nothing to analyze.");
        return Ok(());
    }

    session.submit(&text).await;
    Ok(())
}

async fn handle_scenario<A: OpsApi>(
    session: &mut Session<A>,
) -> Result<(), Box<dyn std::error::Error>> {
    let all = scenarios::all_scenarios();
    let labels: Vec<String> = all
        .iter()
        .map(|s| format!("{} ({})", s.title, s.expected_priority))
        .collect();

    let idx = Select::new()
        .with_prompt("Scenario")
        .items(&labels)
        .default(0)
        .interact()?;

    session.inject(&all[idx]).await;
    Ok(())
}

fn handle_locate<A: OpsApi>(session: &mut Session<A>) -> Result<(), Box<dyn std::error::Error>> {
    let nodes = session.panel().node_options();
    if nodes.is_empty() {
        println!("No nodes loaded.");
        return Ok(());
    }

    let mut labels: Vec<String> = QUICK_PICKS
        .iter()
        .map(|(badge, _)| (*badge).to_string())
        .collect();
    labels.extend(nodes.iter().cloned());

    let idx = Select::new()
        .with_prompt("Node")
        .items(&labels)
        .default(0)
        .interact()?;

    let name = QUICK_PICKS
        .get(idx)
        .map_or_else(|| nodes[idx - QUICK_PICKS.len()].as_str(), |(_, name)| *name);
    session.locate(name);
    Ok(())
}
