#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal operations dashboard for the RLIS logistics network.
//!
//! ```text
//! rlis locations
//! rlis incidents
//! rlis analyze "Khanna Mandi bahar lambi line hai"
//! rlis scenario tanker_leak
//! rlis locate "Khanna Mandi"
//! rlis markers [--geojson]
//! rlis legend
//! rlis scenarios
//! ```
//!
//! Running `rlis` with no subcommand enters interactive mode. The analysis
//! service URL comes from `--base-url`, then `RLIS_API_BASE_URL`, then
//! `http://localhost:8000/api/v1`.

mod interactive;
mod session;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use rlis_client::OpsClient;
use rlis_panel::{PanelController, scenarios};
use rlis_reconciler::Reconciler;

use crate::session::Session;

#[derive(Parser)]
#[command(name = "rlis", about = "Road Logistics Intelligence operations dashboard")]
struct Cli {
    /// Analysis service base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List network nodes
    Locations,
    /// List the incident feed
    Incidents,
    /// Submit a driver log for analysis
    Analyze {
        /// Free-text log (Hinglish, Punjabi or English)
        text: String,
    },
    /// Inject a canned test scenario
    Scenario {
        /// Scenario id (see `rlis scenarios`)
        id: String,
    },
    /// Focus the map on a network node
    Locate {
        /// Exact node name
        name: String,
    },
    /// Print the markers the map would draw
    Markers {
        /// Emit a GeoJSON feature collection instead of a table
        #[arg(long)]
        geojson: bool,
    },
    /// Print the map legend
    Legend,
    /// List the canned test scenarios
    Scenarios,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = rlis_cli_utils::init_logger();
    let cli = Cli::parse();

    let client = cli
        .base_url
        .map_or_else(OpsClient::from_env, OpsClient::new);
    log::info!("Using analysis service at {}", client.base_url());

    let reconciler = Arc::new(Reconciler::new(client));
    reconciler.initialize().await;
    let mut session = Session::new(PanelController::new(reconciler), multi);

    let Some(command) = cli.command else {
        return interactive::run(&mut session).await;
    };

    match command {
        Commands::Locations => session.print_locations(),
        Commands::Incidents => session.print_feed(),
        Commands::Analyze { text } => {
            if !session.submit(&text).await.is_decoded() {
                std::process::exit(1);
            }
        }
        Commands::Scenario { id } => {
            let scenario = scenarios::find_scenario(&id)?;
            if !session.inject(&scenario).await.is_decoded() {
                std::process::exit(1);
            }
        }
        Commands::Locate { name } => {
            if !session.locate(&name) {
                std::process::exit(1);
            }
        }
        Commands::Markers { geojson } => session.print_markers(geojson)?,
        Commands::Legend => session::print_legend(),
        Commands::Scenarios => {
            println!("{:<18} {:<10} TEXT", "ID", "EXPECTED");
            println!("{}", "-".repeat(90));
            for scenario in scenarios::all_scenarios() {
                println!(
                    "{:<18} {:<10} {}",
                    scenario.id,
                    scenario.expected_priority.to_string(),
                    scenario.text
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn base_url_is_accepted_after_subcommand() {
        let cli = Cli::try_parse_from([
            "rlis",
            "markers",
            "--geojson",
            "--base-url",
            "http://ops:9000",
        ])
        .unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://ops:9000"));
        assert!(matches!(cli.command, Some(Commands::Markers { geojson: true })));
    }

    #[test]
    fn no_subcommand_means_interactive() {
        let cli = Cli::try_parse_from(["rlis"]).unwrap();
        assert!(cli.command.is_none());
    }
}
