mod catalog;
mod map;
mod preferences;
mod tracker;
mod web;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::map::MarkerBoard;
use crate::tracker::{Event, Session, Sgp4Propagator};
use crate::web::Config;

#[derive(Parser)]
#[command(name = "groundtrack")]
#[command(about = "Live satellite positions and ground tracks")]
struct Cli {
    /// YAML configuration file; built-in defaults when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the element sources and list the satellites
    Check,
    /// Run the update loop headless, logging telemetry
    Track {
        /// Stop after this many ticks
        #[arg(long)]
        ticks: Option<u64>,
        /// Satellite id to follow instead of the primary one
        #[arg(long)]
        select: Option<String>,
    },
    /// Run the update loop behind the web map
    Serve,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Check => check(&config).await,
        Commands::Track { ticks, select } => track(&config, ticks, select).await,
        Commands::Serve => serve(config).await,
    }
}

async fn load_catalog(config: &Config) -> Option<Catalog> {
    match Catalog::load(&config.sources.primary, &config.sources.bulk, &config.naming()).await {
        Ok(catalog) => Some(catalog),
        Err(e) => {
            log::error!("Failed to load satellites: {}", e);
            None
        }
    }
}

async fn check(config: &Config) -> ExitCode {
    let Some(catalog) = load_catalog(config).await else {
        return ExitCode::FAILURE;
    };

    println!("Catalog is valid ({} satellites)", catalog.len());
    for record in catalog.records() {
        println!("  {}: {}", record.id, record.name);
    }
    ExitCode::SUCCESS
}

async fn track(config: &Config, ticks: Option<u64>, select: Option<String>) -> ExitCode {
    let Some(catalog) = load_catalog(config).await else {
        return ExitCode::FAILURE;
    };

    let mut session = Session::new(
        Arc::new(catalog),
        Sgp4Propagator,
        &config.tracker.primary_id,
        config.tracker.trail_length,
        config.open_preferences(),
    );
    let mut map = MarkerBoard::default();
    session.attach(&mut map);

    if let Some(id) = select {
        if let Err(e) = session.dispatch(Event::Select(id), chrono::Utc::now(), &mut map) {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    }

    let mut interval = tokio::time::interval(config.tracker.update_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut count = 0u64;

    while ticks.is_none_or(|limit| count < limit) {
        interval.tick().await;
        let report = session.tick(chrono::Utc::now(), &mut map);
        count += 1;

        match session.telemetry() {
            Some(telemetry) => log::info!(
                "[{}] {} ({} tracked, {} skipped)\n{}",
                count,
                telemetry.name,
                report.updated.len(),
                report.skipped.len(),
                telemetry
            ),
            None => log::info!(
                "[{}] no telemetry for {} ({} tracked, {} skipped)",
                count,
                session.selected(),
                report.updated.len(),
                report.skipped.len()
            ),
        }
    }

    ExitCode::SUCCESS
}

async fn serve(config: Config) -> ExitCode {
    match web::run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
