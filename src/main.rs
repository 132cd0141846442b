//! Supermarket Sim - Entry Point
//!
//! Runs the customer simulation and writes the tick log as CSV or JSON.
//! With `--routes`, every transition is also routed across the store map and
//! the routes are included in JSON output.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use supermarket_sim::core::config::SimulationConfig;
use supermarket_sim::core::error::Result;
use supermarket_sim::core::types::Tick;
use supermarket_sim::simulation::{CustomerRoute, LogRecord, Supermarket, TransitionModel};
use supermarket_sim::store::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

/// Markov-chain supermarket simulation
#[derive(Parser, Debug)]
#[command(name = "supermarket-sim")]
#[command(about = "Simulate customers moving between store sections")]
struct Args {
    /// TOML config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Minutes to simulate
    #[arg(long)]
    duration: Option<u64>,

    /// Fewest arrivals per minute
    #[arg(long)]
    min_arrivals: Option<u32>,

    /// Most arrivals per minute
    #[arg(long)]
    max_arrivals: Option<u32>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Customers walk straight onto sections instead of stopping beside them
    #[arg(long)]
    efficient: bool,

    /// Compute a walking route for every transition
    #[arg(long)]
    routes: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Write output here instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct TickRoutes {
    tick: Tick,
    clock: String,
    routes: Vec<CustomerRoute>,
}

#[derive(Serialize)]
struct RunOutput<'a> {
    seed: u64,
    log: &'a [LogRecord],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    routes: Vec<TickRoutes>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("supermarket_sim=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = resolve_config(&args)?;

    let model = match &config.transition_matrix {
        Some(path) => TransitionModel::load(path)?,
        None => TransitionModel::default_store()?,
    };
    let grid = match &config.layout {
        Some(path) => Grid::from_layout_str(&std::fs::read_to_string(path)?)?
            .with_regions(supermarket_sim::store::store_regions())?,
        None => Grid::default_store()?,
    };

    let mut market = Supermarket::from_config(Arc::new(model), &config)?;
    tracing::info!(
        "Simulating {} minutes, {}-{} arrivals per minute, seed {}",
        config.duration,
        config.min_arrivals,
        config.max_arrivals,
        market.seed()
    );

    let mut all_routes = Vec::new();
    let mut departures = 0;
    for _ in 0..config.duration {
        if config.compute_routes {
            let (summary, routes) = market.tick_with_routes(&grid, config.efficient)?;
            departures += summary.departures;
            for route in &routes {
                if let Some(path) = &route.path {
                    tracing::debug!(
                        "{} customer {}: {} -> {} in {} steps",
                        summary.clock,
                        route.customer,
                        route.from,
                        route.to,
                        path.len().saturating_sub(1)
                    );
                }
            }
            all_routes.push(TickRoutes {
                tick: summary.tick,
                clock: summary.clock,
                routes,
            });
        } else {
            departures += market.tick()?.departures;
        }
    }

    tracing::info!(
        "Finished at {}: {} customers served, {} still shopping",
        market.clock(),
        departures,
        market.active_count()
    );

    let rendered = match args.format {
        OutputFormat::Csv => market.log().to_csv(),
        OutputFormat::Json => serde_json::to_string_pretty(&RunOutput {
            seed: market.seed(),
            log: market.log().records(),
            routes: all_routes,
        })?,
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            tracing::info!("Output written to {}", path.display());
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

fn resolve_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(duration) = args.duration {
        config.duration = duration;
    }
    if let Some(min) = args.min_arrivals {
        config.min_arrivals = min;
    }
    if let Some(max) = args.max_arrivals {
        config.max_arrivals = max;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.efficient |= args.efficient;
    config.compute_routes |= args.routes;
    config.validate()?;
    Ok(config)
}
