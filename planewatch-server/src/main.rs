//! planewatch: CLI + web map for aircraft departing a single airport.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use comfy_table::{Cell, Table};
use tracing::info;
use tracing_subscriber::EnvFilter;

use planewatch_core::config::{self, Config};
use planewatch_core::types::BoundingBox;
use planewatch_core::Pipeline;

use crate::finder::{FindOutcome, FindRequest};
use crate::source::{FetchError, FileSource, FlightSource, OpenSkyClient};

mod finder;
mod source;
mod web;

#[derive(Parser)]
#[command(
    name = "planewatch",
    version,
    about = "Spot aircraft departing or about to depart an airport"
)]
struct Cli {
    /// Config file (default: ~/.planewatch/config.yaml)
    #[arg(long, global = true, env = "PLANEWATCH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look for departing aircraft once and print them
    Find {
        #[command(flatten)]
        source: SourceArgs,

        /// Print presentation records as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Serve the "Find Plane" map page
    Serve {
        #[command(flatten)]
        source: SourceArgs,

        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Bind port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the effective configuration
    Config {
        /// Write the default config file
        #[arg(long)]
        init: bool,

        /// Overwrite an existing file with --init
        #[arg(long, requires = "init")]
        force: bool,
    },
}

/// Where the data comes from; overrides the config file.
#[derive(Args, Debug, Default)]
struct SourceArgs {
    /// ICAO code of the departure airport, e.g. KDAL
    #[arg(long)]
    airport: Option<String>,

    /// Bounding box as lamin,lamax,lomin,lomax
    #[arg(long, value_parser = parse_bbox, allow_hyphen_values = true)]
    bbox: Option<BoundingBox>,

    /// Widen to a square box of this many degrees either side of the center
    #[arg(long, value_name = "DEG")]
    radius: Option<f64>,

    /// Departure lookback window in seconds
    #[arg(long)]
    lookback: Option<u64>,

    /// OpenSky API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// OpenSky account name
    #[arg(long, env = "OPENSKY_USERNAME", requires = "password")]
    username: Option<String>,

    /// OpenSky account password
    #[arg(long, env = "OPENSKY_PASSWORD", hide_env_values = true, requires = "username")]
    password: Option<String>,

    /// Read a saved /states/all response instead of calling OpenSky
    #[arg(long)]
    states_file: Option<PathBuf>,

    /// Read a saved /flights/departure response
    #[arg(long, requires = "states_file")]
    departures_file: Option<PathBuf>,
}

fn parse_bbox(text: &str) -> Result<BoundingBox, String> {
    BoundingBox::parse(text).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    };

    match cli.command {
        Commands::Find { source, json } => cmd_find(config, &source, json).await,
        Commands::Serve { source, host, port } => cmd_serve(config, &source, host, port).await,
        Commands::Config { init, force } => cmd_config(&config, cli.config.as_deref(), init, force),
    }
}

fn apply_overrides(config: &mut Config, args: &SourceArgs) {
    if let Some(code) = &args.airport {
        config.airport.code = code.trim().to_ascii_uppercase();
    }
    if let Some(bbox) = args.bbox {
        config.bbox = bbox;
    }
    if let Some(radius) = args.radius {
        let center = config.bbox.center();
        config.bbox = BoundingBox::around_point(center.lat, center.lon, radius);
    }
    if let Some(secs) = args.lookback {
        config.opensky.lookback_secs = secs;
    }
    if let Some(url) = &args.base_url {
        config.opensky.base_url = url.trim_end_matches('/').to_string();
    }
}

fn build_source(config: &Config, args: &SourceArgs) -> Result<Arc<dyn FlightSource>, FetchError> {
    if let Some(states) = &args.states_file {
        info!(states = %states.display(), "replaying saved responses");
        return Ok(Arc::new(FileSource::new(
            states.clone(),
            args.departures_file.clone(),
        )));
    }

    let credentials = match (&args.username, &args.password) {
        (Some(user), Some(pass)) => Some((user.clone(), pass.clone())),
        _ => None,
    };
    let client = OpenSkyClient::new(
        &config.opensky.base_url,
        Duration::from_secs(config.opensky.timeout_secs),
        credentials,
    )?;
    Ok(Arc::new(client))
}

async fn cmd_find(mut config: Config, args: &SourceArgs, as_json: bool) {
    apply_overrides(&mut config, args);

    let source = build_source(&config, args).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
    let pipeline = Pipeline::from_config(&config);
    let request = FindRequest {
        airport: config.airport.code.clone(),
        bbox: config.bbox,
        lookback_secs: config.opensky.lookback_secs,
        now: finder::unix_now(),
    };

    let outcome = match finder::find_planes(source.as_ref(), &pipeline, &request).await {
        Ok(o) => o,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    if as_json {
        match serde_json::to_string_pretty(&outcome) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    } else {
        print_outcome(&outcome, &config);
    }
}

async fn cmd_serve(mut config: Config, args: &SourceArgs, host: Option<String>, port: Option<u16>) {
    apply_overrides(&mut config, args);
    if let Some(host) = host {
        config.dashboard.host = host;
    }
    if let Some(port) = port {
        config.dashboard.port = port;
    }

    let source = build_source(&config, args).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
    let state = Arc::new(web::AppState {
        source,
        pipeline: Pipeline::from_config(&config),
        airport: config.airport.clone(),
        bbox: config.bbox,
        lookback_secs: config.opensky.lookback_secs,
    });

    if let Err(e) = web::serve(state, &config.dashboard.host, config.dashboard.port).await {
        eprintln!(
            "Error serving on {}:{}: {e}",
            config.dashboard.host, config.dashboard.port
        );
        std::process::exit(1);
    }
}

fn cmd_config(config: &Config, path: Option<&Path>, init: bool, force: bool) {
    if !init {
        print!("{}", config::serialize_config(config));
        println!();
        println!("# airline prefixes in effect");
        for (prefix, name) in config.airline_table().entries() {
            println!("#   {prefix}  {name}");
        }
        return;
    }

    let path = path.map(Path::to_path_buf).unwrap_or_else(config::config_file);
    if path.exists() && !force {
        eprintln!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
        std::process::exit(1);
    }
    if let Err(e) = config::save_config_to(&path, &Config::default()) {
        eprintln!("Error writing {}: {e}", path.display());
        std::process::exit(1);
    }
    println!("Wrote {}", path.display());
}

fn print_outcome(outcome: &FindOutcome, config: &Config) {
    println!();
    println!(
        "{} ({}): {} aircraft in range, {} of interest",
        config.airport.name,
        outcome.airport,
        outcome.states_seen,
        outcome.records.len()
    );
    println!();

    if let Some(message) = outcome.message {
        println!("{message}");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        "ICAO24", "Callsign", "Airline", "Status", "Hdg", "Alt (ft)", "Route", "Takeoff (UTC)",
        "Lat", "Lon",
    ]);

    for rec in &outcome.records {
        let route = rec.route().unwrap_or_else(|| "-".into());
        let takeoff = rec
            .departure
            .as_ref()
            .map(|d| d.takeoff_time.trim_end_matches(" UTC").to_string())
            .unwrap_or_else(|| "-".into());
        table.add_row(vec![
            Cell::new(&rec.icao24),
            Cell::new(&rec.callsign),
            Cell::new(&rec.airline),
            Cell::new(rec.category),
            Cell::new(&rec.heading),
            Cell::new(&rec.altitude),
            Cell::new(route),
            Cell::new(takeoff),
            Cell::new(
                rec.latitude
                    .map(|l| format!("{l:.4}"))
                    .unwrap_or("-".into()),
            ),
            Cell::new(
                rec.longitude
                    .map(|l| format!("{l:.4}"))
                    .unwrap_or("-".into()),
            ),
        ]);
    }

    println!("{table}");

    let links: Vec<_> = outcome
        .records
        .iter()
        .filter_map(|rec| rec.map_link().map(|link| (rec.title(), link)))
        .collect();
    if !links.is_empty() {
        println!();
        for (title, link) in links {
            println!("  {title}: {link}");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
