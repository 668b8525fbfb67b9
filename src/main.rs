use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use hazardscreen::domain::Address;
use hazardscreen::{Analyzer, AppConfig, ScreeningError, report, server};

/// Rapid geotechnical & seismic hazard screening from a street address
///
/// Examples:
///   # Run the HTTP API on port 8000
///   hazardscreen serve
///
///   # Screen one address and write the PDF next to you
///   hazardscreen analyze "123 Main St, San Jose, CA"
///
///   # Use a config file with hazard layer endpoints and print findings as JSON
///   hazardscreen --config hazardscreen.toml analyze "123 Main St, San Jose, CA" --json
#[derive(Parser, Debug)]
#[command(name = "hazardscreen")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches hazardscreen.toml if not provided)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Bind address (defaults to the configured host, 0.0.0.0)
        #[arg(long)]
        host: Option<IpAddr>,

        /// Port (defaults to $PORT or the configured port, 8000)
        #[arg(short = 'p', long)]
        port: Option<u16>,
    },

    /// Screen a single address and write the PDF report
    Analyze {
        /// Street address, e.g. "123 Main St, San Jose, CA"
        address: String,

        /// Output PDF path (defaults to {address}_geotech_seismic_report.pdf)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Also print the findings as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let quiet = matches!(args.command, Command::Analyze { .. });
    init_tracing(args.verbose, quiet)?;

    let config = AppConfig::load(args.config.as_deref())?;

    match args.command {
        Command::Serve { host, port } => serve(config, host, port).await,
        Command::Analyze {
            address,
            output,
            json,
        } => analyze(config, &address, output, json).await,
    }
}

/// `RUST_LOG` wins when set. One-shot runs stay at `warn` so log lines do not
/// fight with the spinners.
fn init_tracing(verbose: bool, quiet: bool) -> Result<()> {
    let default = match (verbose, quiet) {
        (true, _) => "hazardscreen=debug,tower_http=debug",
        (false, true) => "hazardscreen=warn",
        (false, false) => "hazardscreen=info,tower_http=info",
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default))
        .context("Invalid log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

async fn serve(config: AppConfig, host: Option<IpAddr>, port: Option<u16>) -> Result<()> {
    let host = match host {
        Some(h) => h,
        None => config
            .server
            .host
            .parse()
            .with_context(|| format!("Invalid server host: {}", config.server.host))?,
    };
    let addr = SocketAddr::new(host, port.unwrap_or(config.server.port));

    tracing::info!(
        census = config.geocoder.use_census,
        nominatim = config.geocoder.use_nominatim,
        origins = ?config.server.allowed_origins,
        "Loaded configuration"
    );

    let analyzer = Analyzer::new(config)?;
    server::serve(analyzer, addr).await
}

async fn analyze(
    config: AppConfig,
    address: &str,
    output: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let address = Address::parse(address)?;
    let analyzer = Analyzer::new(config)?;

    println!("Rapid Geotechnical & Seismic Analyzer");
    println!("=====================================");
    println!();

    let spinner = create_spinner("Geocoding address and querying hazard layers...");
    let start = Instant::now();
    let result = match analyzer.analyze(&address).await {
        Ok(result) => result,
        Err(ScreeningError::GeocodeUnavailable) => {
            spinner.finish_and_clear();
            bail!("Could not geocode {:?}; verify the address", address.as_str());
        }
        Err(e) => return Err(e.into()),
    };
    spinner.finish_with_message(format!(
        "Located {} -> ({:.6}, {:.6}) [{:.1}s]",
        address,
        result.coordinate.lat,
        result.coordinate.lon,
        start.elapsed().as_secs_f32()
    ));

    println!();
    for (layer, finding) in result.findings.iter() {
        println!("  {}: {}", layer.label(), finding.status().as_str());
        if let Some(err) = &finding.error {
            println!("    query failed: {}", err);
        }
    }
    println!();

    let spinner = create_spinner("Rendering PDF report...");
    let start = Instant::now();
    let pdf = report::render(&result).context("Failed to render report")?;
    let output_path =
        output.unwrap_or_else(|| PathBuf::from(report::report_filename(address.as_str())));
    std::fs::write(&output_path, &pdf)
        .with_context(|| format!("Failed to write report: {}", output_path.display()))?;
    spinner.finish_with_message(format!(
        "Wrote {:.1} KB [{:.1}s]",
        pdf.len() as f64 / 1024.0,
        start.elapsed().as_secs_f32()
    ));

    println!();
    println!("Output: {}", output_path.display());

    if json {
        println!();
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to serialize findings")?
        );
    }

    Ok(())
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
