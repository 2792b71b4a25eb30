mod error;
mod geocode;
mod hospitals;
mod medication;
mod session;
#[cfg(test)]
mod test_support;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use geocode::{Geocoder, DEFAULT_GEOCODER_URL};
use hospitals::{HospitalFinder, DEFAULT_OVERPASS_URL};
use session::{OsmLocator, Session};

/// Sent with every request, as required by the Nominatim usage policy
const USER_AGENT: &str = "SimpleHospitalFinder/1.0";

#[derive(Parser)]
#[command(author, version, about = "Find common medications for a condition and hospitals near you")]
struct Cli {
    /// Geocoding endpoint (Nominatim search API)
    #[arg(long, default_value = DEFAULT_GEOCODER_URL)]
    geocoder_url: String,

    /// Overpass API interpreter endpoint
    #[arg(long, default_value = DEFAULT_OVERPASS_URL)]
    overpass_url: String,

    /// Pause after each search, in milliseconds
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,

    /// Log request details to stderr
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

/// Settings shared by every outbound request
fn client_builder() -> reqwest::blocking::ClientBuilder {
    reqwest::blocking::Client::builder().user_agent(USER_AGENT)
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let client = client_builder()
        .build()
        .context("failed to build HTTP client")?;

    let locator = OsmLocator {
        geocoder: Geocoder::new(client.clone(), cli.geocoder_url),
        finder: HospitalFinder::new(client, cli.overpass_url),
    };

    let stdin = io::stdin();
    let mut session = Session::new(
        locator,
        stdin.lock(),
        io::stdout(),
        Duration::from_millis(cli.delay_ms),
    );
    session.run().context("console I/O failed")?;

    Ok(())
}
