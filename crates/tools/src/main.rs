use std::path::PathBuf;

use clap::Parser;
use tools::{Scenario, ToolError, load_config, load_suppliers, render};
use tracing_subscriber::EnvFilter;
use viewport::MapDeps;

/// Render a product passport's supplier map as JSON.
#[derive(Debug, Parser)]
#[command(name = "passport-map", version)]
struct Cli {
    /// JSON array of supplier records.
    suppliers: PathBuf,

    /// Map config JSON; defaults are used when absent.
    #[arg(long, env = "PASSPORT_MAP_CONFIG")]
    config: Option<PathBuf>,

    /// Zoom level to apply once the map is ready.
    #[arg(long)]
    zoom: Option<u8>,

    /// Hover this supplier id in the journey view.
    #[arg(long)]
    hover: Option<String>,

    /// Click the marker of this supplier id.
    #[arg(long)]
    click: Option<String>,

    /// Simulate a failed surface initialization.
    #[arg(long)]
    fail_init: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main(Cli::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main(cli: Cli) -> Result<(), ToolError> {
    let config = load_config(cli.config.as_deref())?;
    let suppliers = load_suppliers(&cli.suppliers)?;
    let scenario = Scenario {
        fail_init: cli.fail_init,
        zoom: cli.zoom,
        hover: cli.hover,
        click: cli.click,
    };

    let report = render(suppliers, config, MapDeps::process(), &scenario)?;
    let payload = serde_json::to_string_pretty(&report).map_err(ToolError::Json)?;
    println!("{payload}");
    Ok(())
}
