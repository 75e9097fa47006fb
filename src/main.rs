use anyhow::{Context, Result};
use crossterm::style::Stylize;
use geo_pin::api::OpenCageClient;
use geo_pin::config::config::API_KEY_ENV;
use geo_pin::config::Config;
use geo_pin::services::{
    ConfiguredLocationProvider, MountOutcome, OrchestratorSettings, SearchOrchestrator,
};
use geo_pin::ui::MapSearchApp;
use std::sync::Arc;

fn print_help() {
    println!("{}", "geo-pin - search a place, pin it on the map".blue().bold());
    println!();
    println!("{}", "Usage:".yellow());
    println!("  geo-pin [OPTIONS]");
    println!();
    println!("{}", "Options:".yellow());
    println!(
        "  {}      - Initialize configuration with wizard",
        "--init-config".green()
    );
    println!(
        "  {}  - Generate config file with defaults",
        "--generate-config".green()
    );
    println!("  {}             - Show this help", "--help".green());
    println!();
    println!("{}", "Environment:".yellow());
    println!("  {}  - OpenCage API key (required)", API_KEY_ENV.green());
    println!(
        "  {}  - Device position as \"lat,lng\"",
        "GEO_PIN_LOCATION".green()
    );
    println!();
    println!("{}", "Keys:".yellow());
    println!("  {}     - Pick the highlighted suggestion", "Enter".green());
    println!("  {}   - Move through suggestions", "Up/Down".green());
    println!("  {}       - Clear the search", "Esc".green());
    println!("  {} - Zoom the map view", "PgUp/PgDn".green());
    println!("  {}        - Toggle the log panel", "F5".green());
    println!("  {}    - Quit", "Ctrl+C".green());
}

fn generate_config() -> Result<()> {
    let path = Config::get_config_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(&path, Config::create_default_with_comments())
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Configuration file created at: {:?}", path);
    Ok(())
}

fn run() -> Result<()> {
    let dual_logger = geo_pin::utils::logging::init_tracing_with_dual_logging();
    eprintln!("📝 Debug logs: {}", dual_logger.log_path().display());

    let config = Config::load().context("loading configuration")?;
    let geocoder = OpenCageClient::from_config(&config.geocoding)?;
    tracing::info!(target: "geocode", "Using endpoint {}", geocoder.endpoint());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("starting async runtime")?;

    let mut orchestrator = SearchOrchestrator::new(
        Arc::new(geocoder),
        OrchestratorSettings::from_config(&config),
        runtime.handle().clone(),
    );

    // location prompt (if any) happens here, before the terminal goes raw
    let provider = ConfiguredLocationProvider::new(&config.location);
    if let MountOutcome::KeptDefault(err) = runtime.block_on(orchestrator.mount(&provider)) {
        eprintln!("Using default position ({})", err);
    }

    MapSearchApp::new(orchestrator, config).run()
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return;
    }

    if args.contains(&"--init-config".to_string()) {
        if let Err(e) = Config::init_wizard() {
            eprintln!("Error initializing config: {}", e);
            std::process::exit(1);
        }
        return;
    }

    if args.contains(&"--generate-config".to_string()) {
        if let Err(e) = generate_config() {
            eprintln!("Error generating config: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    if let Err(e) = run() {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}
