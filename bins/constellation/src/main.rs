//! Constellation CLI and Server Binary
//!
//! Commands for initializing and validating configuration, building an
//! offline snapshot, and serving the market data API.

use anyhow::{Context, Result};
use cli::{Cli, Commands, LogFormatArg};
use config::{
    generate_default_config, load_config, load_or_default, save_config, validate_config,
    MasterConfig,
};
use market_data::api::{market_data_routes, MarketDataApiState};
use market_data::snapshot::write_snapshot;
use market_data::{QuoteResolver, ReferenceTables, Snapshot, SnapshotBuilder, SnapshotCache};
use observability::{init_logging, init_metrics, LogFormat};
use server::{HttpServer, ServerConfig, ServerExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Serve {
            config,
            host,
            port,
            log_format,
        } => serve_command(config, host, port, log_format).await,
        Commands::Validate { config } => {
            init_logging("constellation", LogFormat::Pretty)?;
            validate_command(config).await
        }
        Commands::Init { output } => {
            init_logging("constellation", LogFormat::Pretty)?;
            init_command(output).await
        }
        Commands::Snapshot { config, output } => {
            init_logging("constellation", LogFormat::Pretty)?;
            snapshot_command(config, output).await
        }
    }
}

/// Log the report and fail on errors.
fn check_config(config: &MasterConfig) -> Result<()> {
    let report = validate_config(config);

    for warning in &report.warnings {
        warn!(field = %warning.field, message = %warning.message, "Configuration warning");
    }

    if !report.is_valid() {
        error!(
            error_count = report.errors.len(),
            "Configuration validation failed"
        );
        for err in &report.errors {
            error!("{}", err);
        }
        anyhow::bail!("Cannot start due to configuration errors");
    }

    Ok(())
}

async fn serve_command(
    config_path: PathBuf,
    host_override: Option<String>,
    port_override: Option<u16>,
    log_format_override: Option<LogFormatArg>,
) -> Result<()> {
    // Logging is not up yet, so config loading is reported afterwards.
    let config_exists = config_path.exists();
    let mut config = load_or_default(&config_path)?;

    let format = match log_format_override {
        Some(arg) => LogFormat::parse(arg.as_str()).unwrap_or_default(),
        None => LogFormat::parse(&config.logging.format).unwrap_or_default(),
    };
    init_logging(&config.service.name, format)?;

    if config_exists {
        info!(path = ?config_path, "Configuration loaded");
    } else {
        warn!(path = ?config_path, "Config file not found, using built-in defaults");
    }

    if let Some(host) = host_override {
        debug!(%host, "Host overridden from command line");
        config.server.host = host;
    }
    if let Some(port) = port_override {
        debug!(port, "HTTP port overridden from command line");
        config.server.port = port;
    }

    check_config(&config)?;

    if config.metrics.enabled {
        init_metrics(config.metrics.port).context("Failed to start metrics exporter")?;
    }

    let server_config = ServerConfig::new(config.server.host.clone(), config.server.port);
    server::validate_http_port(&server_config).await?;

    let tables = Arc::new(ReferenceTables::from_config(&config.synthesis));
    let snapshots = Arc::new(SnapshotCache::from_config(&config, tables.clone()));
    let quotes = Arc::new(QuoteResolver::from_config(
        &config.quotes,
        snapshots.clone(),
        tables,
    ));

    if config.snapshot.warm_on_startup {
        snapshots.warm_up().await;
    } else {
        info!("Start-up warm-up disabled; first request builds the snapshot");
    }

    let state = Arc::new(MarketDataApiState::new(snapshots, quotes));
    let server = HttpServer::new(server_config, market_data_routes(state));

    info!(
        service = %config.service.name,
        host = %config.server.host,
        port = config.server.port,
        "Starting Constellation"
    );

    server.run_with_signals().await?;
    Ok(())
}

async fn validate_command<P: AsRef<Path>>(config_path: P) -> Result<()> {
    info!(path = ?config_path.as_ref(), "Validating configuration");

    let config = match load_config(&config_path) {
        Ok(c) => c,
        Err(e) => {
            error!(%e, "Failed to load configuration");
            anyhow::bail!(e);
        }
    };

    let report = validate_config(&config);

    println!("\n=== Configuration Validation Report ===\n");

    if !report.defaults_applied.is_empty() {
        println!("Defaults Applied ({}):", report.defaults_applied.len());
        for default in &report.defaults_applied {
            println!("  [info] {} = {}", default.field, default.value);
        }
        println!();
    }

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("Configuration validation failed");
    }

    println!("[ok] Configuration is valid!");
    println!();
    println!("Service: {}", config.service.name);
    println!("Listen: {}:{}", config.server.host, config.server.port);
    println!(
        "Membership: {}",
        if config.membership.scrape_enabled {
            config.membership.source_url.as_str()
        } else {
            "static list"
        }
    );
    println!("Quote provider: {:?}", config.quotes.provider);
    println!(
        "Snapshot cache file: {}",
        config.snapshot.cache_file.as_deref().unwrap_or("(none)")
    );

    Ok(())
}

async fn init_command<P: AsRef<Path>>(output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    info!(?output_path, "Initializing new configuration file");

    let config = generate_default_config();

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    save_config(&config, output_path)?;

    println!("[ok] Configuration file created successfully!");
    println!();
    println!("Location: {:?}", output_path);
    println!();
    println!("Next steps:");
    println!("  1. Edit the configuration file to customize settings");
    println!(
        "  2. Run 'constellation validate --config {:?}' to check configuration",
        output_path
    );
    println!(
        "  3. Run 'constellation serve --config {:?}' to start the API",
        output_path
    );

    Ok(())
}

async fn snapshot_command(config_path: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let config = load_or_default(&config_path)?;
    check_config(&config)?;

    let output = output
        .or_else(|| config.snapshot.cache_file.as_ref().map(PathBuf::from))
        .context("No output path given and snapshot.cache_file is not set")?;

    let tables = Arc::new(ReferenceTables::from_config(&config.synthesis));
    let snapshot = SnapshotBuilder::from_config(&config, tables).build().await;

    if snapshot.is_empty() {
        anyhow::bail!("Snapshot build produced no records");
    }

    write_snapshot(&output, &snapshot)
        .await
        .with_context(|| format!("Failed to write snapshot to {:?}", output))?;

    print_summary(&snapshot, &output);
    Ok(())
}

fn print_summary(snapshot: &Snapshot, output: &Path) {
    println!("[ok] Snapshot written to {:?}", output);
    println!();
    println!("Records: {}", snapshot.len());
    println!("Source: {}", snapshot.source.as_str());
    println!("Generated: {}", snapshot.generated_at);
    println!("Total weight: {:.2}%", snapshot.total_weight());

    let mut top: Vec<_> = snapshot.records.iter().collect();
    top.sort_by(|a, b| b.weight.total_cmp(&a.weight));

    println!();
    println!("Top constituents by weight:");
    for record in top.iter().take(5) {
        println!(
            "  {:<6} {:>8.2}  {:>6.2}%  {}",
            record.ticker, record.price, record.weight, record.sector
        );
    }
}
