use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use scan_diary::{
    clock::LocalClock,
    config::AppConfig,
    input::{self, is_valid_barcode},
    meal::MealType,
    pipeline::{ScanEvent, ScanPipeline, run_scanner},
};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "scan-diary", version, about = "Log barcode scans to a SparkyFitness food diary")]
struct Cli {
    /// TOML config file; environment variables take precedence over it.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Dotenv file loaded before reading the environment.
    #[arg(long, value_name = "FILE", default_value = ".env")]
    env_file: PathBuf,

    /// Scanner input device, e.g. /dev/input/event3.
    #[arg(long, value_name = "PATH")]
    device: Option<String>,

    /// Type barcodes on stdin instead of reading a scanner.
    #[arg(long)]
    stdin: bool,

    /// Log every scan under this meal instead of the time-based slot.
    #[arg(long, value_name = "MEAL")]
    meal: Option<MealType>,

    /// Process a single barcode and exit.
    #[arg(long, value_name = "BARCODE")]
    once: Option<String>,
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "scan_diary=info,nutrition_sources=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // A missing .env is normal on a configured host.
    let env_loaded = dotenvy::from_path(&cli.env_file).is_ok();
    init_tracing();
    if !env_loaded {
        info!(path = %cli.env_file.display(), "no env file loaded");
    }

    let mut config = AppConfig::load(cli.config.as_deref()).context("invalid configuration")?;
    if cli.device.is_some() {
        config.scanner_device = cli.device.clone();
    }

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?
        .block_on(run(cli, config))
}

async fn run(cli: Cli, config: AppConfig) -> Result<()> {
    let pipeline = ScanPipeline::from_config(&config).context("failed to set up HTTP clients")?;
    let clock = LocalClock::new(config.timezone);

    info!(
        tracker = %config.tracker_url,
        catalog_mode = ?config.catalog_mode,
        enrichment = ?config.enrichment,
        scale = config.scale_url.is_some(),
        "scan-diary ready"
    );

    if let Some(code) = cli.once {
        let code = code.trim();
        if !is_valid_barcode(code) {
            anyhow::bail!("{code:?} is not a barcode");
        }
        let event = ScanEvent::now(code, &clock);
        pipeline.process(&event, cli.meal).await?;
        return Ok(());
    }

    let mut source = input::open_source(config.scanner_device.as_deref(), cli.stdin);
    tokio::select! {
        stats = run_scanner(&pipeline, source.as_mut(), &clock, cli.meal) => {
            let stats = stats.context("barcode input failed")?;
            info!(logged = stats.logged, failed = stats.failed, "done");
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupted");
        }
    }
    Ok(())
}
