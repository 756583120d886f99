use crate::error::CliError;
use clap::Parser;
use engine_config::settings::{SyncConfig, loader::ConfigSource};
use engine_core::{
    health,
    sync::{self, SyncOptions},
};
use std::{path::PathBuf, process::ExitCode};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod error;

#[derive(Parser, Debug)]
#[command(
    name = "pg2influx",
    version,
    about = "Copies new PostgreSQL rows into an InfluxDB measurement"
)]
struct Cli {
    /// Read this configuration file instead of discovering `app.*`
    #[arg(long, value_name = "FILE", conflicts_with = "config_dir")]
    config: Option<PathBuf>,

    /// Directory searched for `app.toml`, `app.yaml`, `app.yml` or `app.json`
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Resolve the watermark, query and build points, but skip the write
    #[arg(long)]
    dry_run: bool,

    /// Ping InfluxDB and the source database, then exit
    #[arg(long, conflicts_with = "dry_run")]
    check: bool,
}

impl Cli {
    fn config_source(&self) -> ConfigSource {
        match (&self.config, &self.config_dir) {
            (Some(file), _) => ConfigSource::File(file.clone()),
            (None, Some(dir)) => ConfigSource::Directory(dir.clone()),
            (None, None) => ConfigSource::default(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<(), CliError> {
    let (config, path) = SyncConfig::load(&cli.config_source())?;
    info!(config = %path.display(), "Loaded configuration");

    if cli.check {
        let report = health::check(&config).await?;
        info!(
            influx_version = report.influx_version.as_deref().unwrap_or("unknown"),
            "Both systems are reachable"
        );
        return Ok(());
    }

    let report = sync::run(&config, SyncOptions { dry_run: cli.dry_run }).await?;
    info!(
        watermark = %report.watermark,
        rows = report.rows_read,
        points = report.points_written,
        dry_run = report.dry_run,
        "Sync finished"
    );
    Ok(())
}
