//! Society portal server binary

#![allow(missing_docs)]

use anyhow::Context;
use clap::Parser;
use society_portal::config::DEFAULT_CONFIG_PATH;
use society_portal::{Config, Portal};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Membership portal backend
#[derive(Debug, Parser)]
#[command(name = "portal", version, about)]
struct Cli {
    /// Configuration file; environment variables are used when it is missing
    #[arg(short, long, env = "PORTAL_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Emit logs as JSON lines
    #[arg(long, env = "PORTAL_LOG_JSON")]
    log_json: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sea_orm=warn,sqlx=warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn load_config(path: &PathBuf) -> anyhow::Result<Config> {
    let config = if path.exists() {
        Config::from_file(path)
            .await
            .with_context(|| format!("loading {}", path.display()))?
    } else {
        warn!(path = %path.display(), "Configuration file not found, using environment");
        Config::from_env().context("reading configuration from environment")?
    };

    config
        .with_env_overrides()
        .context("applying environment overrides")
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli.config).await?;
    info!(address = %config.server().address(), "Configuration ready");
    Portal::new(config).run().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
