//! db2i-bridge - offline run harness.
//!
//! Executes a configured run against a scripted in-memory session client and
//! prints the output records as JSON lines. Useful for validating run
//! configuration, paging behavior, and output shaping without a live daemon.

mod cli;

use anyhow::Context;
use cli::Cli;
use db2i_bridge::client::{MockSessionClient, ResultPage};
use db2i_bridge::config::{Config, ConnectionProfile};
use db2i_bridge::error::BridgeError;
use db2i_bridge::{execute_run, logging, WorkItem};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    logging::init_stderr_logging();
    // Pick up DB2I_* credentials from a .env file when present.
    let _ = dotenvy::dotenv();

    if let Err(e) = run().await {
        error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    let run_config = cli.to_run_config()?;

    let config_path = cli.config_path();
    let config = Config::load_from_file(&config_path)?;
    let profile = resolve_profile(&cli, &config)?;
    info!("Connection: {}", profile.display_string());

    let client = match &cli.script {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read script {}", path.display()))?;
            let pages: Vec<ResultPage> = serde_json::from_str(&text)
                .with_context(|| format!("invalid page script {}", path.display()))?;
            MockSessionClient::with_pages(pages)
        }
        None => MockSessionClient::new(),
    };

    let items = vec![WorkItem::default(); cli.items];
    let records = execute_run(&client, &profile, &run_config, &items, cli.tolerate).await?;

    for record in &records {
        let line = serde_json::to_string(record).context("cannot serialize output record")?;
        println!("{line}");
    }

    Ok(())
}

/// Resolves the connection profile: named entry, then the `default` entry,
/// then a fresh profile, with environment defaults applied last.
fn resolve_profile(cli: &Cli, config: &Config) -> Result<ConnectionProfile, BridgeError> {
    let mut profile = match cli.connection_name() {
        Some(name) => config.get_connection(Some(name)).cloned().ok_or_else(|| {
            BridgeError::config(format!("Connection '{name}' not found in config file"))
        })?,
        None => config.get_connection(None).cloned().unwrap_or_default(),
    };
    profile.apply_env_defaults();
    Ok(profile)
}
