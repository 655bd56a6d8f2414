//! Depot CLI - command line client for the warehouse API

mod commands;
mod config;
mod logging;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use commands::{Commands, Credentials};
use depot_http::{ContextId, DepotClientBuilder};
use tracing::{Level, debug};

/// How long to wait for the unauthorized hook before exiting
const UNAUTHORIZED_GRACE: Duration = Duration::from_millis(250);

#[derive(Parser)]
#[command(name = "depot")]
#[command(about = "Call the Depot warehouse API")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// API base URL, overrides the configuration
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Warehouse attached to calls, overrides the configuration
    #[arg(short = 'w', long, global = true, value_parser = <ContextId as std::str::FromStr>::from_str)]
    warehouse: Option<ContextId>,

    /// Log in as this user before running the command
    #[arg(short = 'u', long, global = true, env = "DEPOT_USER")]
    user: Option<String>,

    /// Password for --user
    #[arg(long, global = true, env = "DEPOT_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.into())?;

    let config = config::load_config(cli.config.as_deref(), cli.base_url, cli.warehouse)?;
    debug!(base_url = %config.base_url, warehouse = ?config.warehouse_id, "configuration loaded");

    let (unauthorized_tx, mut unauthorized_rx) = tokio::sync::mpsc::unbounded_channel();
    let base_url = config.base_url.trim_end_matches('/').to_string();
    let client = DepotClientBuilder::from_config(&config)
        // A CLI run ends right after the call, so there is nothing to wait for
        .unauthorized_delay(Duration::ZERO)
        .on_unauthorized(move |login_path: &str| {
            let _ = unauthorized_tx.send(format!("{base_url}/{login_path}"));
        })
        .build()?;

    let credentials = match (cli.user, cli.password) {
        (Some(username), Some(password)) => Some(Credentials { username, password }),
        (Some(_), None) => anyhow::bail!("--user requires --password or DEPOT_PASSWORD"),
        _ => None,
    };

    let envelope = cli.command.execute(&client, credentials).await?;
    println!("{}", serde_json::to_string_pretty(&envelope)?);

    if !envelope.is_success() {
        if let Ok(Some(login_url)) =
            tokio::time::timeout(UNAUTHORIZED_GRACE, unauthorized_rx.recv()).await
        {
            eprintln!("Session is not authorised; log in again at {login_url}");
        }
        std::process::exit(1);
    }

    Ok(())
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warehouse_flag_is_trimmed() {
        let cli = Cli::try_parse_from(["depot", "-w", " 7 ", "warehouses"]).unwrap();
        assert_eq!(cli.warehouse, Some(ContextId::from("7")));
    }

    #[test]
    fn blank_warehouse_flag_is_rejected() {
        assert!(Cli::try_parse_from(["depot", "--warehouse", "  ", "warehouses"]).is_err());
    }
}
