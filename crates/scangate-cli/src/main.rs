//! Terminal runner for the voucher scan flow.
//!
//! Runs one interactive session against the configured room endpoints,
//! using stdin as the keyboard-wedge surface: every byte read is fed to the
//! capture layer as one raw symbol, so a scanner (or a paste) behaves
//! exactly like it does in the browser form.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use tokio::io::AsyncReadExt;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use scangate_capture::{ScanHandle, ScanReader};
use scangate_services::ServiceConfig;
use scangate_session::{
    SessionConfig, SessionDriver, SessionOutcome, SessionPhase, status_line,
};

#[derive(Debug, Parser)]
#[command(name = "scangate", about = "Voucher scan terminal", version)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "scangate.toml")]
    config: PathBuf,

    /// Identification number of the participant (empty routes to
    /// registration).
    #[arg(long, default_value = "")]
    id_number: String,
}

#[derive(Debug, Deserialize)]
struct AppConfig {
    #[serde(default)]
    session: SessionConfig,
    services: ServiceConfig,
}

/// Forward stdin bytes to the capture layer until EOF.
async fn pump_stdin(scanner: ScanHandle) {
    let mut stdin = tokio::io::stdin();
    let mut buf = [0u8; 64];
    loop {
        match stdin.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                for &byte in &buf[..n] {
                    if scanner.send_symbol(byte as char).await.is_err() {
                        return;
                    }
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let raw = std::fs::read_to_string(&cli.config)
        .with_context(|| format!("reading {}", cli.config.display()))?;
    let config: AppConfig = toml::from_str(&raw).context("parsing configuration")?;

    let (directory, validator, sink) = scangate_services::build(&config.services)?;
    let (reader, scanner) = ScanReader::new(config.session.idle_timeout());
    tokio::spawn(pump_stdin(scanner));

    let (status_tx, mut status_rx) = watch::channel(status_line(SessionPhase::Idle, None));
    tokio::spawn(async move {
        while status_rx.changed().await.is_ok() {
            let status = status_rx.borrow_and_update().clone();
            println!("{status}");
        }
    });

    let driver = SessionDriver::new(cli.id_number, reader, directory, validator, sink)
        .with_status_channel(status_tx);

    match driver.run().await? {
        SessionOutcome::Submitted(code) => {
            println!("Entrada registrada: {code}");
        }
        SessionOutcome::RedirectToRegistration => {
            println!("Redirigiendo a {}", config.session.register_redirect);
        }
    }

    Ok(())
}
