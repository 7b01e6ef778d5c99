//! co2mon - desktop CO₂ monitor logger
//!
//! Prints one JSON object per interval on stdout:
//!
//! ```text
//! {"time":1700000005,"co2":612,"temp":21.4375}
//! ```
//!
//! Diagnostics go to stderr; use `-v`/`-vv`/`-vvv` or `RUST_LOG` to see more.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use co2mon::{Cli, HidTransport, JsonLinesEncoder, MonitorConfig, MonitorError, arm};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn monitor(config: MonitorConfig) -> Result<()> {
    let mut transport = HidTransport::open(config.vendor_id, config.product_id)
        .context("Failed to open CO2 monitor")?;
    arm(&mut transport, &config.key).context("Failed to arm CO2 monitor")?;

    let encoder = JsonLinesEncoder::new(std::io::stdout());
    co2mon::run(transport, &config, encoder)
        .await
        .context("Monitoring stopped")
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("co2mon={}", cli.log_level()).into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match monitor(cli.monitor_config()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            let code = e
                .downcast_ref::<MonitorError>()
                .map_or(1, MonitorError::exit_code);
            ExitCode::from(code)
        }
    }
}
