//! Continuous health monitoring until Ctrl-C.

use std::time::Duration;

use anyhow::{Context, Result};
use pegkeeper_contracts::{ChainReader, ContractError};
use pegkeeper_model::PegParameters;
use pegkeeper_monitor::{JsonLinesExporter, Monitor, MonitorConfig, Tick};
use tokio::sync::watch;
use tracing::{info, warn};

use super::status::warn_on_reserve_mismatch;
use crate::cli::{MonitorArgs, OutputFormat};
use crate::output::format_tick_line;

pub async fn run_monitor(args: &MonitorArgs, params: &PegParameters, format: OutputFormat) -> Result<()> {
    let reader = ChainReader::new(args.network.to_config())?;
    match reader.verify_chain().await {
        Err(e @ ContractError::ChainMismatch { .. }) => return Err(e.into()),
        Err(e) => warn!(error = %e, "could not verify chain id"),
        Ok(()) => {}
    }

    match reader.on_chain_reserve_ratio_bps().await {
        Ok(on_chain) => {
            warn_on_reserve_mismatch(on_chain, params);
        }
        Err(e) => warn!(error = %e, "could not read on-chain reserve ratio"),
    }

    let mut exporter = args
        .export
        .as_ref()
        .map(JsonLinesExporter::open)
        .transpose()
        .context("Failed to open export file")?;

    let config = MonitorConfig {
        interval: Duration::from_secs(args.interval_secs),
        read_timeout: Duration::from_secs(args.read_timeout_secs),
    };
    let monitor = Monitor::new(*params, config);

    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, stopping after the current tick");
            let _ = stop_tx.send(true);
        }
    });

    let sink = |tick: &Tick| {
        let Ok(report) = &tick.outcome else {
            return;
        };
        match format {
            OutputFormat::Table => println!("{}", format_tick_line(report)),
            OutputFormat::Json => match serde_json::to_string(report) {
                Ok(json) => println!("{}", json),
                Err(e) => warn!(error = %e, "failed to serialize report"),
            },
        }
        if let Some(exporter) = exporter.as_mut() {
            if let Err(e) = exporter.write(report) {
                warn!(error = %e, "failed to export report");
            }
        }
    };

    let summary = monitor.run(&reader, &reader, stop_rx, sink).await;
    info!(
        ticks = summary.ticks,
        reports = summary.reports,
        failures = summary.failures,
        "monitoring finished"
    );

    Ok(())
}
