//! One-shot status of the peg token and its pool.

use anyhow::{Context, Result};
use pegkeeper_contracts::ChainReader;
use pegkeeper_model::PegParameters;
use pegkeeper_monitor::{Monitor, MonitorConfig};
use tracing::warn;

use crate::cli::{OutputFormat, StatusArgs};
use crate::output::{format_status_detail, StatusView};

/// Warn when the contract enforces a different reserve ratio than configured.
///
/// The configured value stays authoritative.
pub(crate) fn warn_on_reserve_mismatch(on_chain_bps: u32, params: &PegParameters) -> bool {
    let configured = params.reserve_ratio_bps();
    if on_chain_bps == configured {
        return false;
    }
    warn!(
        on_chain_bps,
        configured_bps = configured,
        "on-chain reserve ratio differs from configured value; using configured value"
    );
    true
}

pub async fn run_status(args: &StatusArgs, params: &PegParameters, format: OutputFormat) -> Result<()> {
    let reader = ChainReader::new(args.network.to_config())?;
    reader.verify_chain().await?;

    let contract = reader.contract_info().await.context("Failed to read peg token state")?;
    warn_on_reserve_mismatch(contract.reserve_ratio_bps, params);

    let report = Monitor::new(*params, MonitorConfig::default())
        .sample(&reader, &reader, 0)
        .await?;

    let (wallet, lp_position) = match args.owner {
        Some(owner) => (
            Some(reader.balances(owner).await.context("Failed to read balances")?),
            reader.lp_position(owner).await.context("Failed to read pool share")?,
        ),
        None => (None, None),
    };

    let view = StatusView {
        contract,
        report,
        wallet,
        lp_position,
    };

    match format {
        OutputFormat::Table => {
            println!("{}", format_status_detail(&view));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&view)?;
            println!("{}", json);
        }
    }

    Ok(())
}
