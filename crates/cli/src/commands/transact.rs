//! Signed mint, burn and pool reset commands.

use anyhow::Result;
use pegkeeper_contracts::PegExecutor;
use pegkeeper_model::PegParameters;
use serde_json::json;

use crate::cli::{OutputFormat, ResetPoolArgs, TxArgs};
use crate::output::{format_readd_detail, format_receipt};

pub async fn run_mint(args: &TxArgs, params: &PegParameters) -> Result<()> {
    let executor = PegExecutor::new(args.network.to_config(), &args.private_key, *params)?;
    executor.verify_chain().await?;

    println!("Minting {} tokens from {}...", args.amount, executor.signer_address());
    println!("Waiting for confirmation...\n");
    let receipt = executor.mint(args.amount).await?;

    println!("{}", format_receipt("Mint", &receipt));
    Ok(())
}

pub async fn run_burn(args: &TxArgs, params: &PegParameters) -> Result<()> {
    let executor = PegExecutor::new(args.network.to_config(), &args.private_key, *params)?;
    executor.verify_chain().await?;

    println!("Burning {} tokens from {}...", args.amount, executor.signer_address());
    println!("Waiting for confirmation...\n");
    let receipt = executor.burn(args.amount).await?;

    println!("{}", format_receipt("Burn", &receipt));
    Ok(())
}

pub async fn run_reset_pool(args: &ResetPoolArgs, params: &PegParameters, format: OutputFormat) -> Result<()> {
    let executor = PegExecutor::new(args.network.to_config(), &args.private_key, *params)?
        .with_slippage_bps(args.slippage_bps);
    executor.verify_chain().await?;

    println!("Step 1: removing all liquidity held by {}...", executor.signer_address());
    let removal = executor.remove_all_liquidity().await?;
    match &removal {
        Some(receipt) => println!("{}", format_receipt("Remove liquidity", receipt)),
        None => println!("No liquidity to remove.\n"),
    }

    println!("Step 2: re-adding up to {} tokens at the peg ratio...", args.target_tokens);
    let (addition, receipt) = executor.readd_liquidity(args.target_tokens).await?;

    match format {
        OutputFormat::Table => {
            println!("{}", format_readd_detail(&addition));
            println!("{}", format_receipt("Add liquidity", &receipt));
        }
        OutputFormat::Json => {
            let output = json!({
                "removed": removal.as_ref().map(|r| r.transaction_hash),
                "addition": addition,
                "tx_hash": receipt.transaction_hash,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
