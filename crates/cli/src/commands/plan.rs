//! Liquidity tier planning, optionally executed on-chain.

use alloy_primitives::Address;
use anyhow::{anyhow, bail, Context, Result};
use pegkeeper_contracts::provider::connect_with_signer;
use pegkeeper_contracts::{ChainReader, ContractError, PegExecutor};
use pegkeeper_model::{evaluate_tiers, plan, LiquidityTier, ModelError, PegParameters, RebalancePlan};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::cli::{OutputFormat, PlanArgs};
use crate::output::{format_plan_detail, format_receipt, format_tiers_table};

#[derive(Debug, Serialize)]
struct PlanOutput {
    balance: Decimal,
    budget: Decimal,
    candidates: Vec<RebalancePlan>,
    selected: Option<RebalancePlan>,
}

/// Account whose token balance the plan starts from.
fn resolve_owner(args: &PlanArgs, rpc_url: &str) -> Result<Address> {
    if let Some(owner) = args.owner {
        return Ok(owner);
    }
    let key = args
        .private_key
        .as_deref()
        .context("--owner or --private-key is required to read the balance")?;
    let (_, signer) = connect_with_signer(rpc_url, key)?;
    Ok(signer)
}

async fn current_balance(args: &PlanArgs) -> Result<Decimal> {
    if let Some(balance) = args.balance {
        return Ok(balance);
    }
    let network = args
        .network
        .to_config()
        .context("--balance or --peg-token is required")?;
    let owner = resolve_owner(args, &network.rpc_url)?;
    let reader = ChainReader::new(network)?;
    reader.verify_chain().await?;
    let balances = reader.balances(owner).await.context("Failed to read token balance")?;
    info!(%owner, balance = %balances.token, "read token balance");
    Ok(balances.token)
}

/// Executor for `--execute`, whose signer also supplies the balance.
fn build_executor(args: &PlanArgs, params: &PegParameters) -> Result<PegExecutor> {
    let network = args.network.to_config().context("--peg-token is required to execute")?;
    let key = args
        .private_key
        .as_deref()
        .ok_or_else(|| anyhow!("--private-key is required to execute"))?;
    Ok(PegExecutor::new(network, key, *params)?.with_slippage_bps(args.slippage_bps))
}

async fn signer_balance(executor: &PegExecutor) -> Result<Decimal> {
    let signer = executor.signer_address();
    let balances = executor
        .reader()
        .balances(signer)
        .await
        .context("Failed to read signer balance")?;
    info!(%signer, balance = %balances.token, "read signer balance");
    Ok(balances.token)
}

/// Evaluate every default tier and select the deepest one that fits.
fn build_plan(balance: Decimal, budget: Decimal, params: &PegParameters) -> Result<PlanOutput> {
    let tiers = LiquidityTier::defaults();
    let candidates = evaluate_tiers(balance, &tiers, budget, params)?;
    let selected = match plan(balance, &tiers, budget, params) {
        Ok(selected) => Some(selected),
        Err(ModelError::Infeasible { .. }) => None,
        Err(e) => return Err(e.into()),
    };
    Ok(PlanOutput {
        balance,
        budget,
        candidates,
        selected,
    })
}

pub async fn run_plan(args: &PlanArgs, params: &PegParameters, format: OutputFormat) -> Result<()> {
    let executor = if args.execute {
        Some(build_executor(args, params)?)
    } else {
        None
    };
    let balance = match &executor {
        Some(executor) => {
            executor.verify_chain().await?;
            signer_balance(executor).await?
        }
        None => current_balance(args).await?,
    };
    let output = build_plan(balance, args.budget, params)?;

    match format {
        OutputFormat::Table => {
            println!("Token balance: {}\n", output.balance);
            println!("{}\n", format_tiers_table(&output.candidates, output.selected.as_ref().map(|p| p.tier.as_str())));
            if let Some(selected) = &output.selected {
                println!("{}", format_plan_detail(selected, output.budget));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&output)?;
            println!("{}", json);
        }
    }

    let Some(selected) = output.selected else {
        let smallest = output
            .candidates
            .last()
            .map(|c| c.total_collateral_spent)
            .unwrap_or_default();
        bail!("Budget {} is below the smallest tier's requirement of {}", output.budget, smallest);
    };

    let Some(executor) = executor else {
        return Ok(());
    };

    println!("Executing plan '{}' from {}...", selected.tier, executor.signer_address());
    let execution = match executor.execute_plan(&selected).await {
        Ok(execution) => execution,
        Err(ContractError::PartialExecution { mint, source }) => {
            println!("{}", format_receipt("Mint", &mint));
            return Err(anyhow::Error::from(*source).context("Tokens were minted but adding liquidity failed"));
        }
        Err(e) => return Err(e.into()),
    };
    if let Some(mint) = &execution.mint {
        println!("{}", format_receipt("Mint", mint));
    }
    println!("{}", format_receipt("Add liquidity", &execution.liquidity));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_plan_selects_balanced() {
        let output = build_plan(Decimal::ZERO, Decimal::from(96), &PegParameters::default()).unwrap();
        assert_eq!(output.candidates.len(), 3);
        assert_eq!(output.selected.map(|p| p.tier), Some("Balanced".to_string()));
    }

    #[test]
    fn test_build_plan_infeasible_keeps_candidates() {
        let output = build_plan(Decimal::ZERO, Decimal::from(20), &PegParameters::default()).unwrap();
        assert!(output.selected.is_none());
        assert_eq!(output.candidates.last().map(|c| c.tier.as_str()), Some("Conservative"));
    }
}
