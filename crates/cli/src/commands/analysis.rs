//! Offline pool analysis: price impact and liquidity depth scenarios.

use anyhow::{Context, Result};
use pegkeeper_model::{liquidity_scenarios, LiquidityScenario, PegParameters, PoolSnapshot, DEFAULT_SCENARIO_SIZES};
use rust_decimal::Decimal;

use crate::cli::{ImpactArgs, OutputFormat, ScenariosArgs};
use crate::output::{format_impact_detail, format_scenarios_table, ImpactSummary};

pub fn build_impact(args: &ImpactArgs, params: &PegParameters) -> Result<ImpactSummary> {
    // Token side is arbitrary here; only the reserves matter.
    let pool = PoolSnapshot::new(args.token_reserve, args.collateral_reserve, true)?;
    let reference_price = args.reference.unwrap_or_else(|| params.pegged_price());
    let tokens_out = pool.tokens_out(args.trade).context("Cannot trade against this pool")?;
    let impact_pct = pool.price_impact(args.trade, reference_price)?;

    Ok(ImpactSummary {
        token_reserve: args.token_reserve,
        collateral_reserve: args.collateral_reserve,
        trade: args.trade,
        reference_price,
        tokens_out,
        impact_pct,
    })
}

pub fn run_impact(args: &ImpactArgs, params: &PegParameters, format: OutputFormat) -> Result<()> {
    let impact = build_impact(args, params)?;

    match format {
        OutputFormat::Table => {
            println!("{}", format_impact_detail(&impact));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&impact)?;
            println!("{}", json);
        }
    }

    Ok(())
}

pub fn build_scenarios(args: &ScenariosArgs, params: &PegParameters) -> Result<Vec<LiquidityScenario>> {
    let sizes: Vec<Decimal> = if args.sizes.is_empty() {
        DEFAULT_SCENARIO_SIZES.iter().map(|&size| Decimal::from(size)).collect()
    } else {
        args.sizes.clone()
    };
    Ok(liquidity_scenarios(params.pegged_price(), &sizes)?)
}

pub fn run_scenarios(args: &ScenariosArgs, params: &PegParameters, format: OutputFormat) -> Result<()> {
    let scenarios = build_scenarios(args, params)?;

    match format {
        OutputFormat::Table => {
            println!("{}", format_scenarios_table(&scenarios));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&scenarios)?;
            println!("{}", json);
        }
    }

    Ok(())
}
