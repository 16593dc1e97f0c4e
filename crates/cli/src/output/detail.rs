//! Detailed output formatting for single results.

use colored::{ColoredString, Colorize};
use pegkeeper_contracts::{ContractInfo, LpPosition, TransactionReceipt, WalletBalances};
use pegkeeper_model::{HealthStatus, LiquidityAddition, PegParameters, RebalancePlan};
use pegkeeper_monitor::StatusReport;
use rust_decimal::Decimal;
use serde::Serialize;

/// A mint or burn quote.
#[derive(Debug, Serialize)]
pub struct QuoteSummary {
    pub operation: &'static str,
    pub token_amount: Decimal,
    pub collateral: Decimal,
    pub price_per_token: Decimal,
    pub params: PegParameters,
}

/// A price impact calculation.
#[derive(Debug, Serialize)]
pub struct ImpactSummary {
    pub token_reserve: Decimal,
    pub collateral_reserve: Decimal,
    pub trade: Decimal,
    pub reference_price: Decimal,
    pub tokens_out: Decimal,
    pub impact_pct: Decimal,
}

/// Everything `status` shows.
#[derive(Debug, Serialize)]
pub struct StatusView {
    pub contract: ContractInfo,
    pub report: StatusReport,
    pub wallet: Option<WalletBalances>,
    pub lp_position: Option<LpPosition>,
}

fn header(title: &str) -> String {
    format!("{}\n{}\n{}\n\n", "=".repeat(60), title.bold(), "=".repeat(60))
}

fn colored_status(status: HealthStatus) -> ColoredString {
    match status {
        HealthStatus::Healthy => status.to_string().green().bold(),
        HealthStatus::Warning => status.to_string().yellow().bold(),
        HealthStatus::Critical => status.to_string().red().bold(),
    }
}

fn format_bps_as_percent(bps: Decimal) -> String {
    format!("{:.2}%", bps / Decimal::ONE_HUNDRED)
}

pub fn format_quote_detail(quote: &QuoteSummary) -> String {
    let mut output = String::new();
    let direction = if quote.operation == "mint" { "Required" } else { "Returned" };

    output.push_str(&format!("{}\n", format!("Quote: {}", quote.operation).cyan().bold()));
    output.push_str(&format!("  Tokens:          {}\n", quote.token_amount));
    output.push_str(&format!("  {} Collateral: {}\n", direction, quote.collateral));
    output.push_str(&format!("  Per Token:       {:.6}\n", quote.price_per_token));
    output.push_str(&format!(
        "  Peg / Reserve:   {} / {}\n",
        quote.params.pegged_price(),
        format_bps_as_percent(Decimal::from(quote.params.reserve_ratio_bps()))
    ));
    output
}

pub fn format_impact_detail(impact: &ImpactSummary) -> String {
    let mut output = String::new();
    output.push_str(&format!("{}\n", "Price Impact".cyan().bold()));
    output.push_str(&format!(
        "  Pool:        {} tokens / {} collateral\n",
        impact.token_reserve, impact.collateral_reserve
    ));
    output.push_str(&format!("  Trade:       {} collateral in\n", impact.trade));
    output.push_str(&format!("  Tokens Out:  {:.6}\n", impact.tokens_out));
    output.push_str(&format!("  Reference:   {}\n", impact.reference_price));
    output.push_str(&format!("  Impact:      {:.4}%\n", impact.impact_pct));
    output
}

pub fn format_status_detail(view: &StatusView) -> String {
    let mut output = String::new();
    let report = &view.report;
    let health = &report.health;

    output.push_str(&header("Peg Status"));

    output.push_str(&format!("{}\n", "Supply & Collateral".cyan().bold()));
    output.push_str(&format!("  Total Supply:       {}\n", report.snapshot.total_token_supply));
    output.push_str(&format!("  Total Collateral:   {}\n", report.snapshot.total_collateral));
    output.push_str(&format!("  Theoretical Value:  {:.6}\n", health.theoretical_value));
    let surplus_label = if health.collateral_surplus.is_sign_negative() { "Deficit" } else { "Excess" };
    output.push_str(&format!("  {}:{}{:.6}\n\n", surplus_label, " ".repeat(19 - surplus_label.len()), health.collateral_surplus.abs()));

    output.push_str(&format!("{}\n", "Collateralization".cyan().bold()));
    output.push_str(&format!("  Ratio:              {}\n", health.collateralization_ratio_bps));
    output.push_str(&format!("  Peg Deviation:      {}\n", health.peg_deviation_bps));
    output.push_str(&format!(
        "  On-chain Reserve:   {}\n",
        format_bps_as_percent(Decimal::from(view.contract.reserve_ratio_bps))
    ));
    output.push_str(&format!("  Health:             {}\n\n", colored_status(health.status)));

    output.push_str(&format!("{}\n", "Pool".cyan().bold()));
    match &report.pool {
        None => output.push_str("  No pair for this token and collateral.\n\n"),
        Some(pool) if pool.is_empty() => output.push_str("  Pair exists but holds no liquidity.\n\n"),
        Some(pool) => {
            output.push_str(&format!("  Token Reserve:      {:.6}\n", pool.snapshot.token_reserve));
            output.push_str(&format!("  Collateral Reserve: {:.6}\n", pool.snapshot.collateral_reserve));
            if let Some(price) = pool.price {
                output.push_str(&format!("  Price:              {:.6}\n", price));
            }
            if let Some(deviation) = pool.deviation_bps {
                output.push_str(&format!("  Deviation:          {:.2} bps\n", deviation));
            }
            if let (Some(impact), Some(depth)) = (pool.impact_one_unit, pool.depth) {
                output.push_str(&format!("  Depth:              {} ({:.2}% per unit)\n", depth, impact));
            }
            output.push('\n');
        }
    }

    if let Some(wallet) = &view.wallet {
        output.push_str(&format!("{}\n", "Wallet".cyan().bold()));
        output.push_str(&format!("  Tokens:             {}\n", wallet.token));
        output.push_str(&format!("  Collateral:         {}\n", wallet.collateral));
        output.push_str(&format!("  LP Shares:          {}\n", wallet.lp));
        if let Some(position) = &view.lp_position {
            output.push_str(&format!(
                "  Withdrawable:       ~{:.6} tokens + ~{:.6} collateral\n",
                position.estimate.token_amount, position.estimate.collateral_amount
            ));
        }
        output.push('\n');
    }

    output
}

/// One line per monitoring tick.
pub fn format_tick_line(report: &StatusReport) -> String {
    let health = &report.health;
    let mut line = format!(
        "#{} supply={} collateral={} ratio={} status={}",
        report.tick,
        report.snapshot.total_token_supply,
        report.snapshot.total_collateral,
        health.collateralization_ratio_bps,
        colored_status(health.status)
    );
    if let Some(price) = report.pool.as_ref().and_then(|p| p.price) {
        line.push_str(&format!(" pool_price={:.4}", price));
    }
    line
}

pub fn format_plan_detail(plan: &RebalancePlan, budget: Decimal) -> String {
    let mut output = String::new();
    output.push_str(&format!("{}\n", format!("Selected Tier: {}", plan.tier).green().bold()));
    output.push_str(&format!("  Budget:               {}\n", budget));
    if plan.requires_mint() {
        output.push_str(&format!(
            "  1. Mint {} tokens for {:.2} collateral\n",
            plan.tokens_to_mint, plan.collateral_for_mint
        ));
    } else {
        output.push_str("  1. No mint needed\n");
    }
    output.push_str(&format!(
        "  2. Add {} tokens + {:.2} collateral to the pool\n",
        plan.tokens_for_liquidity, plan.collateral_for_liquidity
    ));
    output.push_str(&format!("  Total Spent:          {:.2}\n", plan.total_collateral_spent));
    output.push_str(&format!("  Remaining:            {:.2}\n", plan.remaining_budget));
    output
}

pub fn format_readd_detail(addition: &LiquidityAddition) -> String {
    format!(
        "{}\n  Tokens:     {}\n  Collateral: {:.6}\n",
        "Re-added Liquidity".cyan().bold(),
        addition.token_amount,
        addition.collateral_amount
    )
}

/// Format gas with thousands separators.
fn format_gas(gas: u64) -> String {
    let s = gas.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

pub fn format_receipt(label: &str, receipt: &TransactionReceipt) -> String {
    let mut output = String::new();
    output.push_str(&format!("{} confirmed!\n", label));
    output.push_str(&format!("  Tx Hash:   {:#x}\n", receipt.transaction_hash));
    output.push_str(&format!("  Block:     {}\n", receipt.block_number.unwrap_or_default()));
    output.push_str(&format!("  Gas Used:  {}\n", format_gas(receipt.gas_used)));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use pegkeeper_model::{assess, plan, LiquidityTier, SupplySnapshot};

    fn report(supply: i64, collateral: i64) -> StatusReport {
        let snapshot = SupplySnapshot::new(Decimal::from(supply), Decimal::from(collateral), 0).unwrap();
        StatusReport {
            tick: 7,
            snapshot,
            health: assess(&snapshot, &PegParameters::default()).unwrap(),
            pool: None,
        }
    }

    #[test]
    fn test_format_gas() {
        assert_eq!(format_gas(0), "0");
        assert_eq!(format_gas(999), "999");
        assert_eq!(format_gas(1_234_567), "1,234,567");
    }

    #[test]
    fn test_tick_line() {
        colored::control::set_override(false);
        let line = format_tick_line(&report(10, 121));
        assert!(line.starts_with("#7 supply=10 collateral=121"));
        assert!(line.contains("status=Healthy"));
    }

    #[test]
    fn test_status_detail_reports_deficit() {
        colored::control::set_override(false);
        let view = StatusView {
            contract: ContractInfo {
                total_supply: Decimal::from(10),
                total_collateral: Decimal::from(100),
                reserve_ratio_bps: 11_000,
                collateralization_ratio_bps: 9_000,
            },
            report: report(10, 100),
            wallet: None,
            lp_position: None,
        };
        let output = format_status_detail(&view);
        assert!(output.contains("Deficit"));
        assert!(output.contains("Critical"));
        assert!(output.contains("No pair"));
    }

    #[test]
    fn test_plan_detail() {
        colored::control::set_override(false);
        let params = PegParameters::default();
        let selected = plan(Decimal::ZERO, &LiquidityTier::defaults(), Decimal::from(96), &params).unwrap();
        let output = format_plan_detail(&selected, Decimal::from(96));
        assert!(output.contains("Selected Tier: Balanced"));
        assert!(output.contains("Mint 4 tokens for 48.40 collateral"));
        assert!(output.contains("Remaining:            3.60"));
    }
}
