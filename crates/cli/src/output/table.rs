//! Table formatting for scenario and tier lists.

use pegkeeper_model::{LiquidityScenario, RebalancePlan};
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Tabled)]
struct ScenarioRow {
    #[tabled(rename = "Tokens")]
    tokens: String,
    #[tabled(rename = "Collateral")]
    collateral: String,
    #[tabled(rename = "Impact (1)")]
    impact_small: String,
    #[tabled(rename = "Impact (10)")]
    impact_large: String,
    #[tabled(rename = "Depth")]
    depth: String,
}

#[derive(Tabled)]
struct TierRow {
    #[tabled(rename = "")]
    marker: String,
    #[tabled(rename = "Tier")]
    tier: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Mint")]
    mint: String,
    #[tabled(rename = "Mint Cost")]
    mint_cost: String,
    #[tabled(rename = "Liquidity Cost")]
    liquidity_cost: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Fits")]
    fits: String,
}

fn rounded_table<T: Tabled>(rows: Vec<T>) -> String {
    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()));
    table.to_string()
}

pub fn format_scenarios_table(scenarios: &[LiquidityScenario]) -> String {
    if scenarios.is_empty() {
        return "No scenarios.".to_string();
    }

    let rows: Vec<ScenarioRow> = scenarios
        .iter()
        .map(|s| ScenarioRow {
            tokens: format!("{:.2}", s.token_amount),
            collateral: format!("{:.2}", s.collateral_amount),
            impact_small: format!("{:.2}%", s.impact_small_trade),
            impact_large: format!("{:.2}%", s.impact_large_trade),
            depth: s.depth.to_string(),
        })
        .collect();

    rounded_table(rows)
}

/// Tier candidates, with the selected one marked.
pub fn format_tiers_table(candidates: &[RebalancePlan], selected: Option<&str>) -> String {
    if candidates.is_empty() {
        return "No tiers.".to_string();
    }

    let rows: Vec<TierRow> = candidates
        .iter()
        .map(|c| TierRow {
            marker: if selected == Some(c.tier.as_str()) { "*".to_string() } else { String::new() },
            tier: c.tier.clone(),
            target: format!("{}", c.tokens_for_liquidity),
            mint: format!("{}", c.tokens_to_mint),
            mint_cost: format!("{:.2}", c.collateral_for_mint),
            liquidity_cost: format!("{:.2}", c.collateral_for_liquidity),
            total: format!("{:.2}", c.total_collateral_spent),
            fits: if c.fits_budget() { "yes" } else { "no" }.to_string(),
        })
        .collect();

    rounded_table(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pegkeeper_model::{evaluate_tiers, liquidity_scenarios, LiquidityTier, PegParameters};
    use rust_decimal::Decimal;

    #[test]
    fn test_scenarios_table_lists_every_size() {
        let sizes = [Decimal::from(10), Decimal::from(1000)];
        let scenarios = liquidity_scenarios(Decimal::from(11), &sizes).unwrap();
        let table = format_scenarios_table(&scenarios);
        assert!(table.contains("110.00"));
        assert!(table.contains("11000.00"));
        assert!(table.contains("Excellent"));
    }

    #[test]
    fn test_tiers_table_marks_selection() {
        let candidates = evaluate_tiers(
            Decimal::ZERO,
            &LiquidityTier::defaults(),
            Decimal::from(96),
            &PegParameters::default(),
        )
        .unwrap();
        let table = format_tiers_table(&candidates, Some("Balanced"));
        assert!(table.contains("Professional"));
        assert!(table.contains("92.40"));
        assert!(table.contains('*'));
    }

    #[test]
    fn test_empty_tables() {
        assert_eq!(format_scenarios_table(&[]), "No scenarios.");
        assert_eq!(format_tiers_table(&[], None), "No tiers.");
    }
}
