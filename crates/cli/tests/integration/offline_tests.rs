//! Tests for commands that run without a chain connection.

use predicates::prelude::*;

use super::helpers::{json_output, pegkeeper_cmd};

#[test]
fn test_quote_mint_json() {
    let json = json_output(&["quote", "mint", "1"]);
    assert_eq!(json["operation"], "mint");
    assert_eq!(json["collateral"].as_str().unwrap().parse::<f64>().unwrap(), 12.1);
}

#[test]
fn test_quote_burn_json() {
    let json = json_output(&["quote", "burn", "10"]);
    assert_eq!(json["operation"], "burn");
    assert_eq!(json["collateral"].as_str().unwrap().parse::<f64>().unwrap(), 110.0);
}

#[test]
fn test_quote_respects_peg_override() {
    let json = json_output(&["--peg", "2", "--reserve-ratio-bps", "10000", "quote", "mint", "3"]);
    assert_eq!(json["collateral"].as_str().unwrap().parse::<f64>().unwrap(), 6.0);
}

#[test]
fn test_quote_table_output() {
    pegkeeper_cmd()
        .args(["quote", "mint", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Quote: mint"))
        .stdout(predicate::str::contains("48.4"));
}

#[test]
fn test_impact_json() {
    let json = json_output(&[
        "impact",
        "--token-reserve",
        "10",
        "--collateral-reserve",
        "110",
        "--trade",
        "1",
    ]);
    let impact: f64 = json["impact_pct"].as_str().unwrap().parse().unwrap();
    assert!((impact - 0.9009).abs() < 0.001);
}

#[test]
fn test_impact_empty_pool_fails() {
    pegkeeper_cmd()
        .args(["impact", "--token-reserve", "0", "--collateral-reserve", "110", "--trade", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_scenarios_default_sizes() {
    let json = json_output(&["scenarios"]);
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0]["depth"], "excellent");
}

#[test]
fn test_scenarios_table() {
    pegkeeper_cmd()
        .args(["scenarios", "--sizes", "10,100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Depth"))
        .stdout(predicate::str::contains("1100.00"));
}

#[test]
fn test_plan_selects_balanced_tier() {
    let json = json_output(&["plan", "--budget", "96", "--balance", "0"]);
    assert_eq!(json["selected"]["tier"], "Balanced");
    assert_eq!(json["candidates"].as_array().unwrap().len(), 3);
}

#[test]
fn test_plan_with_existing_balance() {
    let json = json_output(&["plan", "--budget", "96", "--balance", "2"]);
    assert_eq!(json["selected"]["tier"], "Balanced");
    let spent: f64 = json["selected"]["total_collateral_spent"].as_str().unwrap().parse().unwrap();
    assert_eq!(spent, 68.2);
}

#[test]
fn test_plan_infeasible_budget_fails() {
    pegkeeper_cmd()
        .args(["plan", "--budget", "20", "--balance", "0"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Conservative"))
        .stderr(predicate::str::contains("below the smallest tier"));
}
