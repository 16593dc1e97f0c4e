//! CLI argument validation tests.
//!
//! These tests verify that the CLI properly validates arguments and provides
//! helpful error messages without requiring network access.

use predicates::prelude::*;

use super::helpers::pegkeeper_cmd;

#[test]
fn test_help_output() {
    pegkeeper_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("pegkeeper"))
        .stdout(predicate::str::contains("quote"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("monitor"))
        .stdout(predicate::str::contains("reset-pool"));
}

#[test]
fn test_quote_help_output() {
    pegkeeper_cmd()
        .args(["quote", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mint"))
        .stdout(predicate::str::contains("burn"));
}

#[test]
fn test_invalid_command() {
    pegkeeper_cmd()
        .arg("invalid_command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_quote_missing_amount() {
    pegkeeper_cmd()
        .args(["quote", "mint"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_invalid_amount() {
    pegkeeper_cmd()
        .args(["quote", "mint", "lots"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_zero_amount_rejected() {
    pegkeeper_cmd()
        .args(["quote", "burn", "0"])
        .assert()
        .failure();
}

#[test]
fn test_reserve_ratio_below_full_backing_rejected() {
    pegkeeper_cmd()
        .args(["--reserve-ratio-bps", "9000", "quote", "mint", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid peg parameters"));
}

#[test]
fn test_status_requires_peg_token() {
    pegkeeper_cmd()
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--peg-token"));
}

#[test]
fn test_mint_requires_private_key() {
    pegkeeper_cmd()
        .args(["mint", "1", "--peg-token", "0x47b38b895A2d6E90fACE5619E85D3278dDd86476"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--private-key"));
}

#[test]
fn test_invalid_chain_value() {
    pegkeeper_cmd()
        .args([
            "status",
            "--peg-token",
            "0x47b38b895A2d6E90fACE5619E85D3278dDd86476",
            "--chain",
            "dogechain",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown chain"));
}

#[test]
fn test_plan_without_balance_or_network_fails() {
    pegkeeper_cmd()
        .args(["plan", "--budget", "96"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--balance or --peg-token"));
}

#[test]
fn test_plan_execute_rejects_typed_balance() {
    pegkeeper_cmd()
        .args(["plan", "--budget", "96", "--balance", "6", "--execute"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_plan_execute_rejects_other_owner() {
    pegkeeper_cmd()
        .args([
            "plan",
            "--budget",
            "96",
            "--owner",
            "0x47b38b895A2d6E90fACE5619E85D3278dDd86476",
            "--execute",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_monitor_rejects_zero_interval() {
    pegkeeper_cmd()
        .args([
            "monitor",
            "--peg-token",
            "0x47b38b895A2d6E90fACE5619E85D3278dDd86476",
            "--interval-secs",
            "0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_monitor_rejects_zero_read_timeout() {
    pegkeeper_cmd()
        .args([
            "monitor",
            "--peg-token",
            "0x47b38b895A2d6E90fACE5619E85D3278dDd86476",
            "--read-timeout-secs",
            "0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
