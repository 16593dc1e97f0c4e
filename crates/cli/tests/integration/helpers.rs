//! Test helper utilities for CLI integration tests.

#![allow(deprecated)] // Command::cargo_bin deprecation

use assert_cmd::Command;

/// Create a CLI command isolated from peg and network environment variables.
pub fn pegkeeper_cmd() -> Command {
    let mut cmd = Command::cargo_bin("pegkeeper").unwrap();
    for var in [
        "PEG_PRICE",
        "RESERVE_RATIO_BPS",
        "PEG_TOKEN_ADDRESS",
        "BSC_RPC_URL",
        "BSC_PRIVATE_KEY",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Run a command with `--format json` and parse stdout.
pub fn json_output(args: &[&str]) -> serde_json::Value {
    let output = pegkeeper_cmd()
        .args(args)
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "command failed: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}
