//! Pegkeeper CLI - peg health, liquidity planning and collateral operations.

mod cli;
mod commands;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, QuoteSubcommand};
use commands::{
    run_burn, run_impact, run_mint, run_monitor, run_plan, run_quote_burn, run_quote_mint, run_reset_pool,
    run_scenarios, run_status,
};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; flags and the environment still apply.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let params = cli.peg_parameters().context("Invalid peg parameters")?;

    match cli.command {
        Commands::Quote { side } => match side {
            QuoteSubcommand::Mint(args) => run_quote_mint(&args, &params, cli.format)?,
            QuoteSubcommand::Burn(args) => run_quote_burn(&args, &params, cli.format)?,
        },
        Commands::Impact(args) => run_impact(&args, &params, cli.format)?,
        Commands::Scenarios(args) => run_scenarios(&args, &params, cli.format)?,
        Commands::Plan(args) => run_plan(&args, &params, cli.format).await?,
        Commands::Status(args) => run_status(&args, &params, cli.format).await?,
        Commands::Monitor(args) => run_monitor(&args, &params, cli.format).await?,
        Commands::Mint(args) => run_mint(&args, &params).await?,
        Commands::Burn(args) => run_burn(&args, &params).await?,
        Commands::ResetPool(args) => run_reset_pool(&args, &params, cli.format).await?,
    }

    Ok(())
}
