//! CLI argument definitions using clap.

use std::path::PathBuf;
use std::str::FromStr;

use alloy_chains::NamedChain;
use alloy_primitives::Address;
use clap::{Args, Parser, Subcommand, ValueEnum};
use pegkeeper_contracts::config::{
    BSC_DEFAULT_RPC_URL, BSC_USD, PANCAKESWAP_V2_FACTORY, PANCAKESWAP_V2_ROUTER,
};
use pegkeeper_contracts::{NetworkConfig, DEFAULT_SLIPPAGE_BPS};
use pegkeeper_model::{ModelError, PegParameters, DEFAULT_RESERVE_RATIO_BPS};
use rust_decimal::Decimal;

/// Pegkeeper - peg health, liquidity planning and collateral operations
#[derive(Parser, Debug)]
#[command(name = "pegkeeper")]
#[command(about = "Peg stabilization and collateral accounting for a collateral-backed token", long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Pegged price in collateral units per token
    #[arg(long, global = true, env = "PEG_PRICE", default_value = "11")]
    pub peg: Decimal,

    /// Reserve ratio in basis points (11000 = 110%)
    #[arg(long, global = true, env = "RESERVE_RATIO_BPS", default_value_t = DEFAULT_RESERVE_RATIO_BPS)]
    pub reserve_ratio_bps: u32,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn peg_parameters(&self) -> Result<PegParameters, ModelError> {
        PegParameters::new(self.peg, self.reserve_ratio_bps)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Quote collateral for a mint or burn (offline)
    Quote {
        #[command(subcommand)]
        side: QuoteSubcommand,
    },
    /// Price impact of a trade against given pool reserves (offline)
    Impact(ImpactArgs),
    /// Liquidity depth table for candidate pool sizes (offline)
    Scenarios(ScenariosArgs),
    /// Pick the deepest liquidity tier that fits a budget
    Plan(PlanArgs),
    /// Show supply, collateral and pool health
    Status(StatusArgs),
    /// Sample health periodically until interrupted
    Monitor(MonitorArgs),
    /// Mint tokens against collateral
    Mint(TxArgs),
    /// Burn tokens for collateral
    Burn(TxArgs),
    /// Remove all liquidity and re-add it at the peg ratio
    #[command(name = "reset-pool")]
    ResetPool(ResetPoolArgs),
}

#[derive(Subcommand, Debug)]
pub enum QuoteSubcommand {
    /// Collateral required to mint an amount of tokens
    Mint(AmountArgs),
    /// Collateral returned for burning an amount of tokens
    Burn(AmountArgs),
}

#[derive(Parser, Debug)]
pub struct AmountArgs {
    /// Token amount in human-readable units (e.g., "10.5")
    pub amount: Decimal,
}

#[derive(Parser, Debug)]
pub struct ImpactArgs {
    /// Token reserve of the pool
    #[arg(long)]
    pub token_reserve: Decimal,

    /// Collateral reserve of the pool
    #[arg(long)]
    pub collateral_reserve: Decimal,

    /// Collateral paid into the pool
    #[arg(long)]
    pub trade: Decimal,

    /// Reference price (defaults to the peg)
    #[arg(long)]
    pub reference: Option<Decimal>,
}

#[derive(Parser, Debug)]
pub struct ScenariosArgs {
    /// Token amounts to evaluate, comma-separated
    #[arg(long, value_delimiter = ',')]
    pub sizes: Vec<Decimal>,
}

#[derive(Parser, Debug)]
pub struct PlanArgs {
    /// Collateral available to spend
    #[arg(long)]
    pub budget: Decimal,

    /// Tokens already held (read from chain when omitted)
    #[arg(long, conflicts_with = "execute")]
    pub balance: Option<Decimal>,

    /// Account whose balance is read (defaults to the signer)
    #[arg(long, conflicts_with = "execute")]
    pub owner: Option<Address>,

    /// Submit the selected plan, sized from the signer's own balance
    #[arg(long)]
    pub execute: bool,

    /// Slippage tolerance for the liquidity deposit, in bps
    #[arg(long, default_value_t = DEFAULT_SLIPPAGE_BPS)]
    pub slippage_bps: u32,

    /// Private key for signing transactions (can also use BSC_PRIVATE_KEY env var)
    #[arg(long, env = "BSC_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    #[command(flatten)]
    pub network: OptionalNetworkArgs,
}

#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Also show balances and pool share of this account
    #[arg(long)]
    pub owner: Option<Address>,

    #[command(flatten)]
    pub network: NetworkArgs,
}

#[derive(Parser, Debug)]
pub struct MonitorArgs {
    /// Seconds between samples
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_secs: u64,

    /// Seconds before a read is abandoned
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u64).range(1..))]
    pub read_timeout_secs: u64,

    /// Append each report as a JSON line to this file
    #[arg(long)]
    pub export: Option<PathBuf>,

    #[command(flatten)]
    pub network: NetworkArgs,
}

#[derive(Parser, Debug)]
pub struct TxArgs {
    /// Token amount in human-readable units (e.g., "10.5")
    pub amount: Decimal,

    /// Private key for signing transactions (can also use BSC_PRIVATE_KEY env var)
    #[arg(long, env = "BSC_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    #[command(flatten)]
    pub network: NetworkArgs,
}

#[derive(Parser, Debug)]
pub struct ResetPoolArgs {
    /// Tokens to deposit after the withdrawal
    #[arg(long, default_value = "10")]
    pub target_tokens: Decimal,

    /// Slippage tolerance for both steps, in bps
    #[arg(long, default_value_t = DEFAULT_SLIPPAGE_BPS)]
    pub slippage_bps: u32,

    /// Private key for signing transactions (can also use BSC_PRIVATE_KEY env var)
    #[arg(long, env = "BSC_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    #[command(flatten)]
    pub network: NetworkArgs,
}

/// Endpoint and contract addresses.
#[derive(Args, Debug, Clone)]
pub struct NetworkArgs {
    /// Peg token contract address (can also use PEG_TOKEN_ADDRESS env var)
    #[arg(long, env = "PEG_TOKEN_ADDRESS")]
    pub peg_token: Address,

    #[command(flatten)]
    pub endpoints: EndpointArgs,
}

impl NetworkArgs {
    pub fn to_config(&self) -> NetworkConfig {
        self.endpoints.to_config(self.peg_token)
    }
}

/// Same as [`NetworkArgs`] for commands that only sometimes touch the chain.
#[derive(Args, Debug, Clone)]
pub struct OptionalNetworkArgs {
    /// Peg token contract address (can also use PEG_TOKEN_ADDRESS env var)
    #[arg(long, env = "PEG_TOKEN_ADDRESS")]
    pub peg_token: Option<Address>,

    #[command(flatten)]
    pub endpoints: EndpointArgs,
}

impl OptionalNetworkArgs {
    pub fn to_config(&self) -> Option<NetworkConfig> {
        self.peg_token.map(|peg_token| self.endpoints.to_config(peg_token))
    }
}

#[derive(Args, Debug, Clone)]
pub struct EndpointArgs {
    /// RPC URL (can also use BSC_RPC_URL env var)
    #[arg(long, env = "BSC_RPC_URL", default_value = BSC_DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Chain the contracts are deployed on
    #[arg(long, default_value = "bsc")]
    pub chain: ChainArg,

    /// Collateral token address
    #[arg(long, default_value_t = BSC_USD)]
    pub collateral_token: Address,

    /// UniswapV2-style router address
    #[arg(long, default_value_t = PANCAKESWAP_V2_ROUTER)]
    pub router: Address,

    /// UniswapV2-style factory address
    #[arg(long, default_value_t = PANCAKESWAP_V2_FACTORY)]
    pub factory: Address,
}

impl EndpointArgs {
    fn to_config(&self, peg_token: Address) -> NetworkConfig {
        NetworkConfig {
            rpc_url: self.rpc_url.clone(),
            chain: self.chain.0,
            peg_token,
            collateral_token: self.collateral_token,
            router: self.router,
            factory: self.factory,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Wrapper for NamedChain that implements FromStr with aliases
#[derive(Clone, Copy, Debug)]
pub struct ChainArg(pub NamedChain);

impl FromStr for ChainArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chain = match s.to_lowercase().as_str() {
            "bsc" | "bnb" | "56" => NamedChain::BinanceSmartChain,
            "bsc-testnet" | "chapel" | "97" => NamedChain::BinanceSmartChainTestnet,
            "ethereum" | "eth" | "mainnet" | "1" => NamedChain::Mainnet,
            "sepolia" | "11155111" => NamedChain::Sepolia,
            "anvil" | "31337" => NamedChain::AnvilHardhat,
            _ => return Err(format!("Unknown chain: {}", s)),
        };
        Ok(ChainArg(chain))
    }
}

impl std::fmt::Display for ChainArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
