//! Contract bindings, chain readers and transaction execution for the
//! pegged token.
//!
//! [`ChainReader`] implements the model's read capabilities against the peg
//! token and its UniswapV2-style pool. [`PegExecutor`] submits mints, burns
//! and liquidity changes, approving spenders first when needed.
//!
//! # Example
//!
//! ```no_run
//! use pegkeeper_contracts::{ChainReader, NetworkConfig};
//! use pegkeeper_model::SupplySource;
//! use alloy::primitives::Address;
//!
//! #[tokio::main]
//! async fn main() -> pegkeeper_contracts::Result<()> {
//!     let peg_token: Address = "0x47b38b895A2d6E90fACE5619E85D3278dDd86476".parse().unwrap();
//!     let reader = ChainReader::new(NetworkConfig::bsc_mainnet(peg_token))?;
//!
//!     let snapshot = reader.read_supply_snapshot().await?;
//!     println!("supply: {}", snapshot.total_token_supply);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod erc20;
pub mod error;
pub mod executor;
pub mod peg_token;
pub mod prepared_call;
pub mod provider;
pub mod reader;
pub mod uniswap_v2;

pub use alloy::rpc::types::TransactionReceipt;
pub use config::NetworkConfig;
pub use error::{ContractError, Result};
pub use executor::{PegExecutor, PlanExecution, PoolReset, DEFAULT_SLIPPAGE_BPS};
pub use prepared_call::PreparedCall;
pub use provider::HttpProvider;
pub use reader::{ChainReader, ContractInfo, LpPosition, WalletBalances};
