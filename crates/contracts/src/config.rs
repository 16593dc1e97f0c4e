//! Network configuration: endpoint and contract addresses.

use alloy::primitives::{address, Address};
use alloy_chains::NamedChain;
use serde::Serialize;

/// Public BSC dataseed endpoint.
pub const BSC_DEFAULT_RPC_URL: &str = "https://bsc-dataseed1.binance.org";

/// PancakeSwap v2 router on BSC.
pub const PANCAKESWAP_V2_ROUTER: Address = address!("10ED43C718714eb63d5aA57B78B54704E256024E");

/// PancakeSwap v2 factory on BSC.
pub const PANCAKESWAP_V2_FACTORY: Address = address!("cA143Ce32Fe78f1f7019d7d551a6402fC5350c73");

/// BSC-USD (Binance-Peg USDT).
pub const BSC_USD: Address = address!("55d398326f99059fF775485246999027B3197955");

/// Where to read from and which contracts to talk to.
///
/// Built once at startup and passed to readers and executors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkConfig {
    pub rpc_url: String,
    pub chain: NamedChain,
    pub peg_token: Address,
    pub collateral_token: Address,
    pub router: Address,
    pub factory: Address,
}

impl NetworkConfig {
    /// BSC mainnet with PancakeSwap v2 and BSC-USD collateral.
    pub fn bsc_mainnet(peg_token: Address) -> Self {
        Self {
            rpc_url: BSC_DEFAULT_RPC_URL.to_string(),
            chain: NamedChain::BinanceSmartChain,
            peg_token,
            collateral_token: BSC_USD,
            router: PANCAKESWAP_V2_ROUTER,
            factory: PANCAKESWAP_V2_FACTORY,
        }
    }

    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = rpc_url.into();
        self
    }
}
