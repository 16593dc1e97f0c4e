//! Read-only access to the peg token, its collateral and the pool.

use std::time::{SystemTime, UNIX_EPOCH};

use alloy::primitives::{Address, U256};
use alloy::providers::Provider;
use alloy_chains::{Chain, NamedChain};
use pegkeeper_model::{
    from_raw, LiquidityWithdrawal, PoolSnapshot, PoolSource, SupplySnapshot, SupplySource, BPS_DENOMINATOR,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::config::NetworkConfig;
use crate::erc20::IERC20;
use crate::error::{ContractError, Result};
use crate::peg_token::IPegToken;
use crate::provider::{connect_read_only, HttpProvider};
use crate::uniswap_v2::{IUniswapV2Factory, IUniswapV2Pair};

/// Pair shares always carry 18 decimals.
pub const LP_DECIMALS: u8 = 18;

/// Peg token state as the contract reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContractInfo {
    pub total_supply: Decimal,
    pub total_collateral: Decimal,
    /// Reserve ratio configured in the contract, converted to bps.
    pub reserve_ratio_bps: u32,
    /// Collateralization the contract computes itself, converted to bps.
    pub collateralization_ratio_bps: u32,
}

/// Token, collateral and LP balances of one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WalletBalances {
    pub token: Decimal,
    pub collateral: Decimal,
    pub lp: Decimal,
}

/// An account's share of the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LpPosition {
    pub lp_balance: U256,
    pub lp_total_supply: U256,
    pub estimate: LiquidityWithdrawal,
}

#[derive(Debug, Clone, Copy)]
struct PairInfo {
    address: Address,
    token_is_first: bool,
}

/// Reads chain state. Decimals are resolved once; the pair is cached once
/// the factory reports it, so a pool created later is still picked up.
pub struct ChainReader {
    provider: HttpProvider,
    network: NetworkConfig,
    decimals: OnceCell<(u8, u8)>,
    pair: OnceCell<PairInfo>,
}

impl ChainReader {
    /// Create a reader with its own read-only provider.
    pub fn new(network: NetworkConfig) -> Result<Self> {
        let provider = connect_read_only(&network.rpc_url)?;
        Ok(Self::with_provider(provider, network))
    }

    /// Create a reader over an existing provider.
    pub fn with_provider(provider: HttpProvider, network: NetworkConfig) -> Self {
        Self {
            provider,
            network,
            decimals: OnceCell::new(),
            pair: OnceCell::new(),
        }
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    pub(crate) fn provider(&self) -> &HttpProvider {
        &self.provider
    }

    /// Fail unless the endpoint serves `network.chain`.
    pub async fn verify_chain(&self) -> Result<()> {
        let actual = self
            .provider
            .get_chain_id()
            .await
            .map_err(|e| ContractError::RpcConnection(format!("Failed to get chain id: {}", e)))?;
        check_chain_id(self.network.chain, actual)?;
        debug!(chain = %self.network.chain, "endpoint chain verified");
        Ok(())
    }

    /// `(token_decimals, collateral_decimals)`.
    pub async fn decimals(&self) -> Result<(u8, u8)> {
        self.decimals
            .get_or_try_init(|| async {
                let token = self.token_decimals_of(self.network.peg_token).await?;
                let collateral = self.token_decimals_of(self.network.collateral_token).await?;
                debug!(token, collateral, "resolved decimals");
                Ok::<_, ContractError>((token, collateral))
            })
            .await
            .copied()
    }

    async fn token_decimals_of(&self, token: Address) -> Result<u8> {
        IERC20::new(token, &self.provider)
            .decimals()
            .call()
            .await
            .map_err(|e| ContractError::ReadFailed(format!("Failed to get decimals: {}", e)))
    }

    /// The pair address, or `None` if the factory has not created it.
    pub async fn pair_address(&self) -> Result<Option<Address>> {
        Ok(self.pair_info().await?.map(|p| p.address))
    }

    async fn pair_info(&self) -> Result<Option<PairInfo>> {
        if let Some(pair) = self.pair.get() {
            return Ok(Some(*pair));
        }
        let factory = IUniswapV2Factory::new(self.network.factory, &self.provider);
        let address = factory
            .getPair(self.network.peg_token, self.network.collateral_token)
            .call()
            .await
            .map_err(|e| ContractError::ReadFailed(format!("Failed to get pair: {}", e)))?;
        if address.is_zero() {
            debug!("pair not created yet");
            return Ok(None);
        }
        let token0 = IUniswapV2Pair::new(address, &self.provider)
            .token0()
            .call()
            .await
            .map_err(|e| ContractError::ReadFailed(format!("Failed to get token0: {}", e)))?;
        debug!(pair = %address, "resolved pair");
        let pair = PairInfo {
            address,
            token_is_first: token0 == self.network.peg_token,
        };
        // A concurrent lookup may have won; both saw the same factory answer.
        let _ = self.pair.set(pair);
        Ok(Some(pair))
    }

    /// Peg token state from `getContractInfo`.
    pub async fn contract_info(&self) -> Result<ContractInfo> {
        let (token_decimals, collateral_decimals) = self.decimals().await?;
        let info = IPegToken::new(self.network.peg_token, &self.provider)
            .getContractInfo()
            .call()
            .await
            .map_err(|e| ContractError::ReadFailed(format!("Failed to get contract info: {}", e)))?;

        Ok(ContractInfo {
            total_supply: from_raw(info.totalSupply, token_decimals)?,
            total_collateral: from_raw(info.totalCollateral, collateral_decimals)?,
            reserve_ratio_bps: percent_to_bps(info.reserveRatio),
            collateralization_ratio_bps: percent_to_bps(info.collateralizationRatio),
        })
    }

    /// The reserve ratio the contract enforces, in bps.
    pub async fn on_chain_reserve_ratio_bps(&self) -> Result<u32> {
        Ok(self.contract_info().await?.reserve_ratio_bps)
    }

    /// Collateral the contract would charge to mint `token_amount` (raw units).
    pub async fn collateral_needed(&self, token_amount: U256) -> Result<U256> {
        IPegToken::new(self.network.peg_token, &self.provider)
            .calculateCollateralNeeded(token_amount)
            .call()
            .await
            .map_err(|e| ContractError::ReadFailed(format!("Failed to quote mint: {}", e)))
    }

    /// Collateral the contract would return for burning `token_amount` (raw units).
    pub async fn collateral_returned(&self, token_amount: U256) -> Result<U256> {
        IPegToken::new(self.network.peg_token, &self.provider)
            .calculateUSDTReturn(token_amount)
            .call()
            .await
            .map_err(|e| ContractError::ReadFailed(format!("Failed to quote burn: {}", e)))
    }

    /// Raw ERC20 balance.
    pub async fn raw_balance(&self, token: Address, owner: Address) -> Result<U256> {
        IERC20::new(token, &self.provider)
            .balanceOf(owner)
            .call()
            .await
            .map_err(|e| ContractError::ReadFailed(format!("Failed to get balance: {}", e)))
    }

    /// Raw ERC20 allowance.
    pub async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256> {
        IERC20::new(token, &self.provider)
            .allowance(owner, spender)
            .call()
            .await
            .map_err(|e| ContractError::ReadFailed(format!("Failed to get allowance: {}", e)))
    }

    /// Token, collateral and LP balances of `owner`.
    pub async fn balances(&self, owner: Address) -> Result<WalletBalances> {
        let (token_decimals, collateral_decimals) = self.decimals().await?;
        let token = self.raw_balance(self.network.peg_token, owner).await?;
        let collateral = self.raw_balance(self.network.collateral_token, owner).await?;
        let lp = match self.pair_address().await? {
            Some(pair) => self.raw_balance(pair, owner).await?,
            None => U256::ZERO,
        };

        Ok(WalletBalances {
            token: from_raw(token, token_decimals)?,
            collateral: from_raw(collateral, collateral_decimals)?,
            lp: from_raw(lp, LP_DECIMALS)?,
        })
    }

    /// `owner`'s pool share, or `None` without a pair or LP balance.
    pub async fn lp_position(&self, owner: Address) -> Result<Option<LpPosition>> {
        let Some(pair) = self.pair_info().await? else {
            return Ok(None);
        };
        let contract = IUniswapV2Pair::new(pair.address, &self.provider);
        let lp_balance = contract
            .balanceOf(owner)
            .call()
            .await
            .map_err(|e| ContractError::ReadFailed(format!("Failed to get LP balance: {}", e)))?;
        if lp_balance.is_zero() {
            return Ok(None);
        }
        let lp_total_supply = contract
            .totalSupply()
            .call()
            .await
            .map_err(|e| ContractError::ReadFailed(format!("Failed to get LP supply: {}", e)))?;

        let Some(snapshot) = self.read_pool().await? else {
            return Ok(None);
        };
        let estimate = snapshot.withdrawal_estimate(
            from_raw(lp_balance, LP_DECIMALS)?,
            from_raw(lp_total_supply, LP_DECIMALS)?,
        )?;

        Ok(Some(LpPosition {
            lp_balance,
            lp_total_supply,
            estimate,
        }))
    }

    async fn read_supply(&self) -> Result<SupplySnapshot> {
        let info = self.contract_info().await?;
        Ok(SupplySnapshot::new(info.total_supply, info.total_collateral, unix_now())?)
    }

    async fn read_pool(&self) -> Result<Option<PoolSnapshot>> {
        let Some(pair) = self.pair_info().await? else {
            return Ok(None);
        };
        let (token_decimals, collateral_decimals) = self.decimals().await?;
        let reserves = IUniswapV2Pair::new(pair.address, &self.provider)
            .getReserves()
            .call()
            .await
            .map_err(|e| ContractError::ReadFailed(format!("Failed to get reserves: {}", e)))?;

        let snapshot = pool_snapshot_from_reserves(
            U256::from(reserves.reserve0),
            U256::from(reserves.reserve1),
            pair.token_is_first,
            token_decimals,
            collateral_decimals,
        )?;
        Ok(Some(snapshot))
    }
}

impl SupplySource for ChainReader {
    type Error = ContractError;

    async fn read_supply_snapshot(&self) -> Result<SupplySnapshot> {
        self.read_supply().await
    }
}

impl PoolSource for ChainReader {
    type Error = ContractError;

    async fn read_pool_snapshot(&self) -> Result<Option<PoolSnapshot>> {
        self.read_pool().await
    }
}

/// Scale raw pair reserves into a [`PoolSnapshot`].
pub fn pool_snapshot_from_reserves(
    reserve0: U256,
    reserve1: U256,
    token_is_first: bool,
    token_decimals: u8,
    collateral_decimals: u8,
) -> Result<PoolSnapshot> {
    let (decimals0, decimals1) = if token_is_first {
        (token_decimals, collateral_decimals)
    } else {
        (collateral_decimals, token_decimals)
    };
    let snapshot = PoolSnapshot::from_pair(
        from_raw(reserve0, decimals0)?,
        from_raw(reserve1, decimals1)?,
        token_is_first,
    )?;
    Ok(snapshot)
}

fn check_chain_id(expected: NamedChain, actual: u64) -> Result<()> {
    if Chain::from(expected).id() == actual {
        Ok(())
    } else {
        Err(ContractError::ChainMismatch { expected, actual })
    }
}

/// The contract reports ratios in whole percent.
fn percent_to_bps(percent: U256) -> u32 {
    let bps = percent.saturating_mul(U256::from(BPS_DENOMINATOR / 100));
    u32::try_from(bps).unwrap_or(u32::MAX)
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}
