//! Signer-bound transaction execution.
//!
//! Every token movement is two phases: [`PegExecutor::ensure_allowance`]
//! confirms (or submits and waits for) the approval, then the state-changing
//! call is submitted. Nothing here decides *what* to do; plans come from
//! `pegkeeper-model`.

use std::time::{SystemTime, UNIX_EPOCH};

use alloy::primitives::{Address, U256};
use alloy::rpc::types::TransactionReceipt;
use pegkeeper_model::{
    from_raw, plan_readd, to_raw, LiquidityAddition, ModelError, PegParameters, PoolSource, RebalancePlan,
    BPS_DENOMINATOR,
};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::config::NetworkConfig;
use crate::erc20::IERC20;
use crate::error::{ContractError, Result};
use crate::peg_token::IPegToken;
use crate::prepared_call::PreparedCall;
use crate::provider::{connect_with_signer, HttpProvider};
use crate::reader::{ChainReader, LP_DECIMALS};
use crate::uniswap_v2::IUniswapV2Router;

/// Default slippage tolerance for liquidity operations (1%).
pub const DEFAULT_SLIPPAGE_BPS: u32 = 100;

/// Router deadline offset from submission time.
pub const DEADLINE_SECS: u64 = 20 * 60;

/// Receipts from [`PegExecutor::execute_plan`].
#[derive(Debug)]
pub struct PlanExecution {
    pub mint: Option<TransactionReceipt>,
    pub liquidity: TransactionReceipt,
}

/// Outcome of [`PegExecutor::reset_pool`].
#[derive(Debug)]
pub struct PoolReset {
    /// `None` when there was no liquidity to remove.
    pub removal: Option<TransactionReceipt>,
    pub addition: LiquidityAddition,
    pub liquidity: TransactionReceipt,
}

/// Submits mint, burn and liquidity transactions from one signer.
pub struct PegExecutor {
    reader: ChainReader,
    signer_address: Address,
    params: PegParameters,
    slippage_bps: u32,
}

impl PegExecutor {
    /// Create an executor. No RPC call is made until the first operation.
    pub fn new(network: NetworkConfig, private_key: &str, params: PegParameters) -> Result<Self> {
        let (provider, signer_address) = connect_with_signer(&network.rpc_url, private_key)?;
        Ok(Self {
            reader: ChainReader::with_provider(provider, network),
            signer_address,
            params,
            slippage_bps: DEFAULT_SLIPPAGE_BPS,
        })
    }

    /// Set the slippage tolerance, capped at 100%.
    pub fn with_slippage_bps(mut self, slippage_bps: u32) -> Self {
        self.slippage_bps = slippage_bps.min(BPS_DENOMINATOR);
        self
    }

    pub fn signer_address(&self) -> Address {
        self.signer_address
    }

    pub fn slippage_bps(&self) -> u32 {
        self.slippage_bps
    }

    pub fn reader(&self) -> &ChainReader {
        &self.reader
    }

    fn provider(&self) -> &HttpProvider {
        self.reader.provider()
    }

    fn network(&self) -> &NetworkConfig {
        self.reader.network()
    }

    /// Fail unless the endpoint serves the configured chain.
    pub async fn verify_chain(&self) -> Result<()> {
        self.reader.verify_chain().await
    }

    /// Build an ERC20 approval.
    pub fn approve(&self, token: Address, spender: Address, amount: U256) -> PreparedCall<'_, IERC20::approveCall> {
        let call = IERC20::approveCall { spender, amount };
        PreparedCall::new(token, call, U256::ZERO, self.provider())
    }

    /// Make sure `spender` may move `amount` of `token`.
    ///
    /// Submits an approval only when the current allowance is short, and
    /// returns after its receipt. `None` means no approval was needed.
    pub async fn ensure_allowance(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<Option<TransactionReceipt>> {
        let current = self.reader.allowance(token, self.signer_address, spender).await?;
        if current >= amount {
            debug!(%token, %spender, "allowance sufficient");
            return Ok(None);
        }
        info!(%token, %spender, %amount, "approving");
        let receipt = self.approve(token, spender, amount).send().await?;
        Ok(Some(receipt))
    }

    /// Build a `mintTokens` call for a raw token amount.
    pub fn mint_call(&self, raw_amount: U256) -> PreparedCall<'_, IPegToken::mintTokensCall> {
        let call = IPegToken::mintTokensCall {
            tokenAmount: raw_amount,
        };
        PreparedCall::new(self.network().peg_token, call, U256::ZERO, self.provider())
    }

    /// Build a `burnTokens` call for a raw token amount.
    pub fn burn_call(&self, raw_amount: U256) -> PreparedCall<'_, IPegToken::burnTokensCall> {
        let call = IPegToken::burnTokensCall {
            tokenAmount: raw_amount,
        };
        PreparedCall::new(self.network().peg_token, call, U256::ZERO, self.provider())
    }

    /// Mint `token_amount` tokens, approving collateral first if needed.
    ///
    /// The collateral charged is the contract's own quote.
    pub async fn mint(&self, token_amount: Decimal) -> Result<TransactionReceipt> {
        let (token_decimals, _) = self.reader.decimals().await?;
        let raw_amount = positive_raw(token_amount, token_decimals)?;
        let network = self.network();

        let needed = self.reader.collateral_needed(raw_amount).await?;
        let have = self.reader.raw_balance(network.collateral_token, self.signer_address).await?;
        if have < needed {
            return Err(ContractError::InsufficientBalance { have, need: needed });
        }

        self.ensure_allowance(network.collateral_token, network.peg_token, needed).await?;
        info!(%token_amount, collateral = %needed, "minting");
        self.mint_call(raw_amount).send().await
    }

    /// Burn `token_amount` tokens for collateral.
    pub async fn burn(&self, token_amount: Decimal) -> Result<TransactionReceipt> {
        let (token_decimals, _) = self.reader.decimals().await?;
        let raw_amount = positive_raw(token_amount, token_decimals)?;

        let have = self.reader.raw_balance(self.network().peg_token, self.signer_address).await?;
        if have < raw_amount {
            return Err(ContractError::InsufficientBalance { have, need: raw_amount });
        }

        info!(%token_amount, "burning");
        self.burn_call(raw_amount).send().await
    }

    /// Deposit tokens and collateral into the pool through the router.
    pub async fn add_liquidity(&self, token_amount: Decimal, collateral_amount: Decimal) -> Result<TransactionReceipt> {
        let (token_decimals, collateral_decimals) = self.reader.decimals().await?;
        let raw_token = positive_raw(token_amount, token_decimals)?;
        let raw_collateral = positive_raw(collateral_amount, collateral_decimals)?;
        let network = self.network();

        for (token, need) in [(network.peg_token, raw_token), (network.collateral_token, raw_collateral)] {
            let have = self.reader.raw_balance(token, self.signer_address).await?;
            if have < need {
                return Err(ContractError::InsufficientBalance { have, need });
            }
        }

        self.ensure_allowance(network.peg_token, network.router, raw_token).await?;
        self.ensure_allowance(network.collateral_token, network.router, raw_collateral).await?;

        let call = IUniswapV2Router::addLiquidityCall {
            tokenA: network.peg_token,
            tokenB: network.collateral_token,
            amountADesired: raw_token,
            amountBDesired: raw_collateral,
            amountAMin: min_with_slippage(raw_token, self.slippage_bps),
            amountBMin: min_with_slippage(raw_collateral, self.slippage_bps),
            to: self.signer_address,
            deadline: deadline(unix_now()),
        };
        info!(%token_amount, %collateral_amount, "adding liquidity");
        PreparedCall::new(network.router, call, U256::ZERO, self.provider()).send().await
    }

    /// Withdraw `lp_amount` pool shares through the router.
    ///
    /// Minimums apply the slippage tolerance to the pro-rata estimate; the
    /// actual amounts follow whatever ratio the pool holds.
    pub async fn remove_liquidity(&self, lp_amount: U256) -> Result<TransactionReceipt> {
        let network = self.network();
        let pair = self.reader.pair_address().await?.ok_or(ContractError::PairNotFound)?;
        let (token_decimals, collateral_decimals) = self.reader.decimals().await?;

        let lp_total = IERC20::new(pair, self.provider())
            .totalSupply()
            .call()
            .await
            .map_err(|e| ContractError::ReadFailed(format!("Failed to get LP supply: {}", e)))?;
        let pool = self
            .reader
            .read_pool_snapshot()
            .await?
            .ok_or(ContractError::PairNotFound)?;
        let estimate = pool.withdrawal_estimate(from_raw(lp_amount, LP_DECIMALS)?, from_raw(lp_total, LP_DECIMALS)?)?;

        self.ensure_allowance(pair, network.router, lp_amount).await?;

        let call = IUniswapV2Router::removeLiquidityCall {
            tokenA: network.peg_token,
            tokenB: network.collateral_token,
            liquidity: lp_amount,
            amountAMin: min_with_slippage(to_raw(estimate.token_amount, token_decimals)?, self.slippage_bps),
            amountBMin: min_with_slippage(to_raw(estimate.collateral_amount, collateral_decimals)?, self.slippage_bps),
            to: self.signer_address,
            deadline: deadline(unix_now()),
        };
        info!(lp = %lp_amount, "removing liquidity");
        PreparedCall::new(network.router, call, U256::ZERO, self.provider()).send().await
    }

    /// Withdraw the signer's entire pool share. `None` when it holds none.
    pub async fn remove_all_liquidity(&self) -> Result<Option<TransactionReceipt>> {
        let Some(pair) = self.reader.pair_address().await? else {
            return Ok(None);
        };
        let lp_balance = self.reader.raw_balance(pair, self.signer_address).await?;
        if lp_balance.is_zero() {
            debug!("no liquidity to remove");
            return Ok(None);
        }
        self.remove_liquidity(lp_balance).await.map(Some)
    }

    /// Run a rebalance plan: mint the shortfall (if any), then add liquidity.
    ///
    /// Balances are checked against both steps before anything is sent. If
    /// the deposit still fails after a mint was mined, the error carries the
    /// mint receipt.
    pub async fn execute_plan(&self, plan: &RebalancePlan) -> Result<PlanExecution> {
        info!(tier = %plan.tier, "executing plan");
        self.check_plan_funding(plan).await?;

        let mint = if plan.requires_mint() {
            Some(self.mint(plan.tokens_to_mint).await?)
        } else {
            None
        };
        let liquidity = match self
            .add_liquidity(plan.tokens_for_liquidity, plan.collateral_for_liquidity)
            .await
        {
            Ok(receipt) => receipt,
            Err(source) => {
                return Err(match mint {
                    Some(mint) => ContractError::PartialExecution {
                        mint: Box::new(mint),
                        source: Box::new(source),
                    },
                    None => source,
                });
            }
        };
        Ok(PlanExecution { mint, liquidity })
    }

    async fn check_plan_funding(&self, plan: &RebalancePlan) -> Result<()> {
        let (token_decimals, collateral_decimals) = self.reader.decimals().await?;
        let network = self.network();
        let minted = if plan.requires_mint() {
            positive_raw(plan.tokens_to_mint, token_decimals)?
        } else {
            U256::ZERO
        };
        let mint_cost = if minted.is_zero() {
            U256::ZERO
        } else {
            self.reader.collateral_needed(minted).await?
        };
        let funding = PlanFunding {
            token_balance: self.reader.raw_balance(network.peg_token, self.signer_address).await?,
            collateral_balance: self.reader.raw_balance(network.collateral_token, self.signer_address).await?,
            minted,
            mint_cost,
            deposit_token: positive_raw(plan.tokens_for_liquidity, token_decimals)?,
            deposit_collateral: positive_raw(plan.collateral_for_liquidity, collateral_decimals)?,
        };
        funding.check()
    }

    /// Second step of a reset: re-read balances and deposit up to
    /// `target_tokens` at the peg ratio.
    pub async fn readd_liquidity(&self, target_tokens: Decimal) -> Result<(LiquidityAddition, TransactionReceipt)> {
        let balances = self.reader.balances(self.signer_address).await?;
        let addition = plan_readd(balances.token, balances.collateral, target_tokens, self.params.pegged_price())?;
        let receipt = self
            .add_liquidity(addition.token_amount, addition.collateral_amount)
            .await?;
        Ok((addition, receipt))
    }

    /// Remove all liquidity, then re-add `target_tokens` at the peg ratio.
    pub async fn reset_pool(&self, target_tokens: Decimal) -> Result<PoolReset> {
        let removal = self.remove_all_liquidity().await?;
        let (addition, liquidity) = self.readd_liquidity(target_tokens).await?;
        Ok(PoolReset {
            removal,
            addition,
            liquidity,
        })
    }
}

/// Raw balances and requirements of a plan's mint and deposit.
#[derive(Debug, Clone, Copy)]
struct PlanFunding {
    token_balance: U256,
    collateral_balance: U256,
    minted: U256,
    mint_cost: U256,
    deposit_token: U256,
    deposit_collateral: U256,
}

impl PlanFunding {
    /// Collateral must cover the mint and the deposit; tokens held plus
    /// tokens minted must cover the deposit.
    fn check(&self) -> Result<()> {
        let need_collateral = self.mint_cost.saturating_add(self.deposit_collateral);
        if self.collateral_balance < need_collateral {
            return Err(ContractError::InsufficientBalance {
                have: self.collateral_balance,
                need: need_collateral,
            });
        }
        let tokens_after_mint = self.token_balance.saturating_add(self.minted);
        if tokens_after_mint < self.deposit_token {
            return Err(ContractError::InsufficientBalance {
                have: tokens_after_mint,
                need: self.deposit_token,
            });
        }
        Ok(())
    }
}

/// Convert a strictly positive amount to raw units.
fn positive_raw(amount: Decimal, decimals: u8) -> Result<U256> {
    let raw = to_raw(amount, decimals)?;
    if raw.is_zero() {
        return Err(ModelError::InvalidAmount {
            amount,
            reason: "amount must be positive",
        }
        .into());
    }
    Ok(raw)
}

/// `amount` reduced by `slippage_bps`, rounded down.
pub fn min_with_slippage(amount: U256, slippage_bps: u32) -> U256 {
    let keep = BPS_DENOMINATOR.saturating_sub(slippage_bps);
    amount.saturating_mul(U256::from(keep)) / U256::from(BPS_DENOMINATOR)
}

/// Router deadline for a transaction submitted at `now` (unix seconds).
pub fn deadline(now: u64) -> U256 {
    U256::from(now.saturating_add(DEADLINE_SECS))
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    // Anvil's default account 0 private key
    const TEST_PRIVATE_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn local_network() -> NetworkConfig {
        NetworkConfig::bsc_mainnet(Address::repeat_byte(0x47)).with_rpc_url("http://localhost:8545")
    }

    #[test]
    fn test_min_with_slippage() {
        assert_eq!(min_with_slippage(U256::from(10_000), 100), U256::from(9_900));
        assert_eq!(min_with_slippage(U256::from(999), 100), U256::from(989));
        assert_eq!(min_with_slippage(U256::from(500), 0), U256::from(500));
        assert_eq!(min_with_slippage(U256::from(500), 20_000), U256::ZERO);
    }

    #[test]
    fn test_deadline_is_twenty_minutes_out() {
        assert_eq!(deadline(1_000), U256::from(2_200));
        assert_eq!(deadline(u64::MAX), U256::from(u64::MAX));
    }

    #[test]
    fn test_positive_raw_rejects_zero_and_dust() {
        assert!(matches!(
            positive_raw(Decimal::ZERO, 18),
            Err(ContractError::Model(ModelError::InvalidAmount { .. }))
        ));
        assert!(positive_raw(dec!(0.0000001), 6).is_err());
        assert_eq!(positive_raw(dec!(1.5), 6).unwrap(), U256::from(1_500_000));
    }

    fn funding() -> PlanFunding {
        PlanFunding {
            token_balance: U256::from(6),
            collateral_balance: U256::from(100),
            minted: U256::from(4),
            mint_cost: U256::from(44),
            deposit_token: U256::from(10),
            deposit_collateral: U256::from(50),
        }
    }

    #[test]
    fn test_plan_funding_covers_mint_and_deposit() {
        assert!(funding().check().is_ok());
    }

    #[test]
    fn test_plan_funding_counts_mint_cost_against_collateral() {
        let short = PlanFunding {
            collateral_balance: U256::from(93),
            ..funding()
        };
        assert!(matches!(
            short.check(),
            Err(ContractError::InsufficientBalance { have, need }) if have == U256::from(93) && need == U256::from(94)
        ));
    }

    #[test]
    fn test_plan_funding_rejects_token_shortfall_before_minting() {
        let other_wallet = PlanFunding {
            token_balance: U256::ZERO,
            minted: U256::ZERO,
            mint_cost: U256::ZERO,
            ..funding()
        };
        assert!(matches!(
            other_wallet.check(),
            Err(ContractError::InsufficientBalance { have, need }) if have.is_zero() && need == U256::from(10)
        ));
    }

    #[test]
    fn test_executor_defaults() {
        let executor = PegExecutor::new(local_network(), TEST_PRIVATE_KEY, PegParameters::default()).unwrap();
        assert_eq!(executor.slippage_bps(), DEFAULT_SLIPPAGE_BPS);
        assert!(!executor.signer_address().is_zero());
        assert_eq!(executor.reader().network(), &local_network());
    }

    #[test]
    fn test_slippage_is_capped() {
        let executor = PegExecutor::new(local_network(), TEST_PRIVATE_KEY, PegParameters::default())
            .unwrap()
            .with_slippage_bps(50_000);
        assert_eq!(executor.slippage_bps(), BPS_DENOMINATOR);
    }

    #[test]
    fn test_mint_call_targets_peg_token() {
        let executor = PegExecutor::new(local_network(), TEST_PRIVATE_KEY, PegParameters::default()).unwrap();
        let call = executor.mint_call(U256::from(1));
        assert_eq!(call.to(), Address::repeat_byte(0x47));
        assert_eq!(call.label(), "mintTokens(uint256)");
    }

    #[test]
    fn test_invalid_private_key() {
        let result = PegExecutor::new(local_network(), "not-a-valid-key", PegParameters::default());
        assert!(matches!(result, Err(ContractError::InvalidPrivateKey)));
    }
}
