//! Constant-product (x * y = k) pool model for the token/collateral pair.
//!
//! All figures are expressed in decimal token and collateral units. The pool's
//! pair ordering is carried in [`PoolSnapshot::token_is_first`] so readers can
//! map `(reserve0, reserve1)` back onto the right side.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::params::BPS_DENOMINATOR;
use crate::units::{round_collateral, round_token, RoundingDirection};

/// Default candidate pool sizes (in tokens) for [`liquidity_scenarios`].
pub const DEFAULT_SCENARIO_SIZES: [u32; 5] = [10, 50, 100, 500, 1000];

/// Reserves of a token/collateral pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub token_reserve: Decimal,
    pub collateral_reserve: Decimal,
    /// Whether the token is `token0` of the pair.
    pub token_is_first: bool,
}

impl PoolSnapshot {
    /// Create a snapshot from token/collateral reserves.
    pub fn new(token_reserve: Decimal, collateral_reserve: Decimal, token_is_first: bool) -> Result<Self> {
        for reserve in [token_reserve, collateral_reserve] {
            if reserve.is_sign_negative() && !reserve.is_zero() {
                return Err(ModelError::invalid_amount(reserve, "reserve must not be negative"));
            }
        }
        Ok(Self {
            token_reserve,
            collateral_reserve,
            token_is_first,
        })
    }

    /// Create a snapshot from the pair's ordered reserves.
    pub fn from_pair(reserve0: Decimal, reserve1: Decimal, token_is_first: bool) -> Result<Self> {
        if token_is_first {
            Self::new(reserve0, reserve1, true)
        } else {
            Self::new(reserve1, reserve0, false)
        }
    }

    /// Reserves in the pair's own `(reserve0, reserve1)` order.
    pub fn pair_reserves(&self) -> (Decimal, Decimal) {
        if self.token_is_first {
            (self.token_reserve, self.collateral_reserve)
        } else {
            (self.collateral_reserve, self.token_reserve)
        }
    }

    /// Whether either side holds nothing.
    pub fn is_empty(&self) -> bool {
        self.token_reserve.is_zero() || self.collateral_reserve.is_zero()
    }

    fn ensure_liquid(&self) -> Result<()> {
        if self.is_empty() {
            return Err(ModelError::EmptyPool {
                token_reserve: self.token_reserve,
                collateral_reserve: self.collateral_reserve,
            });
        }
        Ok(())
    }

    /// The constant product `k = token_reserve * collateral_reserve`.
    pub fn invariant(&self) -> Result<Decimal> {
        self.token_reserve
            .checked_mul(self.collateral_reserve)
            .ok_or(ModelError::Overflow("invariant"))
    }

    /// Collateral per token implied by the reserves.
    pub fn current_price(&self) -> Result<Decimal> {
        self.ensure_liquid()?;
        self.collateral_reserve
            .checked_div(self.token_reserve)
            .ok_or(ModelError::Overflow("current_price"))
    }

    /// Tokens a swap of `collateral_in` would receive under the invariant
    /// (no swap fee).
    pub fn tokens_out(&self, collateral_in: Decimal) -> Result<Decimal> {
        self.ensure_liquid()?;
        if collateral_in.is_sign_negative() && !collateral_in.is_zero() {
            return Err(ModelError::invalid_amount(collateral_in, "trade must not be negative"));
        }
        let k = self.invariant()?;
        let new_collateral = self
            .collateral_reserve
            .checked_add(collateral_in)
            .ok_or(ModelError::Overflow("tokens_out"))?;
        let new_token_reserve = k
            .checked_div(new_collateral)
            .ok_or(ModelError::Overflow("tokens_out"))?;
        Ok(self.token_reserve - new_token_reserve)
    }

    /// Percentage deviation between the tokens a `trade_collateral_in` swap
    /// yields and the tokens it would yield at `reference_price`.
    ///
    /// Pass the peg as `reference_price` for "distance from peg" and
    /// [`PoolSnapshot::current_price`] for pure trade slippage. A zero trade
    /// takes the limit value: zero against the pool's own price, the pool's
    /// distance from `reference_price` otherwise.
    pub fn price_impact(&self, trade_collateral_in: Decimal, reference_price: Decimal) -> Result<Decimal> {
        self.ensure_liquid()?;
        if trade_collateral_in.is_sign_negative() && !trade_collateral_in.is_zero() {
            return Err(ModelError::invalid_amount(trade_collateral_in, "trade must not be negative"));
        }
        if reference_price <= Decimal::ZERO {
            return Err(ModelError::invalid_amount(reference_price, "reference price must be positive"));
        }
        // expected = t / r, out = T - T*C/(C + t)
        // |expected - out| / expected == |C + t - r*T| / (C + t)
        let new_collateral = self
            .collateral_reserve
            .checked_add(trade_collateral_in)
            .ok_or(ModelError::Overflow("price_impact"))?;
        let reference_value = reference_price
            .checked_mul(self.token_reserve)
            .ok_or(ModelError::Overflow("price_impact"))?;
        (new_collateral - reference_value)
            .abs()
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|n| n.checked_div(new_collateral))
            .ok_or(ModelError::Overflow("price_impact"))
    }

    /// Signed distance of the pool price from `peg`, in bps.
    pub fn price_deviation_bps(&self, peg: Decimal) -> Result<Decimal> {
        if peg <= Decimal::ZERO {
            return Err(ModelError::InvalidPegPrice(peg));
        }
        let price = self.current_price()?;
        (price - peg)
            .checked_mul(Decimal::from(BPS_DENOMINATOR))
            .and_then(|n| n.checked_div(peg))
            .ok_or(ModelError::Overflow("price_deviation_bps"))
    }

    /// Pro-rata amounts a removal of `lp_amount` liquidity tokens would return.
    ///
    /// An estimate against the reserves seen now. Trades landing before the
    /// removal change what is actually returned.
    pub fn withdrawal_estimate(&self, lp_amount: Decimal, lp_total_supply: Decimal) -> Result<LiquidityWithdrawal> {
        if lp_total_supply <= Decimal::ZERO {
            return Err(ModelError::EmptyPool {
                token_reserve: self.token_reserve,
                collateral_reserve: self.collateral_reserve,
            });
        }
        if lp_amount <= Decimal::ZERO || lp_amount > lp_total_supply {
            return Err(ModelError::invalid_amount(lp_amount, "must be within (0, lp total supply]"));
        }
        let token_amount = self
            .token_reserve
            .checked_mul(lp_amount)
            .and_then(|n| n.checked_div(lp_total_supply))
            .ok_or(ModelError::Overflow("withdrawal_estimate"))?;
        let collateral_amount = self
            .collateral_reserve
            .checked_mul(lp_amount)
            .and_then(|n| n.checked_div(lp_total_supply))
            .ok_or(ModelError::Overflow("withdrawal_estimate"))?;
        Ok(LiquidityWithdrawal {
            token_amount: round_token(token_amount, RoundingDirection::Down),
            collateral_amount: round_collateral(collateral_amount, RoundingDirection::Down),
        })
    }
}

/// Reserves for fresh liquidity priced at `target_price`.
///
/// Pair ordering is irrelevant for a proposal; the result reports token-first.
pub fn amounts_for_target_price(target_token_amount: Decimal, target_price: Decimal) -> Result<PoolSnapshot> {
    if target_token_amount <= Decimal::ZERO {
        return Err(ModelError::invalid_amount(target_token_amount, "must be positive"));
    }
    if target_price <= Decimal::ZERO {
        return Err(ModelError::InvalidPegPrice(target_price));
    }
    let collateral = target_token_amount
        .checked_mul(target_price)
        .ok_or(ModelError::Overflow("amounts_for_target_price"))?;
    PoolSnapshot::new(
        target_token_amount,
        round_collateral(collateral, RoundingDirection::Up),
        true,
    )
}

/// Amounts returned by a liquidity removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityWithdrawal {
    pub token_amount: Decimal,
    pub collateral_amount: Decimal,
}

/// How well a pool absorbs a one-unit trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiquidityDepth {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl LiquidityDepth {
    /// Bucket a price impact percentage: <1% Excellent, <3% Good, <5% Fair.
    pub fn from_impact(impact_pct: Decimal) -> Self {
        if impact_pct < Decimal::ONE {
            Self::Excellent
        } else if impact_pct < Decimal::from(3) {
            Self::Good
        } else if impact_pct < Decimal::from(5) {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

impl fmt::Display for LiquidityDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        };
        f.write_str(s)
    }
}

/// One row of the liquidity sizing table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityScenario {
    pub token_amount: Decimal,
    pub collateral_amount: Decimal,
    /// Impact of a 1-unit collateral trade, in percent.
    pub impact_small_trade: Decimal,
    /// Impact of a 10-unit collateral trade, in percent.
    pub impact_large_trade: Decimal,
    pub depth: LiquidityDepth,
}

/// Evaluate pools seeded at peg with each of `sizes` tokens.
pub fn liquidity_scenarios(peg: Decimal, sizes: &[Decimal]) -> Result<Vec<LiquidityScenario>> {
    sizes
        .iter()
        .map(|&size| {
            let pool = amounts_for_target_price(size, peg)?;
            let impact_small_trade = pool.price_impact(Decimal::ONE, peg)?;
            let impact_large_trade = pool.price_impact(Decimal::TEN, peg)?;
            Ok(LiquidityScenario {
                token_amount: pool.token_reserve,
                collateral_amount: pool.collateral_reserve,
                impact_small_trade,
                impact_large_trade,
                depth: LiquidityDepth::from_impact(impact_small_trade),
            })
        })
        .collect()
}
