//! Rebalance planning: how much to mint and how much liquidity to add for a
//! collateral budget.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::params::PegParameters;
use crate::units::{round_collateral, RoundingDirection};

/// A candidate target pool size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityTier {
    pub name: String,
    /// Tokens to place in the pool.
    pub target_tokens: Decimal,
}

impl LiquidityTier {
    pub fn new(name: impl Into<String>, target_tokens: Decimal) -> Self {
        Self {
            name: name.into(),
            target_tokens,
        }
    }

    /// Professional (6), Balanced (4) and Conservative (2) token tiers.
    ///
    /// Every tier is a fixed target that is topped up by minting. Conservative
    /// is not capped at the wallet's balance, so a wallet holding 1 token
    /// mints 1 more for it.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("Professional", Decimal::from(6)),
            Self::new("Balanced", Decimal::from(4)),
            Self::new("Conservative", Decimal::from(2)),
        ]
    }
}

/// Mint and liquidity amounts for one tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebalancePlan {
    /// Name of the tier this plan was built for.
    pub tier: String,
    pub tokens_to_mint: Decimal,
    pub collateral_for_mint: Decimal,
    pub tokens_for_liquidity: Decimal,
    pub collateral_for_liquidity: Decimal,
    pub total_collateral_spent: Decimal,
    /// Budget left over after the plan; negative only for unselected candidates.
    pub remaining_budget: Decimal,
}

impl RebalancePlan {
    pub fn requires_mint(&self) -> bool {
        self.tokens_to_mint > Decimal::ZERO
    }

    pub fn fits_budget(&self) -> bool {
        self.remaining_budget >= Decimal::ZERO
    }
}

fn ensure_non_negative(amount: Decimal, reason: &'static str) -> Result<()> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ModelError::invalid_amount(amount, reason));
    }
    Ok(())
}

/// Cost one tier regardless of budget.
pub fn cost_tier(
    tier: &LiquidityTier,
    current_token_balance: Decimal,
    available_budget: Decimal,
    params: &PegParameters,
) -> Result<RebalancePlan> {
    if tier.target_tokens <= Decimal::ZERO {
        return Err(ModelError::invalid_amount(tier.target_tokens, "tier target must be positive"));
    }

    let tokens_to_mint = (tier.target_tokens - current_token_balance).max(Decimal::ZERO);
    let collateral_for_mint = if tokens_to_mint.is_zero() {
        Decimal::ZERO
    } else {
        params.mint_cost(tokens_to_mint)?
    };
    let collateral_for_liquidity = tier
        .target_tokens
        .checked_mul(params.pegged_price())
        .map(|c| round_collateral(c, RoundingDirection::Up))
        .ok_or(ModelError::Overflow("cost_tier"))?;
    let total_collateral_spent = collateral_for_mint
        .checked_add(collateral_for_liquidity)
        .ok_or(ModelError::Overflow("cost_tier"))?;

    Ok(RebalancePlan {
        tier: tier.name.clone(),
        tokens_to_mint,
        collateral_for_mint,
        tokens_for_liquidity: tier.target_tokens,
        collateral_for_liquidity,
        total_collateral_spent,
        remaining_budget: available_budget - total_collateral_spent,
    })
}

/// Cost every tier, largest target first.
pub fn evaluate_tiers(
    current_token_balance: Decimal,
    tiers: &[LiquidityTier],
    available_budget: Decimal,
    params: &PegParameters,
) -> Result<Vec<RebalancePlan>> {
    ensure_non_negative(current_token_balance, "token balance must not be negative")?;
    ensure_non_negative(available_budget, "budget must not be negative")?;
    if tiers.is_empty() {
        return Err(ModelError::NoCandidates);
    }

    let mut ordered: Vec<&LiquidityTier> = tiers.iter().collect();
    ordered.sort_by(|a, b| b.target_tokens.cmp(&a.target_tokens));

    ordered
        .into_iter()
        .map(|tier| cost_tier(tier, current_token_balance, available_budget, params))
        .collect()
}

/// Select the largest tier whose total collateral fits `available_budget`.
///
/// Candidates are tried from the largest target down regardless of the order
/// they were supplied in. Returns [`ModelError::Infeasible`] when even the
/// smallest tier exceeds the budget.
pub fn plan(
    current_token_balance: Decimal,
    tiers: &[LiquidityTier],
    available_budget: Decimal,
    params: &PegParameters,
) -> Result<RebalancePlan> {
    let candidates = evaluate_tiers(current_token_balance, tiers, available_budget, params)?;
    let smallest_required = candidates
        .last()
        .map(|c| c.total_collateral_spent)
        .unwrap_or_default();

    candidates
        .into_iter()
        .find(|c| c.total_collateral_spent <= available_budget)
        .ok_or(ModelError::Infeasible {
            budget: available_budget,
            smallest_required,
        })
}

/// Token/collateral pair to deposit as fresh liquidity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityAddition {
    pub token_amount: Decimal,
    pub collateral_amount: Decimal,
}

/// Second step of a remove-then-re-add reset: the largest whole-token amount
/// up to `target_tokens` that the wallet can deposit at the peg ratio.
///
/// Balances must be re-read after the withdrawal; the withdrawn amounts carry
/// no guaranteed ratio.
pub fn plan_readd(
    token_balance: Decimal,
    collateral_balance: Decimal,
    target_tokens: Decimal,
    peg: Decimal,
) -> Result<LiquidityAddition> {
    ensure_non_negative(token_balance, "token balance must not be negative")?;
    ensure_non_negative(collateral_balance, "collateral balance must not be negative")?;
    if target_tokens <= Decimal::ZERO {
        return Err(ModelError::invalid_amount(target_tokens, "target must be positive"));
    }
    if peg <= Decimal::ZERO {
        return Err(ModelError::InvalidPegPrice(peg));
    }

    let fundable = collateral_balance
        .checked_div(peg)
        .ok_or(ModelError::Overflow("plan_readd"))?;
    let tokens = target_tokens
        .min(token_balance)
        .min(fundable)
        .round_dp_with_strategy(0, RoundingStrategy::ToZero);

    if tokens.is_zero() {
        return Err(ModelError::Infeasible {
            budget: collateral_balance,
            smallest_required: peg,
        });
    }

    Ok(LiquidityAddition {
        token_amount: tokens,
        collateral_amount: tokens * peg,
    })
}
