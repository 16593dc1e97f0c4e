//! Peg parameters shared by every computation in the crate.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::accounting::{collateral_on_burn, collateral_to_mint, tokens_for_collateral};
use crate::error::{ModelError, Result};

/// Basis-point denominator (100% = 10000 bps).
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Default pegged price: 1 token = 11 collateral units.
pub const DEFAULT_PEGGED_PRICE: Decimal = Decimal::from_parts(11, 0, 0, false, 0);

/// Default reserve ratio applied at mint time (110%).
pub const DEFAULT_RESERVE_RATIO_BPS: u32 = 11_000;

/// The peg price and mint-time reserve ratio for one deployment.
///
/// Constructed once at process start and passed explicitly to every component.
/// Fields are private so the invariants checked in [`PegParameters::new`]
/// cannot be broken afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PegParameters {
    pegged_price: Decimal,
    reserve_ratio_bps: u32,
}

impl PegParameters {
    /// Create validated peg parameters.
    ///
    /// Fails with [`ModelError::InvalidPegPrice`] when `pegged_price <= 0` and
    /// [`ModelError::InvalidReserveRatio`] when `reserve_ratio_bps < 10000`.
    pub fn new(pegged_price: Decimal, reserve_ratio_bps: u32) -> Result<Self> {
        if pegged_price <= Decimal::ZERO {
            return Err(ModelError::InvalidPegPrice(pegged_price));
        }
        if reserve_ratio_bps < BPS_DENOMINATOR {
            return Err(ModelError::InvalidReserveRatio(reserve_ratio_bps));
        }
        Ok(Self {
            pegged_price,
            reserve_ratio_bps,
        })
    }

    /// Collateral units per token at peg.
    pub fn pegged_price(&self) -> Decimal {
        self.pegged_price
    }

    /// Over-collateralization applied at mint time, in bps.
    pub fn reserve_ratio_bps(&self) -> u32 {
        self.reserve_ratio_bps
    }

    /// Collateral charged per token minted (`peg * reserve ratio`).
    pub fn mint_price(&self) -> Decimal {
        self.pegged_price * Decimal::from(self.reserve_ratio_bps) / Decimal::from(BPS_DENOMINATOR)
    }

    /// Collateral required to mint `token_amount`.
    pub fn mint_cost(&self, token_amount: Decimal) -> Result<Decimal> {
        collateral_to_mint(token_amount, self.pegged_price, self.reserve_ratio_bps)
    }

    /// Collateral returned for burning `token_amount`.
    pub fn burn_return(&self, token_amount: Decimal) -> Result<Decimal> {
        collateral_on_burn(token_amount, self.pegged_price)
    }

    /// Tokens mintable with `collateral`.
    pub fn tokens_for_collateral(&self, collateral: Decimal) -> Result<Decimal> {
        tokens_for_collateral(collateral, self.pegged_price, self.reserve_ratio_bps)
    }
}

impl Default for PegParameters {
    fn default() -> Self {
        Self {
            pegged_price: DEFAULT_PEGGED_PRICE,
            reserve_ratio_bps: DEFAULT_RESERVE_RATIO_BPS,
        }
    }
}
