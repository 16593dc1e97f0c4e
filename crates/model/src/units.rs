//! Fixed-point scaling between on-chain integer units and decimals.
//!
//! Token amounts carry 18 fractional digits and collateral amounts 6, mirroring
//! the independently scaled ERC-20 decimals of the two assets.

use alloy_primitives::U256;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{ModelError, Result};

/// Fractional digits kept for token amounts.
pub const TOKEN_DECIMALS: u32 = 18;

/// Fractional digits kept for collateral amounts.
pub const COLLATERAL_DECIMALS: u32 = 6;

/// Largest scale a [`Decimal`] can carry.
const MAX_DECIMAL_SCALE: u8 = 28;

/// Rounding direction for amounts that must be truncated to a fixed scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingDirection {
    /// Round toward positive infinity (charges the user).
    Up,
    /// Round toward zero (pays the user).
    Down,
}

impl RoundingDirection {
    fn strategy(self) -> RoundingStrategy {
        match self {
            Self::Up => RoundingStrategy::AwayFromZero,
            Self::Down => RoundingStrategy::ToZero,
        }
    }
}

/// Round a token amount to [`TOKEN_DECIMALS`].
pub fn round_token(amount: Decimal, direction: RoundingDirection) -> Decimal {
    amount.round_dp_with_strategy(TOKEN_DECIMALS, direction.strategy())
}

/// Round a collateral amount to [`COLLATERAL_DECIMALS`].
pub fn round_collateral(amount: Decimal, direction: RoundingDirection) -> Decimal {
    amount.round_dp_with_strategy(COLLATERAL_DECIMALS, direction.strategy())
}

fn pow10(exp: u8) -> U256 {
    U256::from(10u64).pow(U256::from(exp))
}

/// Convert a raw on-chain integer amount with `decimals` into a [`Decimal`].
///
/// Very large integer parts may lose their lowest fractional digits, since a
/// `Decimal` holds 28 significant digits.
pub fn from_raw(raw: U256, decimals: u8) -> Result<Decimal> {
    if decimals > MAX_DECIMAL_SCALE {
        return Err(ModelError::Overflow("from_raw: decimals exceed 28"));
    }
    let unit = pow10(decimals);
    let whole = u128::try_from(raw / unit).map_err(|_| ModelError::Overflow("from_raw"))?;
    let frac = u128::try_from(raw % unit).map_err(|_| ModelError::Overflow("from_raw"))?;

    let whole = i128::try_from(whole)
        .ok()
        .and_then(|w| Decimal::try_from_i128_with_scale(w, 0).ok())
        .ok_or(ModelError::Overflow("from_raw"))?;
    let frac = i128::try_from(frac)
        .ok()
        .and_then(|f| Decimal::try_from_i128_with_scale(f, u32::from(decimals)).ok())
        .ok_or(ModelError::Overflow("from_raw"))?;

    whole
        .checked_add(frac)
        .map(|d| d.normalize())
        .ok_or(ModelError::Overflow("from_raw"))
}

/// Convert a [`Decimal`] into raw on-chain units with `decimals`, truncating
/// digits beyond the token's precision.
pub fn to_raw(amount: Decimal, decimals: u8) -> Result<U256> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ModelError::invalid_amount(amount, "must not be negative"));
    }
    let truncated = amount.round_dp_with_strategy(u32::from(decimals), RoundingStrategy::ToZero);
    let mantissa =
        u128::try_from(truncated.mantissa()).map_err(|_| ModelError::Overflow("to_raw"))?;
    // The scale never exceeds `decimals` after truncation.
    let shift = u32::from(decimals).saturating_sub(truncated.scale());
    let shift = u8::try_from(shift).map_err(|_| ModelError::Overflow("to_raw"))?;

    U256::from(mantissa)
        .checked_mul(pow10(shift))
        .ok_or(ModelError::Overflow("to_raw"))
}
