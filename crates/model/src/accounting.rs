//! Collateral accounting for minting and burning the pegged token.
//!
//! Minting charges `amount * peg * reserve_ratio`, burning returns the bare
//! `amount * peg`. The gap between the two is the system's structural buffer.
//! Mint collateral rounds up and burn collateral rounds down, so rounding never
//! works against the reserve.

use rust_decimal::Decimal;

use crate::error::{ModelError, Result};
use crate::params::BPS_DENOMINATOR;
use crate::units::{round_collateral, round_token, RoundingDirection};

fn ensure_positive(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(ModelError::invalid_amount(amount, "must be positive"));
    }
    Ok(())
}

fn ensure_peg(peg: Decimal) -> Result<()> {
    if peg <= Decimal::ZERO {
        return Err(ModelError::InvalidPegPrice(peg));
    }
    Ok(())
}

/// Collateral required to mint `token_amount` tokens.
///
/// `collateral = token_amount * peg * reserve_ratio_bps / 10000`, rounded up to
/// collateral precision.
///
/// # Example
///
/// ```rust
/// use pegkeeper_model::collateral_to_mint;
/// use rust_decimal::Decimal;
///
/// let cost = collateral_to_mint(Decimal::ONE, Decimal::from(11), 11_000).unwrap();
/// assert_eq!(cost, Decimal::new(121, 1)); // 12.1
/// ```
pub fn collateral_to_mint(token_amount: Decimal, peg: Decimal, reserve_ratio_bps: u32) -> Result<Decimal> {
    ensure_positive(token_amount)?;
    ensure_peg(peg)?;

    let numerator = token_amount
        .checked_mul(peg)
        .and_then(|v| v.checked_mul(Decimal::from(reserve_ratio_bps)))
        .ok_or(ModelError::Overflow("collateral_to_mint"))?;
    let collateral = numerator
        .checked_div(Decimal::from(BPS_DENOMINATOR))
        .ok_or(ModelError::Overflow("collateral_to_mint"))?;

    Ok(round_collateral(collateral, RoundingDirection::Up))
}

/// Collateral returned for burning `token_amount` tokens, at the bare peg.
pub fn collateral_on_burn(token_amount: Decimal, peg: Decimal) -> Result<Decimal> {
    ensure_positive(token_amount)?;
    ensure_peg(peg)?;

    let collateral = token_amount
        .checked_mul(peg)
        .ok_or(ModelError::Overflow("collateral_on_burn"))?;

    Ok(round_collateral(collateral, RoundingDirection::Down))
}

/// Tokens that `collateral` can mint under the reserve ratio, rounded down.
///
/// This is the inverse of [`collateral_to_mint`]. Feeding it the output of
/// [`collateral_on_burn`] yields fewer tokens than were burned whenever the
/// reserve ratio is above 100%.
pub fn tokens_for_collateral(collateral: Decimal, peg: Decimal, reserve_ratio_bps: u32) -> Result<Decimal> {
    ensure_positive(collateral)?;
    ensure_peg(peg)?;
    if reserve_ratio_bps == 0 {
        return Err(ModelError::InvalidReserveRatio(reserve_ratio_bps));
    }

    let numerator = collateral
        .checked_mul(Decimal::from(BPS_DENOMINATOR))
        .ok_or(ModelError::Overflow("tokens_for_collateral"))?;
    let denominator = peg
        .checked_mul(Decimal::from(reserve_ratio_bps))
        .ok_or(ModelError::Overflow("tokens_for_collateral"))?;
    let tokens = numerator
        .checked_div(denominator)
        .ok_or(ModelError::Overflow("tokens_for_collateral"))?;

    Ok(round_token(tokens, RoundingDirection::Down))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_mint_one_token_at_eleven() {
        assert_eq!(collateral_to_mint(dec!(1), dec!(11), 11_000).unwrap(), dec!(12.1));
    }

    #[test]
    fn test_burn_one_token_at_eleven() {
        assert_eq!(collateral_on_burn(dec!(1), dec!(11)).unwrap(), dec!(11));
    }

    #[test]
    fn test_mint_costs_more_than_burn_returns() {
        let amounts = [dec!(0.000001), dec!(0.5), dec!(1), dec!(2), dec!(123.456), dec!(1000000)];
        for rr in [10_001u32, 10_500, 11_000, 15_000] {
            for amount in amounts {
                let mint = collateral_to_mint(amount, dec!(11), rr).unwrap();
                let burn = collateral_on_burn(amount, dec!(11)).unwrap();
                assert!(mint > burn, "rr={rr} amount={amount}: {mint} <= {burn}");
            }
        }
    }

    #[test]
    fn test_mint_equals_burn_at_full_collateral() {
        assert_eq!(
            collateral_to_mint(dec!(3), dec!(11), 10_000).unwrap(),
            collateral_on_burn(dec!(3), dec!(11)).unwrap()
        );
    }

    #[test]
    fn test_mint_is_linear() {
        for x in [dec!(0.25), dec!(1), dec!(7.5), dec!(4000)] {
            let single = collateral_to_mint(x, dec!(11), 11_000).unwrap();
            let double = collateral_to_mint(x * dec!(2), dec!(11), 11_000).unwrap();
            assert!((double - single * dec!(2)).abs() <= dec!(0.000001));
        }
    }

    #[test]
    fn test_mint_rounds_up_burn_rounds_down() {
        // 1e-18 tokens is worth far less than one collateral unit of precision.
        let dust = dec!(0.000000000000000001);
        assert_eq!(collateral_to_mint(dust, dec!(11), 11_000).unwrap(), dec!(0.000001));
        assert_eq!(collateral_on_burn(dust, dec!(11)).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_rejects_non_positive_amounts() {
        for bad in [Decimal::ZERO, dec!(-1)] {
            assert!(matches!(
                collateral_to_mint(bad, dec!(11), 11_000),
                Err(ModelError::InvalidAmount { .. })
            ));
            assert!(matches!(
                collateral_on_burn(bad, dec!(11)),
                Err(ModelError::InvalidAmount { .. })
            ));
        }
    }

    #[test]
    fn test_rejects_non_positive_peg() {
        assert_eq!(
            collateral_to_mint(dec!(1), Decimal::ZERO, 11_000),
            Err(ModelError::InvalidPegPrice(Decimal::ZERO))
        );
    }

    #[test]
    fn test_burn_then_remint_is_asymmetric() {
        let burned = dec!(5);
        let collateral = collateral_on_burn(burned, dec!(11)).unwrap();
        let reminted = tokens_for_collateral(collateral, dec!(11), 11_000).unwrap();
        assert!(reminted < burned);
        assert_ne!(reminted, burned);
    }

    #[test]
    fn test_tokens_for_collateral_inverts_mint() {
        let cost = collateral_to_mint(dec!(4), dec!(11), 11_000).unwrap();
        assert_eq!(tokens_for_collateral(cost, dec!(11), 11_000).unwrap(), dec!(4));
    }
}
