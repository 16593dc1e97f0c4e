//! Peg health assessment from supply/collateral snapshots.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::params::{PegParameters, BPS_DENOMINATOR};

/// Total supply and collateral read from the peg contract at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplySnapshot {
    /// Outstanding token supply.
    pub total_token_supply: Decimal,
    /// Collateral held by the peg contract.
    pub total_collateral: Decimal,
    /// Unix timestamp (seconds) when the snapshot was read.
    pub sampled_at: u64,
}

impl SupplySnapshot {
    /// Create a snapshot, rejecting negative figures.
    pub fn new(total_token_supply: Decimal, total_collateral: Decimal, sampled_at: u64) -> Result<Self> {
        if total_token_supply.is_sign_negative() && !total_token_supply.is_zero() {
            return Err(ModelError::invalid_amount(total_token_supply, "supply must not be negative"));
        }
        if total_collateral.is_sign_negative() && !total_collateral.is_zero() {
            return Err(ModelError::invalid_amount(total_collateral, "collateral must not be negative"));
        }
        Ok(Self {
            total_token_supply,
            total_collateral,
            sampled_at,
        })
    }
}

/// A ratio that is undefined when the outstanding supply is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Ratio {
    /// The ratio in basis points.
    Defined(Decimal),
    /// No supply outstanding; nothing to divide by.
    Undefined,
}

impl Ratio {
    /// The value in bps, if defined.
    pub fn value(&self) -> Option<Decimal> {
        match self {
            Self::Defined(v) => Some(*v),
            Self::Undefined => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defined(v) => write!(f, "{} bps", v.round_dp(2)),
            Self::Undefined => write!(f, "undefined"),
        }
    }
}

/// Discrete health classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Collateralization at or above the reserve ratio.
    Healthy,
    /// Fully backed but below the reserve ratio.
    Warning,
    /// Below 100% backing.
    Critical,
}

impl HealthStatus {
    /// Classify a collateralization ratio against the reserve ratio.
    ///
    /// Exactly meeting the reserve ratio is `Healthy`.
    pub fn classify(collateralization_ratio_bps: Decimal, reserve_ratio_bps: u32) -> Self {
        if collateralization_ratio_bps >= Decimal::from(reserve_ratio_bps) {
            Self::Healthy
        } else if collateralization_ratio_bps >= Decimal::from(BPS_DENOMINATOR) {
            Self::Warning
        } else {
            Self::Critical
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Healthy => "Healthy",
            Self::Warning => "Warning",
            Self::Critical => "Critical",
        };
        f.write_str(s)
    }
}

/// Result of [`assess`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    /// `collateral * 10000 / (supply * peg)`.
    pub collateralization_ratio_bps: Ratio,
    /// `(collateral / supply - peg) * 10000 / peg`.
    pub peg_deviation_bps: Ratio,
    pub status: HealthStatus,
    /// Supply valued at peg.
    pub theoretical_value: Decimal,
    /// Collateral minus the supply's value at peg; negative means a deficit.
    pub collateral_surplus: Decimal,
    /// Timestamp of the snapshot this report was derived from.
    pub sampled_at: u64,
}

impl HealthReport {
    /// Actual collateral per token, if any supply is outstanding.
    pub fn backing_per_token(&self, snapshot: &SupplySnapshot) -> Option<Decimal> {
        if snapshot.total_token_supply.is_zero() {
            return None;
        }
        snapshot.total_collateral.checked_div(snapshot.total_token_supply)
    }
}

/// Assess system health from a supply snapshot.
///
/// With zero supply both ratios are [`Ratio::Undefined`] and the status is
/// `Healthy` by convention: nothing is outstanding, so nothing is under-backed.
pub fn assess(snapshot: &SupplySnapshot, params: &PegParameters) -> Result<HealthReport> {
    let peg = params.pegged_price();
    let bps = Decimal::from(BPS_DENOMINATOR);

    let theoretical_value = snapshot
        .total_token_supply
        .checked_mul(peg)
        .ok_or(ModelError::Overflow("assess"))?;
    let collateral_surplus = snapshot
        .total_collateral
        .checked_sub(theoretical_value)
        .ok_or(ModelError::Overflow("assess"))?;

    if theoretical_value.is_zero() {
        return Ok(HealthReport {
            collateralization_ratio_bps: Ratio::Undefined,
            peg_deviation_bps: Ratio::Undefined,
            status: HealthStatus::Healthy,
            theoretical_value,
            collateral_surplus,
            sampled_at: snapshot.sampled_at,
        });
    }

    let ratio = snapshot
        .total_collateral
        .checked_mul(bps)
        .and_then(|n| n.checked_div(theoretical_value))
        .ok_or(ModelError::Overflow("assess"))?;
    // (collateral/supply - peg) / peg == (collateral - supply*peg) / (supply*peg)
    let deviation = collateral_surplus
        .checked_mul(bps)
        .and_then(|n| n.checked_div(theoretical_value))
        .ok_or(ModelError::Overflow("assess"))?;

    Ok(HealthReport {
        collateralization_ratio_bps: Ratio::Defined(ratio),
        peg_deviation_bps: Ratio::Defined(deviation),
        status: HealthStatus::classify(ratio, params.reserve_ratio_bps()),
        theoretical_value,
        collateral_surplus,
        sampled_at: snapshot.sampled_at,
    })
}
