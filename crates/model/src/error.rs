//! Error types for the peg model.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while computing collateral, health or pool figures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A token or collateral amount was non-positive (or negative where zero is allowed).
    #[error("Invalid amount: {amount} ({reason})")]
    InvalidAmount { amount: Decimal, reason: &'static str },

    /// The peg price must be strictly positive.
    #[error("Invalid peg price: {0} (must be > 0)")]
    InvalidPegPrice(Decimal),

    /// The reserve ratio must be at least 100% (10000 bps).
    #[error("Invalid reserve ratio: {0} bps (must be >= 10000)")]
    InvalidReserveRatio(u32),

    /// A pool reserve is zero, so the pool price is undefined.
    #[error("Pool is empty: token reserve {token_reserve}, collateral reserve {collateral_reserve}")]
    EmptyPool {
        token_reserve: Decimal,
        collateral_reserve: Decimal,
    },

    /// No candidate plan fits inside the collateral budget.
    #[error("No rebalance plan fits budget {budget}: smallest candidate needs {smallest_required}")]
    Infeasible {
        budget: Decimal,
        smallest_required: Decimal,
    },

    /// No liquidity tiers were supplied to the planner.
    #[error("No liquidity tiers supplied")]
    NoCandidates,

    /// Decimal arithmetic overflowed.
    #[error("Arithmetic overflow in {0}")]
    Overflow(&'static str),
}

impl ModelError {
    /// Shorthand for [`ModelError::InvalidAmount`].
    pub(crate) fn invalid_amount(amount: Decimal, reason: &'static str) -> Self {
        Self::InvalidAmount { amount, reason }
    }

    /// Whether the error reflects a legitimate terminal state the caller must
    /// branch on (empty pool, infeasible plan) rather than a caller bug.
    pub fn is_terminal_state(&self) -> bool {
        matches!(self, Self::EmptyPool { .. } | Self::Infeasible { .. })
    }
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
