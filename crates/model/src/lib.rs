//! Peg stabilization and collateral accounting model.
//!
//! This crate holds the pure computations behind a collateral-backed,
//! price-pegged token:
//!
//! - [`accounting`]: collateral required to mint and returned on burn
//! - [`health`]: collateralization ratio, peg deviation and health status
//! - [`pool`]: constant-product pool price, price impact and liquidity sizing
//! - [`planner`]: largest-fit rebalance plan under a collateral budget
//!
//! Nothing here performs I/O. Chain reads enter through the [`source`] traits,
//! and plans leave as plain data for an execution layer to submit.
//!
//! # Example
//!
//! ```rust
//! use pegkeeper_model::{plan, LiquidityTier, PegParameters};
//! use rust_decimal::Decimal;
//!
//! let params = PegParameters::default(); // 11 collateral per token, 110% reserve
//! let plan = plan(Decimal::ZERO, &LiquidityTier::defaults(), Decimal::from(96), &params).unwrap();
//! assert_eq!(plan.tier, "Balanced");
//! assert!(plan.total_collateral_spent <= Decimal::from(96));
//! ```

pub mod accounting;
pub mod error;
pub mod health;
pub mod params;
pub mod planner;
pub mod pool;
pub mod source;
pub mod units;

pub use error::{ModelError, Result};

pub use accounting::{collateral_on_burn, collateral_to_mint, tokens_for_collateral};
pub use health::{assess, HealthReport, HealthStatus, Ratio, SupplySnapshot};
pub use params::{PegParameters, BPS_DENOMINATOR, DEFAULT_PEGGED_PRICE, DEFAULT_RESERVE_RATIO_BPS};
pub use planner::{cost_tier, evaluate_tiers, plan, plan_readd, LiquidityAddition, LiquidityTier, RebalancePlan};
pub use pool::{
    amounts_for_target_price, liquidity_scenarios, LiquidityDepth, LiquidityScenario, LiquidityWithdrawal,
    PoolSnapshot, DEFAULT_SCENARIO_SIZES,
};
pub use source::{NoPool, PoolSource, SupplySource};
pub use units::{from_raw, to_raw, RoundingDirection, COLLATERAL_DECIMALS, TOKEN_DECIMALS};
