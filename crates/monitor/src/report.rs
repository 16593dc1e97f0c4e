//! Status reports emitted on each monitoring tick.

use pegkeeper_model::{HealthReport, LiquidityDepth, PegParameters, PoolSnapshot, SupplySnapshot};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Pool figures derived from a pool snapshot.
///
/// Price-dependent fields are `None` when the pool has no liquidity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStatus {
    pub snapshot: PoolSnapshot,
    pub price: Option<Decimal>,
    /// Signed distance of the pool price from the peg, in bps.
    pub deviation_bps: Option<Decimal>,
    /// Impact of a one-collateral-unit trade against the peg, in percent.
    pub impact_one_unit: Option<Decimal>,
    pub depth: Option<LiquidityDepth>,
}

impl PoolStatus {
    pub fn from_snapshot(snapshot: PoolSnapshot, params: &PegParameters) -> Self {
        let peg = params.pegged_price();
        let price = snapshot.current_price().ok();
        let deviation_bps = snapshot.price_deviation_bps(peg).ok();
        let impact_one_unit = snapshot.price_impact(Decimal::ONE, peg).ok();
        Self {
            snapshot,
            price,
            deviation_bps,
            impact_one_unit,
            depth: impact_one_unit.map(LiquidityDepth::from_impact),
        }
    }

    /// Whether the pool has no liquidity on at least one side.
    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }
}

/// One tick's view of the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub tick: u64,
    pub snapshot: SupplySnapshot,
    pub health: HealthReport,
    pub pool: Option<PoolStatus>,
}
