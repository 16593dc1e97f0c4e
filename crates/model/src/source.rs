//! Read capabilities the model consumes from the outside world.
//!
//! Everything in this crate is pure; live chain reads are injected through
//! these traits so callers and tests can supply their own sources.

use std::convert::Infallible;
use std::future::Future;

use crate::health::SupplySnapshot;
use crate::pool::PoolSnapshot;

/// Supplies total token supply and total collateral held by the peg contract.
pub trait SupplySource {
    type Error: std::error::Error + Send + Sync + 'static;

    fn read_supply_snapshot(&self) -> impl Future<Output = Result<SupplySnapshot, Self::Error>> + Send;
}

/// Supplies the token/collateral pool reserves.
///
/// `Ok(None)` means the pair does not exist yet.
pub trait PoolSource {
    type Error: std::error::Error + Send + Sync + 'static;

    fn read_pool_snapshot(&self) -> impl Future<Output = Result<Option<PoolSnapshot>, Self::Error>> + Send;
}

/// A [`PoolSource`] for deployments without a pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPool;

impl PoolSource for NoPool {
    type Error = Infallible;

    async fn read_pool_snapshot(&self) -> Result<Option<PoolSnapshot>, Self::Error> {
        Ok(None)
    }
}
