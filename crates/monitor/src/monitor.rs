//! The periodic health-sampling loop.

use std::time::Duration;

use pegkeeper_model::{assess, PegParameters, PoolSource, SupplySource};
use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::error::{MonitorError, Result};
use crate::report::{PoolStatus, StatusReport};

/// Default time between ticks.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

/// Default upper bound on a single read.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(20);

/// Loop timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    pub interval: Duration,
    pub read_timeout: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

/// The outcome of one tick, handed to the sink.
#[derive(Debug)]
pub struct Tick {
    pub number: u64,
    pub outcome: Result<StatusReport>,
}

/// Counters returned when the loop stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorSummary {
    pub ticks: u64,
    pub reports: u64,
    pub failures: u64,
}

/// Samples supply (and optionally pool) state on a fixed interval.
#[derive(Debug, Clone)]
pub struct Monitor {
    params: PegParameters,
    config: MonitorConfig,
}

impl Monitor {
    pub fn new(params: PegParameters, config: MonitorConfig) -> Self {
        Self { params, config }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Take one sample.
    ///
    /// A failed or timed-out supply read fails the tick. A failed pool read
    /// only drops the pool section from the report.
    pub async fn sample<S, P>(&self, supply: &S, pool: &P, tick: u64) -> Result<StatusReport>
    where
        S: SupplySource + Sync,
        P: PoolSource + Sync,
    {
        let read_timeout = self.config.read_timeout;

        let snapshot = timeout(read_timeout, supply.read_supply_snapshot())
            .await
            .map_err(|_| MonitorError::Timeout(read_timeout))?
            .map_err(MonitorError::supply_read)?;
        let health = assess(&snapshot, &self.params)?;

        let pool = match timeout(read_timeout, pool.read_pool_snapshot()).await {
            Ok(Ok(Some(pool_snapshot))) => Some(PoolStatus::from_snapshot(pool_snapshot, &self.params)),
            Ok(Ok(None)) => None,
            Ok(Err(e)) => {
                warn!(tick, error = %e, "pool read failed, reporting supply only");
                None
            }
            Err(_) => {
                warn!(tick, timeout = ?read_timeout, "pool read timed out, reporting supply only");
                None
            }
        };

        Ok(StatusReport {
            tick,
            snapshot,
            health,
            pool,
        })
    }

    /// Run until `stop` is set to `true` or its sender is dropped.
    ///
    /// Ticks never overlap. A stop request that arrives while a read is in
    /// flight lets the read finish and discards its result. Failed ticks are
    /// logged and passed to `sink`; they never end the loop.
    pub async fn run<S, P, F>(&self, supply: &S, pool: &P, mut stop: watch::Receiver<bool>, mut sink: F) -> MonitorSummary
    where
        S: SupplySource + Sync,
        P: PoolSource + Sync,
        F: FnMut(&Tick),
    {
        let mut summary = MonitorSummary::default();
        info!(
            interval = ?self.config.interval,
            read_timeout = ?self.config.read_timeout,
            "monitor started"
        );

        loop {
            if *stop.borrow() {
                break;
            }

            summary.ticks += 1;
            let number = summary.ticks;
            debug!(tick = number, "sampling");
            let outcome = self.sample(supply, pool, number).await;

            if *stop.borrow() {
                debug!(tick = number, "stop requested during read, discarding result");
                break;
            }

            match &outcome {
                Ok(report) => {
                    summary.reports += 1;
                    info!(
                        tick = number,
                        status = %report.health.status,
                        ratio_bps = %report.health.collateralization_ratio_bps,
                        "tick complete"
                    );
                }
                Err(e) => {
                    summary.failures += 1;
                    warn!(tick = number, error = %e, "tick failed");
                }
            }
            sink(&Tick { number, outcome });

            if wait_or_stop(self.config.interval, &mut stop).await {
                break;
            }
        }

        info!(
            ticks = summary.ticks,
            reports = summary.reports,
            failures = summary.failures,
            "monitor stopped"
        );
        summary
    }
}

/// Sleep for `interval`; returns `true` if a stop was requested first.
async fn wait_or_stop(interval: Duration, stop: &mut watch::Receiver<bool>) -> bool {
    let sleep = tokio::time::sleep(interval);
    tokio::pin!(sleep);
    loop {
        tokio::select! {
            () = &mut sleep => return false,
            changed = stop.changed() => {
                if changed.is_err() || *stop.borrow() {
                    return true;
                }
            }
        }
    }
}
