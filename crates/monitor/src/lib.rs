//! Periodic health monitoring for the pegged token.
//!
//! [`Monitor`] polls a [`SupplySource`](pegkeeper_model::SupplySource) and an
//! optional [`PoolSource`](pegkeeper_model::PoolSource) on a fixed interval,
//! assesses each sample, and hands a [`Tick`] to a caller-supplied sink. The
//! loop ends when its `watch` stop channel flips to `true`.

pub mod error;
pub mod export;
pub mod monitor;
pub mod report;

pub use error::{MonitorError, Result};
pub use export::JsonLinesExporter;
pub use monitor::{Monitor, MonitorConfig, MonitorSummary, Tick, DEFAULT_INTERVAL, DEFAULT_READ_TIMEOUT};
pub use report::{PoolStatus, StatusReport};
