//! Error types for the monitor.

use std::time::Duration;

use pegkeeper_model::ModelError;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur during a monitoring tick or while exporting reports.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The supply read failed (RPC or network error).
    #[error("Supply read failed: {0}")]
    SupplyRead(#[source] BoxError),

    /// The supply read did not complete in time.
    #[error("Supply read timed out after {0:?}")]
    Timeout(Duration),

    /// The snapshot could not be assessed.
    #[error("Assessment failed: {0}")]
    Model(#[from] ModelError),

    /// Writing an exported report failed.
    #[error("Export failed: {0}")]
    Export(#[from] std::io::Error),

    /// Serializing a report failed.
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl MonitorError {
    pub(crate) fn supply_read<E: std::error::Error + Send + Sync + 'static>(error: E) -> Self {
        Self::SupplyRead(Box::new(error))
    }
}

/// Result type alias for monitor operations.
pub type Result<T> = std::result::Result<T, MonitorError>;
