//! Command implementations.

pub mod analysis;
pub mod monitor;
pub mod plan;
pub mod quote;
pub mod status;
pub mod transact;

pub use analysis::{run_impact, run_scenarios};
pub use monitor::run_monitor;
pub use plan::run_plan;
pub use quote::{run_quote_burn, run_quote_mint};
pub use status::run_status;
pub use transact::{run_burn, run_mint, run_reset_pool};
