//! Output formatting for CLI results.

pub mod detail;
pub mod table;

pub use detail::{
    format_impact_detail, format_plan_detail, format_quote_detail, format_readd_detail, format_receipt,
    format_status_detail, format_tick_line, ImpactSummary, QuoteSummary, StatusView,
};
pub use table::{format_scenarios_table, format_tiers_table};
