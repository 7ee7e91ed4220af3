//! Dashboard totals over all expenses.
//!
//! Totals are grouped by category, month and currency. When a display
//! currency is requested, the per-currency totals are converted with the
//! latest exchange rates and regrouped.

mod conversion;
mod endpoint;
mod report;

pub use endpoint::{SummaryState, get_summary_endpoint};
