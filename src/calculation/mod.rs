//! Calculation logic for the Incident Engine.
//!
//! This module contains the pricing of incident rows against master data,
//! the split of a priced row across payroll accounts, and the aggregation
//! of a session's totals.

mod account;
mod pricing;
mod totals;

pub use account::AccountBreakdown;
pub use pricing::{compute_cost, price_all, price_incident, round_money};
pub use totals::session_totals;
