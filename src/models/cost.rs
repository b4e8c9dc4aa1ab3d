//! Pricing result models.
//!
//! This module contains the [`IncidentCost`] produced for one row, the
//! [`PricedIncident`] pairing a row with its cost and account, and the
//! [`SessionTotals`] summarizing a whole session.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AccountCode, EmployeeRates, Incident};

/// The derived cost figures of one incident.
///
/// # Example
///
/// ```
/// use incident_engine::models::IncidentCost;
/// use rust_decimal::Decimal;
///
/// let cost = IncidentCost {
///     base: Decimal::from(80),
///     night: Decimal::ZERO,
///     transfers: Decimal::from(2),
///     simple_cost: Decimal::from(82),
///     surcharge_cost: Decimal::new(1066, 1),
/// };
/// assert!(cost.surcharge_cost >= cost.simple_cost);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentCost {
    /// Worked hours times the applicable hourly price.
    pub base: Decimal,
    /// Night hours times the night premium (zero without the night flag).
    pub night: Decimal,
    /// Transfers times the transfer unit cost.
    pub transfers: Decimal,
    /// `base + night + transfers`.
    pub simple_cost: Decimal,
    /// `simple_cost * (1 + social_security_rate)`.
    pub surcharge_cost: Decimal,
}

impl IncidentCost {
    /// A cost of zero in every component.
    pub const ZERO: IncidentCost = IncidentCost {
        base: Decimal::ZERO,
        night: Decimal::ZERO,
        transfers: Decimal::ZERO,
        simple_cost: Decimal::ZERO,
        surcharge_cost: Decimal::ZERO,
    };
}

/// A row together with everything pricing resolved for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedIncident {
    /// The row as recorded.
    pub incident: Incident,
    /// The rates the row was priced with.
    pub rates: EmployeeRates,
    /// The hourly price actually applied (override or master rate).
    pub hourly_price: Decimal,
    /// The night premium actually applied, when the row is a night shift.
    pub night_price: Option<Decimal>,
    /// The payroll account of the row's reason.
    pub account: AccountCode,
    /// The derived cost.
    pub cost: IncidentCost,
}

/// Aggregated figures for a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTotals {
    /// Rows that were priced.
    pub priced_rows: usize,
    /// Rows that could not be priced and are excluded from the totals.
    pub unpriced_rows: usize,
    /// Sum of base costs.
    pub total_base: Decimal,
    /// Sum of night costs.
    pub total_night: Decimal,
    /// Sum of transfer costs.
    pub total_transfers: Decimal,
    /// Sum of simple costs.
    pub total_simple: Decimal,
    /// Sum of surcharge costs.
    pub total_surcharge: Decimal,
}
