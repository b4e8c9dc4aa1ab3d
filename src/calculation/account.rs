//! Payroll account breakdown.
//!
//! Payroll books a row's base cost against the account of its reason and
//! its night cost against account 74.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AccountCode, PricedIncident};

/// Cost per payroll account for one row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBreakdown {
    /// Account 73.
    pub substitution: Decimal,
    /// Account 72.
    pub incentives: Decimal,
    /// Accounts 70/71.
    pub holidays: Decimal,
    /// Account 74.
    pub night_plus: Decimal,
}

impl AccountBreakdown {
    /// Splits a priced row across the payroll accounts.
    ///
    /// ```
    /// use incident_engine::calculation::AccountBreakdown;
    /// use incident_engine::models::{AccountCode, EmployeeRates, Incident, IncidentCost, PricedIncident};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let priced = PricedIncident {
    ///     incident: Incident::new("ANA", NaiveDate::from_ymd_opt(2025, 3, 4).unwrap()),
    ///     rates: EmployeeRates::new(Decimal::from(10), Decimal::from(2)),
    ///     hourly_price: Decimal::from(10),
    ///     night_price: Some(Decimal::from(2)),
    ///     account: AccountCode::Substitution,
    ///     cost: IncidentCost {
    ///         base: Decimal::from(80),
    ///         night: Decimal::from(4),
    ///         ..IncidentCost::ZERO
    ///     },
    /// };
    ///
    /// let breakdown = AccountBreakdown::for_priced(&priced);
    /// assert_eq!(breakdown.substitution, Decimal::from(80));
    /// assert_eq!(breakdown.night_plus, Decimal::from(4));
    /// ```
    pub fn for_priced(priced: &PricedIncident) -> Self {
        let mut breakdown = Self {
            night_plus: priced.cost.night,
            ..Self::default()
        };
        let base = priced.cost.base;
        match priced.account {
            AccountCode::Substitution => breakdown.substitution = base,
            AccountCode::Incentives => breakdown.incentives = base,
            AccountCode::Holidays => breakdown.holidays = base,
            AccountCode::NightPlus => {
                breakdown.night_plus = breakdown.night_plus.saturating_add(base)
            }
            AccountCode::Other => {}
        }
        breakdown
    }
}
