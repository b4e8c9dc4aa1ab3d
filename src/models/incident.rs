//! Incident model.
//!
//! An [`Incident`] is one logged work event: who, when, how many hours,
//! whether part of it was a night shift, how many transfers, and the
//! descriptive fields payroll needs. Costs are never stored on the row;
//! they are derived at pricing time.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::EmployeeRecord;

/// Years a row date may fall in; the range spreadsheet dates can hold.
const YEARS: std::ops::RangeInclusive<i32> = 1900..=9999;

/// One incident row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    /// Employee key.
    pub employee: String,
    /// Date of the incident.
    pub date: NaiveDate,
    /// Worked hours.
    #[serde(default)]
    pub hours: Decimal,
    /// Per-hour price entered by the supervisor; replaces the master hourly
    /// rate when present.
    #[serde(default)]
    pub price_override: Option<Decimal>,
    /// Whether the row includes night-shift hours.
    #[serde(default)]
    pub night_shift: bool,
    /// Night-shift hours, priced at the night premium.
    #[serde(default)]
    pub night_hours: Decimal,
    /// Transfers, priced at the transfer unit cost.
    #[serde(default)]
    pub transfers: Decimal,
    /// Whether the incident is billable to the client.
    #[serde(default)]
    pub billable: bool,
    /// Reason; maps to a payroll account.
    #[serde(default)]
    pub reason: String,
    /// Centre the employee comes from.
    #[serde(default)]
    pub origin_centre: String,
    /// Centre the employee covers.
    #[serde(default)]
    pub destination_centre: String,
    /// Company owning the destination centre.
    #[serde(default)]
    pub destination_company: String,
    /// Payroll month the incident is booked to (e.g. "01-Enero").
    #[serde(default)]
    pub payroll_month: String,
    /// Free-text notes.
    #[serde(default)]
    pub notes: String,
}

impl Incident {
    /// Creates a row with only the mandatory keys set.
    ///
    /// # Examples
    ///
    /// ```
    /// use incident_engine::models::Incident;
    /// use chrono::NaiveDate;
    ///
    /// let incident = Incident::new("ANA", NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
    /// assert!(incident.validate().is_ok());
    /// ```
    pub fn new(employee: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            employee: employee.into(),
            date,
            hours: Decimal::ZERO,
            price_override: None,
            night_shift: false,
            night_hours: Decimal::ZERO,
            transfers: Decimal::ZERO,
            billable: false,
            reason: String::new(),
            origin_centre: String::new(),
            destination_centre: String::new(),
            destination_company: String::new(),
            payroll_month: String::new(),
            notes: String::new(),
        }
    }

    /// Creates a row prefilled from an employee's master record.
    ///
    /// The origin centre is the employee's home centre. The destination is
    /// `destination` when given, otherwise the home centre.
    pub fn for_employee(
        record: &EmployeeRecord,
        date: NaiveDate,
        destination: Option<&str>,
    ) -> Self {
        let mut incident = Self::new(record.name.clone(), date);
        incident.origin_centre = record.home_centre.clone();
        incident.destination_centre = match destination.map(str::trim) {
            Some(code) if !code.is_empty() => code.to_string(),
            _ => record.home_centre.clone(),
        };
        incident
    }

    /// Checks the row before it enters a session.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIncident` when the employee is blank, the date falls
    /// outside 1900-9999, a numeric field is negative, or night hours are
    /// recorded without the night-shift flag.
    pub fn validate(&self) -> EngineResult<()> {
        if self.employee.trim().is_empty() {
            return Err(EngineError::invalid_incident(
                "employee",
                "an employee is required",
            ));
        }

        if !YEARS.contains(&self.date.year()) {
            return Err(EngineError::invalid_incident(
                "date",
                format!("year must be between 1900 and 9999, got {}", self.date.year()),
            ));
        }

        let numeric = [
            ("hours", self.hours),
            ("night_hours", self.night_hours),
            ("transfers", self.transfers),
        ];
        for (field, value) in numeric {
            if value < Decimal::ZERO {
                return Err(EngineError::invalid_incident(
                    field,
                    format!("must not be negative, got {}", value),
                ));
            }
        }

        if let Some(price) = self.price_override.filter(|p| *p < Decimal::ZERO) {
            return Err(EngineError::invalid_incident(
                "price_override",
                format!("must not be negative, got {}", price),
            ));
        }

        if !self.night_shift && self.night_hours > Decimal::ZERO {
            return Err(EngineError::invalid_incident(
                "night_hours",
                "night hours recorded without the night-shift flag",
            ));
        }

        Ok(())
    }
}
