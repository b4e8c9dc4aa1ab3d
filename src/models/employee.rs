//! Master-data models: employees, their rates, centres and payroll accounts.
//!
//! These records are loaded once from the master workbook and shared
//! read-only for the lifetime of the process.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The rates used to price an employee's incidents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRates {
    /// Hourly rate applied to worked hours.
    pub hourly_rate: Decimal,
    /// Per-hour night premium recorded on the employee, if any. When absent
    /// the premium comes from the night-rate table.
    #[serde(default)]
    pub night_premium: Option<Decimal>,
    /// Cost of one transfer unit.
    pub transfer_unit_cost: Decimal,
}

impl EmployeeRates {
    /// Creates rates with no per-employee night premium.
    pub fn new(hourly_rate: Decimal, transfer_unit_cost: Decimal) -> Self {
        Self {
            hourly_rate,
            night_premium: None,
            transfer_unit_cost,
        }
    }

    /// Returns the rates with the night premium set.
    pub fn with_night_premium(mut self, premium: Decimal) -> Self {
        self.night_premium = Some(premium);
        self
    }
}

/// One employee row from the master workbook.
///
/// # Examples
///
/// ```
/// use incident_engine::models::{EmployeeRates, EmployeeRecord};
/// use rust_decimal::Decimal;
///
/// let record = EmployeeRecord::new("ana", EmployeeRates::new(Decimal::from(10), Decimal::from(2)));
/// assert_eq!(record.name, "ANA");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Normalized employee name; the lookup key.
    pub name: String,
    /// Pricing rates.
    pub rates: EmployeeRates,
    /// Employee category (e.g. "h ASL").
    #[serde(default)]
    pub category: String,
    /// Collective agreement code, normalized.
    #[serde(default)]
    pub agreement: String,
    /// Home centre code, normalized.
    #[serde(default)]
    pub home_centre: String,
    /// Operations supervisor.
    #[serde(default)]
    pub supervisor: String,
    /// Service line.
    #[serde(default)]
    pub service: String,
    /// Contract percentage as written in the workbook.
    #[serde(default)]
    pub contract_percentage: String,
    /// Company code.
    #[serde(default)]
    pub company_code: String,
}

impl EmployeeRecord {
    /// Creates a record with empty metadata. The name is normalized.
    pub fn new(name: &str, rates: EmployeeRates) -> Self {
        Self {
            name: normalize_employee_key(name),
            rates,
            category: String::new(),
            agreement: String::new(),
            home_centre: String::new(),
            supervisor: String::new(),
            service: String::new(),
            contract_percentage: String::new(),
            company_code: String::new(),
        }
    }
}

/// Normalizes an employee name into its lookup key: trimmed, inner
/// whitespace collapsed, upper-cased.
pub fn normalize_employee_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// A work centre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Centre {
    /// Normalized centre code.
    pub code: String,
    /// Centre name.
    pub name: String,
    /// Operations supervisor responsible for the centre.
    #[serde(default)]
    pub supervisor: String,
}

impl Centre {
    /// "code - name", the label shown in centre pickers.
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.code, self.name)
    }
}

/// Payroll account an incident reason is booked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountCode {
    /// Accounts 70/71, public holidays.
    Holidays,
    /// Account 72, incentives.
    Incentives,
    /// Account 73, substitution plus.
    Substitution,
    /// Account 74, night plus.
    NightPlus,
    /// Any reason without a mapped account.
    Other,
}

impl AccountCode {
    /// Classifies an account description from the account sheet.
    ///
    /// Returns `None` when the description names no known account.
    ///
    /// ```
    /// use incident_engine::models::AccountCode;
    ///
    /// assert_eq!(AccountCode::from_description("70/71 Festivos"), Some(AccountCode::Holidays));
    /// assert_eq!(AccountCode::from_description("73 Plus sustitución"), Some(AccountCode::Substitution));
    /// assert_eq!(AccountCode::from_description("Dietas"), None);
    /// ```
    pub fn from_description(description: &str) -> Option<Self> {
        let description = description.trim();
        if description.contains("70/71") {
            Some(AccountCode::Holidays)
        } else if description.starts_with("73") {
            Some(AccountCode::Substitution)
        } else if description.starts_with("72") {
            Some(AccountCode::Incentives)
        } else if description.starts_with("74") {
            Some(AccountCode::NightPlus)
        } else {
            None
        }
    }
}
