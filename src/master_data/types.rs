//! The in-memory master data and its lookups.

use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::{EngineError, EngineResult};
use crate::models::{AccountCode, Centre, EmployeeRates, EmployeeRecord, normalize_employee_key};

use super::normalize::{normalize_category, normalize_code};

/// Reference data loaded from the master workbook.
///
/// Immutable once built; shared read-only by every session.
///
/// # Example
///
/// ```
/// use incident_engine::master_data::MasterData;
/// use incident_engine::models::{EmployeeRates, EmployeeRecord};
/// use rust_decimal::Decimal;
///
/// let ana = EmployeeRecord::new("ana", EmployeeRates::new(Decimal::from(10), Decimal::from(2)));
/// let master = MasterData::new(vec![ana], vec![]);
///
/// assert_eq!(master.rates_for("Ana")?.hourly_rate, Decimal::from(10));
/// assert!(master.employee("nobody").is_err());
/// # Ok::<(), incident_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MasterData {
    employees: HashMap<String, EmployeeRecord>,
    night_rates: HashMap<(String, String), Decimal>,
    centres: BTreeMap<String, Centre>,
    accounts: HashMap<String, AccountCode>,
}

impl MasterData {
    /// Builds master data from employees and centres.
    ///
    /// Employees without a supervisor inherit the supervisor of their home
    /// centre. A later employee with the same key replaces an earlier one.
    pub fn new(employees: Vec<EmployeeRecord>, centres: Vec<Centre>) -> Self {
        let mut centre_map = BTreeMap::new();
        for mut centre in centres {
            centre.code = normalize_code(&centre.code);
            centre_map.entry(centre.code.clone()).or_insert(centre);
        }

        let employees = employees
            .into_iter()
            .map(|mut record| {
                record.name = normalize_employee_key(&record.name);
                record.home_centre = normalize_code(&record.home_centre);
                if record.supervisor.trim().is_empty() {
                    if let Some(centre) = centre_map.get(&record.home_centre) {
                        record.supervisor = centre.supervisor.clone();
                    }
                }
                (record.name.clone(), record)
            })
            .collect();

        Self {
            employees,
            night_rates: HashMap::new(),
            centres: centre_map,
            accounts: HashMap::new(),
        }
    }

    /// Adds a night premium for a (category, agreement) pair.
    pub fn with_night_rate(mut self, category: &str, agreement: &str, rate: Decimal) -> Self {
        self.insert_night_rate(category, agreement, rate);
        self
    }

    /// Maps an incident reason to a payroll account.
    pub fn with_account(mut self, reason: &str, account: AccountCode) -> Self {
        self.insert_account(reason, account);
        self
    }

    pub(crate) fn insert_night_rate(&mut self, category: &str, agreement: &str, rate: Decimal) {
        self.night_rates
            .insert((normalize_category(category), normalize_code(agreement)), rate);
    }

    pub(crate) fn insert_account(&mut self, reason: &str, account: AccountCode) {
        self.accounts.insert(reason.trim().to_string(), account);
    }

    /// Looks up an employee by name.
    ///
    /// # Errors
    ///
    /// Returns `EmployeeNotFound` when the name has no master record.
    pub fn employee(&self, name: &str) -> EngineResult<&EmployeeRecord> {
        let key = normalize_employee_key(name);
        self.employees
            .get(&key)
            .ok_or(EngineError::EmployeeNotFound { employee: key })
    }

    /// Looks up an employee's rates.
    pub fn rates_for(&self, name: &str) -> EngineResult<&EmployeeRates> {
        self.employee(name).map(|record| &record.rates)
    }

    /// The night premium of a (category, agreement) pair, if configured.
    pub fn night_rate(&self, category: &str, agreement: &str) -> Option<Decimal> {
        let category = normalize_category(category);
        let agreement = normalize_code(agreement);
        if category.is_empty() || agreement.is_empty() {
            return None;
        }
        self.night_rates.get(&(category, agreement)).copied()
    }

    /// The night premium that applies to an employee: their own premium,
    /// else the (category, agreement) table entry.
    pub fn night_premium_for(&self, record: &EmployeeRecord) -> Option<Decimal> {
        record
            .rates
            .night_premium
            .or_else(|| self.night_rate(&record.category, &record.agreement))
    }

    /// The payroll account of a reason. Unmapped reasons are `Other`.
    pub fn account_for(&self, reason: &str) -> AccountCode {
        self.accounts
            .get(reason.trim())
            .copied()
            .unwrap_or(AccountCode::Other)
    }

    /// All employee keys, sorted.
    pub fn employee_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.employees.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Employees whose home centre is `code`, sorted by name.
    pub fn employees_by_centre(&self, code: &str) -> Vec<&EmployeeRecord> {
        let code = normalize_code(code);
        if code.is_empty() {
            return Vec::new();
        }
        self.sorted_employees(|record| record.home_centre == code)
    }

    /// Employees reporting to `supervisor`, sorted by name.
    pub fn employees_by_supervisor(&self, supervisor: &str) -> Vec<&EmployeeRecord> {
        let supervisor = supervisor.trim();
        if supervisor.is_empty() {
            return Vec::new();
        }
        self.sorted_employees(|record| record.supervisor.trim() == supervisor)
    }

    fn sorted_employees<F>(&self, filter: F) -> Vec<&EmployeeRecord>
    where
        F: Fn(&EmployeeRecord) -> bool,
    {
        let mut records: Vec<&EmployeeRecord> =
            self.employees.values().filter(|r| filter(r)).collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        records
    }

    /// Every supervisor named on a centre or an employee, sorted and unique.
    pub fn supervisors(&self) -> Vec<String> {
        self.centres
            .values()
            .map(|centre| centre.supervisor.trim())
            .chain(self.employees.values().map(|r| r.supervisor.trim()))
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// All open centres, sorted by code.
    pub fn centres(&self) -> impl Iterator<Item = &Centre> {
        self.centres.values()
    }

    /// Looks up a centre by code.
    pub fn centre(&self, code: &str) -> Option<&Centre> {
        self.centres.get(&normalize_code(code))
    }

    /// Number of employees.
    pub fn employee_count(&self) -> usize {
        self.employees.len()
    }

    /// Number of (category, agreement) night premiums.
    pub fn night_rate_count(&self) -> usize {
        self.night_rates.len()
    }

    /// Number of reasons mapped to an account.
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }
}
