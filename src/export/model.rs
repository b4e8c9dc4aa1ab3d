//! The flat row set shared by every export format.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::calculation::{AccountBreakdown, round_money};
use crate::master_data::MasterData;
use crate::models::{EmployeeRecord, PricedIncident};

/// Report column headers, in output order.
pub const HEADERS: [&str; 29] = [
    "Supervisor",
    "Payroll month",
    "Billable",
    "Service",
    "Reason",
    "Employee",
    "Destination company",
    "Destination centre",
    "Destination centre name",
    "Category",
    "Hours",
    "Price",
    "Night hours",
    "Night price",
    "Transfers",
    "Transfer unit cost",
    "Origin centre",
    "Home centre name",
    "Date",
    "Notes",
    "Agreement",
    "Contract %",
    "Company code",
    "73 Substitution",
    "72 Incentives",
    "70/71 Holidays",
    "74 Night plus",
    "Simple cost",
    "Surcharge cost",
];

/// One report cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Free text.
    Text(String),
    /// A quantity (hours, transfers), written as is.
    Quantity(Decimal),
    /// A money amount, rounded to cents.
    Money(Decimal),
    /// A calendar date.
    Date(NaiveDate),
    /// Nothing.
    Empty,
}

impl Cell {
    /// Text rendering used by CSV.
    pub fn to_text(&self) -> String {
        match self {
            Cell::Text(text) => text.clone(),
            Cell::Quantity(value) => value.normalize().to_string(),
            Cell::Money(value) => format!("{:.2}", value),
            Cell::Date(date) => date.format("%d/%m/%Y").to_string(),
            Cell::Empty => String::new(),
        }
    }
}

fn text(value: &str) -> Cell {
    Cell::Text(value.to_string())
}

/// Builds the report row of one priced incident.
pub fn export_row(priced: &PricedIncident, master: &MasterData) -> Vec<Cell> {
    let incident = &priced.incident;
    let cost = &priced.cost;
    let accounts = AccountBreakdown::for_priced(priced);
    let record = master.employee(&incident.employee).ok();
    let field = |get: fn(&EmployeeRecord) -> &str| {
        record.map(get).map(text).unwrap_or(Cell::Empty)
    };
    let centre_name = |code: &str| {
        master
            .centre(code)
            .map(|centre| text(&centre.name))
            .unwrap_or(Cell::Empty)
    };
    let home_centre = record.map(|r| r.home_centre.as_str()).unwrap_or_default();

    vec![
        field(|r| r.supervisor.as_str()),
        text(&incident.payroll_month),
        text(if incident.billable { "Yes" } else { "No" }),
        field(|r| r.service.as_str()),
        text(&incident.reason),
        text(record.map(|r| r.name.as_str()).unwrap_or(&incident.employee)),
        text(&incident.destination_company),
        text(&incident.destination_centre),
        centre_name(&incident.destination_centre),
        field(|r| r.category.as_str()),
        Cell::Quantity(incident.hours),
        Cell::Money(round_money(priced.hourly_price)),
        Cell::Quantity(incident.night_hours),
        priced
            .night_price
            .map(|price| Cell::Money(round_money(price)))
            .unwrap_or(Cell::Empty),
        Cell::Quantity(incident.transfers),
        Cell::Money(round_money(priced.rates.transfer_unit_cost)),
        text(&incident.origin_centre),
        centre_name(home_centre),
        Cell::Date(incident.date),
        text(&incident.notes),
        field(|r| r.agreement.as_str()),
        field(|r| r.contract_percentage.as_str()),
        field(|r| r.company_code.as_str()),
        Cell::Money(round_money(accounts.substitution)),
        Cell::Money(round_money(accounts.incentives)),
        Cell::Money(round_money(accounts.holidays)),
        Cell::Money(round_money(accounts.night_plus)),
        Cell::Money(round_money(cost.simple_cost)),
        Cell::Money(round_money(cost.surcharge_cost)),
    ]
}
