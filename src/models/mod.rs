//! Core data models for the Incident Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod cost;
mod employee;
mod incident;

pub use cost::{IncidentCost, PricedIncident, SessionTotals};
pub use employee::{AccountCode, Centre, EmployeeRates, EmployeeRecord, normalize_employee_key};
pub use incident::Incident;
