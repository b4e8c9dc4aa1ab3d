//! Incident Engine for supervisor incident logging
//!
//! This crate loads employee rates and metadata from a master workbook,
//! keeps per-session lists of work incidents, prices each incident as hours,
//! night hours and transfers times the employee's rates plus a social-security
//! surcharge, and exports the priced rows to XLSX or CSV for payroll.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod export;
pub mod master_data;
pub mod models;
pub mod session;
