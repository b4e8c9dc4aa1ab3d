//! Request types for the Incident Engine API.
//!
//! This module defines the JSON bodies and query strings accepted by the
//! session, incident, export and master-data endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::export::ExportFormat;
use crate::models::Incident;

/// Request body for `POST /sessions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenSessionRequest {
    /// Payroll month stamped on prefilled rows (e.g. "01-Enero").
    #[serde(default)]
    pub payroll_month: String,
    /// Supervisor the session works for.
    #[serde(default)]
    pub supervisor: Option<String>,
}

/// One incident row as submitted by a client.
///
/// The date is optional here so a missing date surfaces as a validation
/// error naming the field instead of a generic body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncidentRequest {
    /// Employee name.
    #[serde(default)]
    pub employee: String,
    /// Incident date.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Worked hours.
    #[serde(default)]
    pub hours: Decimal,
    /// Per-hour price replacing the master rate.
    #[serde(default)]
    pub price_override: Option<Decimal>,
    /// Night-shift flag.
    #[serde(default)]
    pub night_shift: bool,
    /// Night-shift hours.
    #[serde(default)]
    pub night_hours: Decimal,
    /// Transfers.
    #[serde(default)]
    pub transfers: Decimal,
    /// Billable to the client.
    #[serde(default)]
    pub billable: bool,
    /// Reason.
    #[serde(default)]
    pub reason: String,
    /// Origin centre code.
    #[serde(default)]
    pub origin_centre: String,
    /// Destination centre code.
    #[serde(default)]
    pub destination_centre: String,
    /// Destination company.
    #[serde(default)]
    pub destination_company: String,
    /// Payroll month.
    #[serde(default)]
    pub payroll_month: String,
    /// Notes.
    #[serde(default)]
    pub notes: String,
}

impl TryFrom<IncidentRequest> for Incident {
    type Error = EngineError;

    fn try_from(req: IncidentRequest) -> EngineResult<Self> {
        let date = req
            .date
            .ok_or_else(|| EngineError::invalid_incident("date", "a date is required"))?;
        Ok(Incident {
            employee: req.employee.trim().to_string(),
            date,
            hours: req.hours,
            price_override: req.price_override,
            night_shift: req.night_shift,
            night_hours: req.night_hours,
            transfers: req.transfers,
            billable: req.billable,
            reason: req.reason,
            origin_centre: req.origin_centre,
            destination_centre: req.destination_centre,
            destination_company: req.destination_company,
            payroll_month: req.payroll_month,
            notes: req.notes,
        })
    }
}

/// Query string of `GET /sessions/:id/incidents`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    /// 1-based page number.
    pub page: Option<usize>,
    /// Rows per page; the configured default when absent.
    pub per_page: Option<usize>,
}

/// Request body for `POST /sessions/:id/incidents/delete`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteSelectedRequest {
    /// Indices of the rows to delete.
    pub indices: Vec<usize>,
}

/// Request body for `POST /sessions/:id/incidents/bulk`.
///
/// Exactly one of `employee` and `centre` must be given.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkAddRequest {
    /// Employee to add `count` rows for.
    #[serde(default)]
    pub employee: Option<String>,
    /// Centre whose employees each get one row.
    #[serde(default)]
    pub centre: Option<String>,
    /// Date of the new rows.
    pub date: NaiveDate,
    /// Number of rows for `employee`, at most
    /// [`MAX_BULK_ROWS`](crate::session::MAX_BULK_ROWS).
    #[serde(default = "default_count")]
    pub count: usize,
    /// Destination centre; each employee's home centre when absent.
    #[serde(default)]
    pub destination: Option<String>,
}

fn default_count() -> usize {
    1
}

/// What a bulk-add request targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkTarget<'a> {
    /// `count` rows for one employee.
    Employee(&'a str, usize),
    /// One row per employee of a centre.
    Centre(&'a str),
}

impl BulkAddRequest {
    /// Resolves the single target of the request.
    pub fn target(&self) -> EngineResult<BulkTarget<'_>> {
        let employee = self.employee.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let centre = self.centre.as_deref().map(str::trim).filter(|s| !s.is_empty());
        match (employee, centre) {
            (Some(employee), None) => Ok(BulkTarget::Employee(employee, self.count)),
            (None, Some(centre)) => Ok(BulkTarget::Centre(centre)),
            _ => Err(EngineError::invalid_incident(
                "employee",
                "give exactly one of employee or centre",
            )),
        }
    }
}

/// Query string of `GET /sessions/:id/export`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportQuery {
    /// Output format; the configured default when absent.
    pub format: Option<ExportFormat>,
    /// Leave unpriced rows out instead of failing.
    #[serde(default)]
    pub skip_unpriced: bool,
}

/// Query string of `GET /master/employees`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeQuery {
    /// Only employees of this home centre.
    pub centre: Option<String>,
    /// Only employees of this supervisor.
    pub supervisor: Option<String>,
}
