//! HTTP API module for the Incident Engine.
//!
//! This module provides the REST endpoints supervisors use to open a
//! session, record incident rows, review their cost and download the
//! payroll report, plus read-only master-data queries.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    BulkAddRequest, BulkTarget, DeleteSelectedRequest, EmployeeQuery, ExportQuery,
    IncidentRequest, OpenSessionRequest, PageQuery,
};
pub use response::{
    ApiError, ApiErrorResponse, Appended, CentreSummary, EmployeeSummary, HealthResponse,
    IncidentPage, IndexedIncident, MasterReloaded, RowSummary, RowsAffected, SessionCreated,
    SessionSummary,
};
pub use state::AppState;
