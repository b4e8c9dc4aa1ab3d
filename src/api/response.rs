//! Response types for the Incident Engine API.
//!
//! This module defines the JSON response bodies, the error response
//! structure, and the mapping from [`EngineError`] to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, ErrorKind};
use crate::models::{Centre, EmployeeRecord, Incident, IncidentCost, SessionTotals};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response carrying `error`.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

fn error_code(error: &EngineError) -> &'static str {
    match error {
        EngineError::ConfigNotFound { .. }
        | EngineError::ConfigParseError { .. }
        | EngineError::InvalidSetting { .. } => "CONFIG_ERROR",
        EngineError::MissingSheet { .. }
        | EngineError::MissingColumn { .. }
        | EngineError::InvalidMasterData { .. } => "MASTER_DATA_ERROR",
        EngineError::InvalidIncident { .. } => "VALIDATION_ERROR",
        EngineError::AmountOverflow { .. } => "AMOUNT_OVERFLOW",
        EngineError::IndexOutOfRange { .. } => "INDEX_OUT_OF_RANGE",
        EngineError::EmployeeNotFound { .. } => "EMPLOYEE_NOT_FOUND",
        EngineError::NightRateNotFound { .. } => "NIGHT_RATE_NOT_FOUND",
        EngineError::SessionNotFound { .. } => "SESSION_NOT_FOUND",
        EngineError::ExportFailed { .. } => "EXPORT_FAILED",
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let status = match error.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Lookup => StatusCode::NOT_FOUND,
            ErrorKind::Configuration | ErrorKind::Export => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let code = error_code(&error);
        let body = match &error {
            EngineError::InvalidIncident { field, .. } => {
                ApiError::with_details(code, error.to_string(), format!("field: {}", field))
            }
            EngineError::ConfigNotFound { path } => ApiError::with_details(
                code,
                "Configuration error",
                format!("Configuration file not found: {}", path),
            ),
            _ => ApiError::new(code, error.to_string()),
        };
        ApiErrorResponse {
            status,
            error: body,
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "ok".
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Whether master data is loaded.
    pub master_loaded: bool,
    /// Open sessions.
    pub sessions: usize,
}

/// Body returned when a session is opened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCreated {
    /// Session id.
    pub id: Uuid,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Payroll month of the session.
    pub payroll_month: String,
}

/// A row together with its position in the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedIncident {
    /// 0-based position.
    pub index: usize,
    /// The row.
    pub incident: Incident,
}

/// Body of `GET /sessions/:id/incidents`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentPage {
    /// Page returned.
    pub page: usize,
    /// Total pages.
    pub total_pages: usize,
    /// Rows per page.
    pub per_page: usize,
    /// Rows in the session.
    pub total_rows: usize,
    /// Rows of this page.
    pub rows: Vec<IndexedIncident>,
}

/// Body returned by operations that change a number of rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowsAffected {
    /// Rows added or removed.
    pub affected: usize,
    /// Rows in the session afterwards.
    pub total_rows: usize,
}

/// Body returned when one row is appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appended {
    /// Position of the new row.
    pub index: usize,
}

/// Pricing outcome of one row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowSummary {
    /// 0-based position.
    pub index: usize,
    /// Employee key.
    pub employee: String,
    /// Cost, when the row could be priced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<IncidentCost>,
    /// Why the row could not be priced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

/// Body of `GET /sessions/:id/summary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Aggregated totals over priced rows.
    pub totals: SessionTotals,
    /// Per-row outcome, in session order.
    pub rows: Vec<RowSummary>,
}

/// An employee as listed by `GET /master/employees`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeSummary {
    /// Employee key.
    pub name: String,
    /// Category.
    pub category: String,
    /// Home centre code.
    pub home_centre: String,
    /// Supervisor.
    pub supervisor: String,
    /// Service line.
    pub service: String,
}

impl From<&EmployeeRecord> for EmployeeSummary {
    fn from(record: &EmployeeRecord) -> Self {
        Self {
            name: record.name.clone(),
            category: record.category.clone(),
            home_centre: record.home_centre.clone(),
            supervisor: record.supervisor.clone(),
            service: record.service.clone(),
        }
    }
}

/// A centre as listed by `GET /master/centres`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CentreSummary {
    /// Centre code.
    pub code: String,
    /// Centre name.
    pub name: String,
    /// Supervisor.
    pub supervisor: String,
    /// "code - name".
    pub label: String,
}

impl From<&Centre> for CentreSummary {
    fn from(centre: &Centre) -> Self {
        Self {
            code: centre.code.clone(),
            name: centre.name.clone(),
            supervisor: centre.supervisor.clone(),
            label: centre.display_name(),
        }
    }
}

/// Body of `POST /master/reload`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterReloaded {
    /// Employees loaded.
    pub employees: usize,
    /// Open centres loaded.
    pub centres: usize,
    /// Night premiums loaded.
    pub night_rates: usize,
}
