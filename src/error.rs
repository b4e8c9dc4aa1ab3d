//! Error types for the Incident Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while loading master data,
//! recording incidents, pricing them and exporting reports.

use thiserror::Error;

/// The broad class an [`EngineError`] belongs to.
///
/// Callers use the kind to decide how to react: configuration errors are
/// fatal at startup, validation errors reject a single row, lookup errors
/// are surfaced so the caller can skip or block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The settings file or the master workbook is missing or malformed.
    Configuration,
    /// An incident row or store operation was rejected.
    Validation,
    /// A key (employee, night rate, session) had no matching entry.
    Lookup,
    /// The export serializer failed to produce the byte stream.
    Export,
}

/// The main error type for the Incident Engine.
///
/// # Example
///
/// ```
/// use incident_engine::error::{EngineError, ErrorKind};
///
/// let error = EngineError::EmployeeNotFound {
///     employee: "ANA".to_string(),
/// };
/// assert_eq!(error.to_string(), "Employee not found in master data: ANA");
/// assert_eq!(error.kind(), ErrorKind::Lookup);
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A required sheet is absent from the master workbook.
    #[error("Sheet '{sheet}' not found in workbook '{path}'")]
    MissingSheet {
        /// The workbook path.
        path: String,
        /// The sheet that was expected.
        sheet: String,
    },

    /// A required column is absent from a master sheet.
    #[error("Column '{column}' not found in sheet '{sheet}'")]
    MissingColumn {
        /// The sheet that was searched.
        sheet: String,
        /// The column that was expected.
        column: String,
    },

    /// A master sheet cell holds a value that cannot be used.
    #[error("Invalid value in sheet '{sheet}', row {row}, column '{column}': {message}")]
    InvalidMasterData {
        /// The sheet holding the cell.
        sheet: String,
        /// The 1-based spreadsheet row.
        row: usize,
        /// The column header.
        column: String,
        /// A description of the problem.
        message: String,
    },

    /// A setting holds a value outside its allowed range.
    #[error("Invalid setting '{key}': {message}")]
    InvalidSetting {
        /// The dotted setting key.
        key: String,
        /// A description of what made the value invalid.
        message: String,
    },

    /// An incident row was rejected.
    #[error("Invalid incident field '{field}': {message}")]
    InvalidIncident {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A computed amount does not fit in a decimal.
    #[error("Amount '{field}' is out of range")]
    AmountOverflow {
        /// The amount that overflowed.
        field: String,
    },

    /// A row index does not exist in the session.
    #[error("Incident index {index} out of range (session holds {len} rows)")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of rows in the session.
        len: usize,
    },

    /// The employee key has no master record.
    #[error("Employee not found in master data: {employee}")]
    EmployeeNotFound {
        /// The employee key that was looked up.
        employee: String,
    },

    /// A night-shift row could not be priced.
    #[error(
        "No night premium for employee '{employee}' (category '{category}', agreement '{agreement}')"
    )]
    NightRateNotFound {
        /// The employee key.
        employee: String,
        /// The employee's category.
        category: String,
        /// The employee's agreement code.
        agreement: String,
    },

    /// The session id is unknown.
    #[error("Session not found: {id}")]
    SessionNotFound {
        /// The session id that was looked up.
        id: String,
    },

    /// The report serializer failed.
    #[error("Failed to export {format}: {message}")]
    ExportFailed {
        /// The export format.
        format: String,
        /// A description of the failure.
        message: String,
    },
}

impl EngineError {
    /// Returns the broad class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::MissingSheet { .. }
            | EngineError::MissingColumn { .. }
            | EngineError::InvalidMasterData { .. }
            | EngineError::InvalidSetting { .. } => ErrorKind::Configuration,
            EngineError::InvalidIncident { .. }
            | EngineError::AmountOverflow { .. }
            | EngineError::IndexOutOfRange { .. } => ErrorKind::Validation,
            EngineError::EmployeeNotFound { .. }
            | EngineError::NightRateNotFound { .. }
            | EngineError::SessionNotFound { .. } => ErrorKind::Lookup,
            EngineError::ExportFailed { .. } => ErrorKind::Export,
        }
    }

    pub(crate) fn amount_overflow(field: &str) -> Self {
        EngineError::AmountOverflow {
            field: field.to_string(),
        }
    }

    pub(crate) fn invalid_incident(field: &str, message: impl Into<String>) -> Self {
        EngineError::InvalidIncident {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/settings.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/settings.yaml"
        );
        assert_eq!(error.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_missing_column_displays_sheet_and_column() {
        let error = EngineError::MissingColumn {
            sheet: "Trabajadores".to_string(),
            column: "coste_hora".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Column 'coste_hora' not found in sheet 'Trabajadores'"
        );
        assert_eq!(error.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_invalid_incident_is_validation() {
        let error = EngineError::invalid_incident("employee", "must not be empty");
        assert_eq!(
            error.to_string(),
            "Invalid incident field 'employee': must not be empty"
        );
        assert_eq!(error.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_index_out_of_range_is_validation() {
        let error = EngineError::IndexOutOfRange { index: 5, len: 3 };
        assert_eq!(
            error.to_string(),
            "Incident index 5 out of range (session holds 3 rows)"
        );
        assert_eq!(error.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_lookup_errors_classify_as_lookup() {
        let night = EngineError::NightRateNotFound {
            employee: "ANA".to_string(),
            category: "ASL".to_string(),
            agreement: "99100165012016".to_string(),
        };
        let session = EngineError::SessionNotFound {
            id: "abc".to_string(),
        };
        assert_eq!(night.kind(), ErrorKind::Lookup);
        assert_eq!(session.kind(), ErrorKind::Lookup);
        assert!(night.to_string().contains("99100165012016"));
    }

    #[test]
    fn test_export_failed_displays_format() {
        let error = EngineError::ExportFailed {
            format: "xlsx".to_string(),
            message: "disk full".to_string(),
        };
        assert_eq!(error.to_string(), "Failed to export xlsx: disk full");
        assert_eq!(error.kind(), ErrorKind::Export);
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_not_found() -> EngineResult<()> {
            Err(EngineError::EmployeeNotFound {
                employee: "NOBODY".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
