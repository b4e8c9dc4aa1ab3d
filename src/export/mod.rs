//! Report export.
//!
//! [`export`] prices a session's rows, flattens each into the report
//! columns, and serializes the whole set to XLSX or CSV bytes. The call
//! either returns the complete byte stream or fails; nothing partial is
//! produced.

mod csv_format;
mod model;
mod xlsx;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::calculation::price_all;
use crate::config::PricingSettings;
use crate::error::{EngineError, EngineResult};
use crate::master_data::MasterData;
use crate::models::Incident;

pub use model::{Cell, HEADERS, export_row};

/// Output format of a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Excel workbook.
    #[default]
    Xlsx,
    /// Comma-separated values, UTF-8.
    Csv,
}

impl ExportFormat {
    /// MIME type of the format.
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Csv => "text/csv; charset=utf-8",
        }
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// What to do with rows that cannot be priced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnpricedPolicy {
    /// Fail the export with the first row's lookup error.
    #[default]
    Block,
    /// Leave unpriced rows out of the report.
    Skip,
}

/// Parameters of one export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Output format.
    pub format: ExportFormat,
    /// Social-security rate applied to the simple cost.
    pub social_security_rate: Decimal,
    /// Handling of unpriced rows.
    pub unpriced: UnpricedPolicy,
}

impl ExportOptions {
    /// Options for `format` with the configured pricing and the blocking
    /// policy.
    pub fn new(format: ExportFormat, pricing: &PricingSettings) -> Self {
        Self {
            format,
            social_security_rate: pricing.social_security_rate,
            unpriced: UnpricedPolicy::Block,
        }
    }

    /// Returns the options with a different unpriced-row policy.
    pub fn with_unpriced(mut self, unpriced: UnpricedPolicy) -> Self {
        self.unpriced = unpriced;
        self
    }
}

/// Serializes `rows` to report bytes. Row order is preserved.
///
/// # Errors
///
/// - the row's `EmployeeNotFound` / `NightRateNotFound` under
///   [`UnpricedPolicy::Block`]
/// - `ExportFailed` when the serializer fails
///
/// # Example
///
/// ```
/// use incident_engine::config::PricingSettings;
/// use incident_engine::export::{ExportFormat, ExportOptions, export};
/// use incident_engine::master_data::MasterData;
/// use incident_engine::models::{EmployeeRates, EmployeeRecord, Incident};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let ana = EmployeeRecord::new("ana", EmployeeRates::new(Decimal::from(10), Decimal::from(2)));
/// let master = MasterData::new(vec![ana], vec![]);
/// let mut row = Incident::new("ANA", NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
/// row.hours = Decimal::from(8);
///
/// let options = ExportOptions::new(ExportFormat::Csv, &PricingSettings::default());
/// let bytes = export(&[row], &master, &options)?;
/// assert_eq!(String::from_utf8(bytes).unwrap().lines().count(), 2);
/// # Ok::<(), incident_engine::error::EngineError>(())
/// ```
pub fn export(
    rows: &[Incident],
    master: &MasterData,
    options: &ExportOptions,
) -> EngineResult<Vec<u8>> {
    let started = Instant::now();
    let pricing = PricingSettings {
        social_security_rate: options.social_security_rate,
    };

    let mut table = Vec::with_capacity(rows.len());
    let mut skipped = 0usize;
    for (index, result) in price_all(rows, master, &pricing).into_iter().enumerate() {
        match result {
            Ok(priced) => table.push(export_row(&priced, master)),
            Err(error) if options.unpriced == UnpricedPolicy::Skip => {
                warn!(row = index, error = %error, "Unpriced row left out of export");
                skipped += 1;
            }
            Err(error) => return Err(error),
        }
    }

    let bytes = match options.format {
        ExportFormat::Xlsx => xlsx::write_xlsx(&table),
        ExportFormat::Csv => csv_format::write_csv(&table),
    }
    .map_err(|message| EngineError::ExportFailed {
        format: options.format.to_string(),
        message,
    })?;

    info!(
        format = %options.format,
        rows = table.len(),
        skipped,
        bytes = bytes.len(),
        duration_us = started.elapsed().as_micros() as u64,
        "Report exported"
    );

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmployeeRates, EmployeeRecord};
    use chrono::NaiveDate;

    fn master() -> MasterData {
        let ana = EmployeeRecord::new("ana", EmployeeRates::new(Decimal::from(10), Decimal::from(2)));
        let luis = EmployeeRecord::new("luis", EmployeeRates::new(Decimal::from(12), Decimal::from(3)));
        MasterData::new(vec![ana, luis], vec![])
    }

    fn row(employee: &str, hours: i64) -> Incident {
        let mut incident = Incident::new(employee, NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
        incident.hours = Decimal::from(hours);
        incident
    }

    fn csv_options() -> ExportOptions {
        ExportOptions {
            format: ExportFormat::Csv,
            social_security_rate: Decimal::new(3, 1),
            unpriced: UnpricedPolicy::Block,
        }
    }

    fn employee_column(bytes: Vec<u8>) -> Vec<String> {
        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let position = HEADERS.iter().position(|h| *h == "Employee").unwrap();
        reader
            .records()
            .map(|record| record.unwrap()[position].to_string())
            .collect()
    }

    #[test]
    fn test_export_preserves_insertion_order() {
        let rows = vec![row("luis", 1), row("ana", 2), row("luis", 3)];

        let bytes = export(&rows, &master(), &csv_options()).unwrap();

        assert_eq!(employee_column(bytes), vec!["LUIS", "ANA", "LUIS"]);
    }

    #[test]
    fn test_unpriced_row_blocks_export() {
        let rows = vec![row("ana", 1), row("pedro", 1)];

        let result = export(&rows, &master(), &csv_options());

        assert!(matches!(result, Err(EngineError::EmployeeNotFound { .. })));
    }

    #[test]
    fn test_unpriced_row_can_be_skipped() {
        let rows = vec![row("ana", 1), row("pedro", 1), row("luis", 1)];
        let options = csv_options().with_unpriced(UnpricedPolicy::Skip);

        let bytes = export(&rows, &master(), &options).unwrap();

        assert_eq!(employee_column(bytes), vec!["ANA", "LUIS"]);
    }

    #[test]
    fn test_xlsx_export_is_a_zip_container() {
        let options = ExportOptions {
            format: ExportFormat::Xlsx,
            ..csv_options()
        };

        let bytes = export(&[row("ana", 8)], &master(), &options).unwrap();

        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_format_metadata() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Xlsx.to_string(), "xlsx");
        assert!(ExportFormat::Csv.content_type().starts_with("text/csv"));
        assert_eq!(ExportFormat::default(), ExportFormat::Xlsx);
    }

    #[test]
    fn test_format_deserializes_lowercase() {
        let format: ExportFormat = serde_json::from_str("\"csv\"").unwrap();
        assert_eq!(format, ExportFormat::Csv);
    }
}
