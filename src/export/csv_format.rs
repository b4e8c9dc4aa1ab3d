//! CSV serialization.

use super::model::{Cell, HEADERS};

/// Writes the header and rows as UTF-8 CSV.
pub(crate) fn write_csv(rows: &[Vec<Cell>]) -> Result<Vec<u8>, String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(HEADERS)
        .map_err(|e| format!("CSV write error: {e}"))?;
    for row in rows {
        writer
            .write_record(row.iter().map(Cell::to_text))
            .map_err(|e| format!("CSV write error: {e}"))?;
    }

    writer
        .into_inner()
        .map_err(|e| format!("CSV flush error: {e}"))
}
