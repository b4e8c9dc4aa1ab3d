//! Cell and key normalization for master workbook values.
//!
//! Spreadsheet exports store codes as floats (`4021.0`, `9.9100165012016E13`),
//! pad headers with whitespace and newlines, and prefix categories with a
//! one-letter group marker. Everything that becomes a lookup key goes
//! through here first.

use calamine::Data;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::str::FromStr;

/// Service assigned to cleaning categories.
pub const CLEANING_SERVICE: &str = "020 Limpieza";

/// Service assigned to every other category.
pub const CATERING_SERVICE: &str = "010 Restauración";

/// Trims a header and turns embedded line breaks into spaces.
pub fn normalize_header(raw: &str) -> String {
    raw.replace(['\r', '\n'], " ").trim().to_string()
}

/// Normalizes a numeric-looking code.
///
/// Values written in float or scientific notation that hold a whole number
/// are rendered as integers. Plain digit strings are left untouched so
/// leading zeros survive.
///
/// ```
/// use incident_engine::master_data::normalize_code;
///
/// assert_eq!(normalize_code("4021.0"), "4021");
/// assert_eq!(normalize_code("9.9100165012016E13"), "99100165012016");
/// assert_eq!(normalize_code(" 0402 "), "0402");
/// assert_eq!(normalize_code("C-12"), "C-12");
/// ```
pub fn normalize_code(raw: &str) -> String {
    let trimmed = raw.trim();
    let looks_float = trimmed.contains(['.', 'e', 'E']);
    if looks_float {
        if let Some(whole) = trimmed.parse::<f64>().ok().and_then(whole_number) {
            return whole;
        }
    }
    trimmed.to_string()
}

/// Normalizes a category for night-rate lookups: trimmed, upper-cased, and
/// a leading one-letter token dropped (`h ASL` becomes `ASL`).
pub fn normalize_category(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    match upper.split_once(' ') {
        Some((prefix, rest)) if prefix.chars().count() == 1 && !rest.trim().is_empty() => {
            rest.trim().to_string()
        }
        _ => upper,
    }
}

/// Derives the service line from a category.
pub fn derive_service(category: &str) -> &'static str {
    let lower = category.to_lowercase();
    if lower.contains("limp") || lower.contains("asl") {
        CLEANING_SERVICE
    } else {
        CATERING_SERVICE
    }
}

/// Renders a cell as trimmed text. Whole floats lose their `.0`.
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => whole_number(*f).unwrap_or_else(|| f.to_string()),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string().trim().to_string(),
    }
}

/// Renders a cell as a normalized code.
pub fn cell_to_code(cell: &Data) -> String {
    match cell {
        Data::String(s) => normalize_code(s),
        other => cell_to_string(other),
    }
}

/// Reads a cell as a decimal.
///
/// Empty cells yield `Ok(None)`. Text cells accept a comma as the decimal
/// separator. Anything else that is not a number is an error message.
pub fn cell_to_decimal(cell: &Data) -> Result<Option<Decimal>, String> {
    match cell {
        Data::Empty => Ok(None),
        Data::Float(f) => Decimal::from_f64(*f)
            .map(Some)
            .ok_or_else(|| format!("{} is not a finite number", f)),
        Data::Int(i) => Ok(Some(Decimal::from(*i))),
        Data::String(s) => parse_decimal(s),
        other => Err(format!("expected a number, found '{}'", other)),
    }
}

/// Whether a cell holds anything other than blanks.
pub fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn parse_decimal(raw: &str) -> Result<Option<Decimal>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let candidate = trimmed.replace(',', ".");
    Decimal::from_str(&candidate)
        .or_else(|_| Decimal::from_scientific(&candidate))
        .map(Some)
        .map_err(|_| format!("'{}' is not a number", trimmed))
}

fn whole_number(value: f64) -> Option<String> {
    // i64 holds every whole float below 2^63.
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e18 {
        Some(format!("{}", value as i64))
    } else {
        None
    }
}
