//! XLSX serialization with a styled header and banded rows.

use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{
    Color, ExcelDateTime, Format, FormatAlign, FormatBorder, FormatPattern, Workbook, Worksheet,
    XlsxError,
};
use unicode_width::UnicodeWidthStr;

use super::model::{Cell, HEADERS};

const SHEET_NAME: &str = "Incidencias";
const DATE_FORMAT: &str = "dd/mm/yyyy";
const MONEY_FORMAT: &str = "#,##0.00";

/// Writes the header and rows into an in-memory workbook.
pub(crate) fn write_xlsx(rows: &[Vec<Cell>]) -> Result<Vec<u8>, String> {
    build_workbook(rows)
        .and_then(|mut workbook| workbook.save_to_buffer())
        .map_err(|e| e.to_string())
}

fn build_workbook(rows: &[Vec<Cell>]) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0x2F75B5))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_with_format(0, col as u16, *header, &header_format)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.width()).collect();

    for (index, cells) in rows.iter().enumerate() {
        let row = (index + 1) as u32;
        let band = if index % 2 == 0 {
            Color::RGB(0xEAF3FB)
        } else {
            Color::RGB(0xFFFFFF)
        };

        for (col, cell) in cells.iter().enumerate() {
            write_cell(worksheet, row, col as u16, cell, band)?;
            if let Some(width) = widths.get_mut(col) {
                *width = (*width).max(cell.to_text().width());
            }
        }
    }

    for (col, width) in widths.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width as f64 + 2.0)?;
    }

    Ok(workbook)
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    band: Color,
) -> Result<(), XlsxError> {
    let format = Format::new()
        .set_background_color(band)
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    match cell {
        Cell::Text(text) => {
            worksheet.write_with_format(row, col, text.as_str(), &format)?;
        }
        Cell::Quantity(value) => {
            let format = format.set_align(FormatAlign::Right);
            worksheet.write_with_format(row, col, value.to_f64().unwrap_or_default(), &format)?;
        }
        Cell::Money(value) => {
            let format = format
                .set_align(FormatAlign::Right)
                .set_num_format(MONEY_FORMAT);
            worksheet.write_with_format(row, col, value.to_f64().unwrap_or_default(), &format)?;
        }
        Cell::Date(date) => match excel_date(*date) {
            Some(datetime) => {
                let format = format.set_num_format(DATE_FORMAT);
                worksheet.write_with_format(row, col, &datetime, &format)?;
            }
            None => {
                worksheet.write_with_format(row, col, cell.to_text().as_str(), &format)?;
            }
        },
        Cell::Empty => {
            worksheet.write_blank(row, col, &format)?;
        }
    }
    Ok(())
}

/// The Excel date of `date`, or `None` outside the years Excel can hold.
fn excel_date(date: NaiveDate) -> Option<ExcelDateTime> {
    let year = u16::try_from(date.year()).ok()?;
    ExcelDateTime::from_ymd(year, date.month() as u8, date.day() as u8).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Data, Reader, Xlsx};
    use rust_decimal::Decimal;
    use std::io::Cursor;

    fn read_back(bytes: Vec<u8>) -> Vec<Vec<Data>> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        range.rows().map(|r| r.to_vec()).collect()
    }

    #[test]
    fn test_header_row_is_written() {
        let rows = read_back(write_xlsx(&[]).unwrap());

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], Data::String("Supervisor".to_string()));
        assert_eq!(rows[0].len(), HEADERS.len());
    }

    #[test]
    fn test_numeric_cells_are_typed() {
        let mut row = vec![Cell::Empty; HEADERS.len()];
        row[0] = Cell::Text("ANA".to_string());
        row[1] = Cell::Quantity(Decimal::from(8));
        row[2] = Cell::Money(Decimal::new(1066, 1));
        row[3] = Cell::Date(NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());

        let rows = read_back(write_xlsx(&[row]).unwrap());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0], Data::String("ANA".to_string()));
        assert_eq!(rows[1][1], Data::Float(8.0));
        assert_eq!(rows[1][2], Data::Float(106.6));
        assert!(matches!(rows[1][3], Data::DateTime(_)));
    }

    #[test]
    fn test_date_outside_excel_range_is_written_as_text() {
        let mut row = vec![Cell::Empty; HEADERS.len()];
        row[0] = Cell::Date(NaiveDate::from_ymd_opt(1850, 6, 1).unwrap());

        let rows = read_back(write_xlsx(&[row]).unwrap());

        assert_eq!(rows[1][0], Data::String("01/06/1850".to_string()));
    }
}
