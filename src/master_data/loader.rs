//! Master workbook loading.
//!
//! This module provides the [`MasterDataLoader`] type, which reads the
//! employee, night-rate, centre and account sheets of the master workbook
//! with `calamine` and builds a [`MasterData`].

use calamine::{Data, Range, Reader, open_workbook_auto};
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::{
    AccountSheetLayout, CentreSheetLayout, EmployeeSheetLayout, MasterDataLayout,
    NightRateSheetLayout,
};
use crate::error::{EngineError, EngineResult};
use crate::models::{AccountCode, Centre, EmployeeRates, EmployeeRecord};

use super::normalize::{
    cell_to_code, cell_to_decimal, cell_to_string, derive_service, is_blank, normalize_header,
};
use super::types::MasterData;

/// One sheet as a header row plus data rows.
#[derive(Debug, Clone)]
pub struct SheetTable {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<Data>>,
}

impl SheetTable {
    /// Builds a table whose first row holds the headers.
    pub fn new(name: impl Into<String>, mut rows: Vec<Vec<Data>>) -> Self {
        let headers = if rows.is_empty() {
            Vec::new()
        } else {
            rows.remove(0)
                .iter()
                .map(|cell| normalize_header(&cell_to_string(cell)))
                .collect()
        };
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    fn from_range(name: &str, range: &Range<Data>) -> Self {
        Self::new(name, range.rows().map(<[Data]>::to_vec).collect())
    }

    fn column(&self, header: &str) -> Option<usize> {
        let wanted = normalize_header(header);
        if wanted.is_empty() {
            return None;
        }
        self.headers.iter().position(|h| *h == wanted)
    }

    fn require(&self, header: &str) -> EngineResult<usize> {
        self.column(header).ok_or_else(|| EngineError::MissingColumn {
            sheet: self.name.clone(),
            column: header.to_string(),
        })
    }

    /// Data rows with their 1-based spreadsheet row number.
    fn data_rows(&self) -> impl Iterator<Item = (usize, &[Data])> {
        self.rows
            .iter()
            .enumerate()
            .map(|(index, row)| (index + 2, row.as_slice()))
    }

    fn invalid(&self, row: usize, column: &str, message: String) -> EngineError {
        EngineError::InvalidMasterData {
            sheet: self.name.clone(),
            row,
            column: column.to_string(),
            message,
        }
    }
}

fn cell(row: &[Data], column: Option<usize>) -> &Data {
    static EMPTY: Data = Data::Empty;
    column.and_then(|c| row.get(c)).unwrap_or(&EMPTY)
}

/// Loads master data from a workbook.
///
/// # Sheets
///
/// - employees (required): name and hourly rate columns are required
/// - night rates (optional): (category, agreement) → premium
/// - centres (optional): code, name, supervisor
/// - accounts (optional): reason → account description
///
/// # Example
///
/// ```no_run
/// use incident_engine::config::MasterDataLayout;
/// use incident_engine::master_data::MasterDataLoader;
///
/// let master = MasterDataLoader::load("data/maestros.xlsx", &MasterDataLayout::default())?;
/// println!("{} employees", master.employee_count());
/// # Ok::<(), incident_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MasterDataLoader;

impl MasterDataLoader {
    /// Reads the workbook at `path` using `layout`.
    ///
    /// # Errors
    ///
    /// - `ConfigNotFound` if the file does not exist
    /// - `ConfigParseError` if the workbook cannot be opened or read
    /// - `MissingSheet` if the employee sheet is absent
    /// - `MissingColumn` if a required column is absent
    /// - `InvalidMasterData` if a rate cell is not a number
    pub fn load<P: AsRef<Path>>(path: P, layout: &MasterDataLayout) -> EngineResult<MasterData> {
        let path = path.as_ref();
        let path_str = path.display().to_string();
        let started = Instant::now();

        if !path.is_file() {
            return Err(EngineError::ConfigNotFound { path: path_str });
        }

        let mut workbook = open_workbook_auto(path).map_err(|e| EngineError::ConfigParseError {
            path: path_str.clone(),
            message: e.to_string(),
        })?;
        let sheet_names = workbook.sheet_names();

        let mut read_sheet = |sheet: &str| -> EngineResult<Option<SheetTable>> {
            if !sheet_names.iter().any(|name| name == sheet) {
                return Ok(None);
            }
            let range =
                workbook
                    .worksheet_range(sheet)
                    .map_err(|e| EngineError::ConfigParseError {
                        path: path_str.clone(),
                        message: format!("sheet '{}': {}", sheet, e),
                    })?;
            Ok(Some(SheetTable::from_range(sheet, &range)))
        };

        let employees_table =
            read_sheet(&layout.employees.sheet)?.ok_or_else(|| EngineError::MissingSheet {
                path: path_str.clone(),
                sheet: layout.employees.sheet.clone(),
            })?;
        let night_table = read_sheet(&layout.night_rates.sheet)?;
        let centre_table = read_sheet(&layout.centres.sheet)?;
        let account_table = read_sheet(&layout.accounts.sheet)?;

        let master = Self::from_tables(
            &employees_table,
            night_table.as_ref(),
            centre_table.as_ref(),
            account_table.as_ref(),
            layout,
        )?;

        info!(
            path = %path_str,
            employees = master.employee_count(),
            night_rates = master.night_rate_count(),
            centres = master.centres().count(),
            accounts = master.account_count(),
            duration_us = started.elapsed().as_micros() as u64,
            "Master data loaded"
        );

        Ok(master)
    }

    /// Builds master data from already-read sheets.
    pub fn from_tables(
        employees: &SheetTable,
        night_rates: Option<&SheetTable>,
        centres: Option<&SheetTable>,
        accounts: Option<&SheetTable>,
        layout: &MasterDataLayout,
    ) -> EngineResult<MasterData> {
        let employee_records = parse_employees(employees, &layout.employees)?;
        let centre_records = match centres {
            Some(table) => parse_centres(table, &layout.centres)?,
            None => {
                debug!(sheet = %layout.centres.sheet, "Centre sheet absent");
                Vec::new()
            }
        };

        let mut master = MasterData::new(employee_records, centre_records);

        if let Some(table) = night_rates {
            for (category, agreement, rate) in parse_night_rates(table, &layout.night_rates)? {
                master.insert_night_rate(&category, &agreement, rate);
            }
        }
        if let Some(table) = accounts {
            for (reason, account) in parse_accounts(table, &layout.accounts)? {
                master.insert_account(&reason, account);
            }
        }

        Ok(master)
    }
}

fn parse_employees(
    table: &SheetTable,
    layout: &EmployeeSheetLayout,
) -> EngineResult<Vec<EmployeeRecord>> {
    let name_col = table.require(&layout.name)?;
    let rate_col = table.require(&layout.hourly_rate)?;
    let night_col = table.column(&layout.night_premium);
    let transfer_col = table.column(&layout.transfer_unit_cost);
    let category_col = table.column(&layout.category);
    let agreement_col = table.column(&layout.agreement);
    let centre_col = table.column(&layout.home_centre);
    let supervisor_col = table.column(&layout.supervisor);
    let service_col = table.column(&layout.service);
    let contract_col = table.column(&layout.contract_percentage);
    let company_col = table.column(&layout.company_code);

    let decimal_at = |row_number: usize, row: &[Data], col: Option<usize>, header: &str| {
        cell_to_decimal(cell(row, col)).map_err(|msg| table.invalid(row_number, header, msg))
    };

    let mut records = Vec::new();
    for (row_number, row) in table.data_rows() {
        let name = cell_to_string(cell(row, Some(name_col)));
        if name.is_empty() {
            continue;
        }

        let Some(hourly_rate) = decimal_at(row_number, row, Some(rate_col), &layout.hourly_rate)?
        else {
            warn!(sheet = %table.name, row = row_number, employee = %name, "Employee without hourly rate skipped");
            continue;
        };
        let night_premium = decimal_at(row_number, row, night_col, &layout.night_premium)?;
        let transfer_unit_cost = decimal_at(
            row_number,
            row,
            transfer_col,
            &layout.transfer_unit_cost,
        )?
        .unwrap_or(hourly_rate);

        let mut record = EmployeeRecord::new(
            &name,
            EmployeeRates {
                hourly_rate,
                night_premium,
                transfer_unit_cost,
            },
        );
        record.category = cell_to_string(cell(row, category_col));
        record.agreement = cell_to_code(cell(row, agreement_col));
        record.home_centre = cell_to_code(cell(row, centre_col));
        record.supervisor = cell_to_string(cell(row, supervisor_col));
        record.service = cell_to_string(cell(row, service_col));
        if record.service.is_empty() {
            record.service = derive_service(&record.category).to_string();
        }
        record.contract_percentage = cell_to_string(cell(row, contract_col));
        record.company_code = cell_to_code(cell(row, company_col));

        records.push(record);
    }

    Ok(records)
}

fn parse_night_rates(
    table: &SheetTable,
    layout: &NightRateSheetLayout,
) -> EngineResult<Vec<(String, String, rust_decimal::Decimal)>> {
    let category_col = table.require(&layout.category)?;
    let agreement_col = table.require(&layout.agreement)?;
    let rate_col = table.require(&layout.rate)?;

    let mut rates = Vec::new();
    for (row_number, row) in table.data_rows() {
        let category = cell_to_string(cell(row, Some(category_col)));
        let agreement = cell_to_code(cell(row, Some(agreement_col)));
        if category.is_empty() || agreement.is_empty() {
            continue;
        }
        match cell_to_decimal(cell(row, Some(rate_col))) {
            Ok(Some(rate)) => rates.push((category, agreement, rate)),
            Ok(None) => {}
            Err(message) => {
                warn!(sheet = %table.name, row = row_number, error = %message, "Night rate row skipped");
            }
        }
    }
    Ok(rates)
}

fn parse_centres(table: &SheetTable, layout: &CentreSheetLayout) -> EngineResult<Vec<Centre>> {
    let code_col = table.require(&layout.code)?;
    let name_col = table.require(&layout.name)?;
    let supervisor_col = table.column(&layout.supervisor);
    let closed_col = table.column(&layout.closed_on);

    let excluded: Vec<&str> = layout
        .excluded_supervisors
        .iter()
        .map(|s| s.trim())
        .collect();

    let mut centres = Vec::new();
    for (_, row) in table.data_rows() {
        let code = cell_to_code(cell(row, Some(code_col)));
        if code.is_empty() || !is_blank(cell(row, closed_col)) {
            continue;
        }
        let supervisor = cell_to_string(cell(row, supervisor_col));
        if excluded.contains(&supervisor.as_str()) {
            continue;
        }
        centres.push(Centre {
            code,
            name: cell_to_string(cell(row, Some(name_col))),
            supervisor,
        });
    }
    Ok(centres)
}

fn parse_accounts(
    table: &SheetTable,
    layout: &AccountSheetLayout,
) -> EngineResult<Vec<(String, AccountCode)>> {
    let reason_col = table.require(&layout.reason)?;
    let account_col = table.require(&layout.account)?;

    Ok(table
        .data_rows()
        .filter_map(|(_, row)| {
            let reason = cell_to_string(cell(row, Some(reason_col)));
            let description = cell_to_string(cell(row, Some(account_col)));
            if reason.is_empty() {
                return None;
            }
            AccountCode::from_description(&description).map(|account| (reason, account))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_xlsxwriter::Workbook;
    use std::path::PathBuf;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn s(value: &str) -> Data {
        Data::String(value.to_string())
    }

    fn employee_table(rows: Vec<Vec<Data>>) -> SheetTable {
        let mut all = vec![vec![
            s("nombre_empleado"),
            s("coste\nhora"),
            s("cat_empleado"),
            s("cod_reg_convenio"),
            s("centro_preferente"),
        ]];
        all.extend(rows);
        SheetTable::new("Trabajadores", all)
    }

    fn layout_with_spaced_rate() -> MasterDataLayout {
        let mut layout = MasterDataLayout::default();
        layout.employees.hourly_rate = "coste hora".to_string();
        layout
    }

    #[test]
    fn test_parse_employees_normalizes_fields() {
        let table = employee_table(vec![vec![
            s(" ana garcía "),
            Data::Float(12.5),
            s("h ASL"),
            Data::Float(99100165012016.0),
            Data::Float(4021.0),
        ]]);

        let master =
            MasterDataLoader::from_tables(&table, None, None, None, &layout_with_spaced_rate())
                .unwrap();
        let ana = master.employee("ANA GARCÍA").unwrap();

        assert_eq!(ana.rates.hourly_rate, dec("12.5"));
        assert_eq!(ana.rates.transfer_unit_cost, dec("12.5"));
        assert_eq!(ana.rates.night_premium, None);
        assert_eq!(ana.agreement, "99100165012016");
        assert_eq!(ana.home_centre, "4021");
        assert_eq!(ana.service, "020 Limpieza");
    }

    #[test]
    fn test_rows_without_name_or_rate_are_skipped() {
        let table = employee_table(vec![
            vec![s(""), Data::Float(10.0)],
            vec![s("luis"), Data::Empty],
            vec![s("eva"), Data::Int(11)],
        ]);

        let master =
            MasterDataLoader::from_tables(&table, None, None, None, &layout_with_spaced_rate())
                .unwrap();

        assert_eq!(master.employee_names(), vec!["EVA"]);
    }

    #[test]
    fn test_non_numeric_rate_is_invalid_master_data() {
        let table = employee_table(vec![vec![s("eva"), s("diez")]]);

        let result =
            MasterDataLoader::from_tables(&table, None, None, None, &layout_with_spaced_rate());

        match result {
            Err(EngineError::InvalidMasterData { sheet, row, column, .. }) => {
                assert_eq!(sheet, "Trabajadores");
                assert_eq!(row, 2);
                assert_eq!(column, "coste hora");
            }
            other => panic!("Expected InvalidMasterData, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_required_column() {
        let table = SheetTable::new("Trabajadores", vec![vec![s("nombre_empleado")]]);

        let result =
            MasterDataLoader::from_tables(&table, None, None, None, &MasterDataLayout::default());

        match result {
            Err(EngineError::MissingColumn { sheet, column }) => {
                assert_eq!(sheet, "Trabajadores");
                assert_eq!(column, "coste_hora");
            }
            other => panic!("Expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_centres_skip_closed_and_excluded() {
        let employees = SheetTable::new(
            "Trabajadores",
            vec![vec![s("nombre_empleado"), s("coste_hora")]],
        );
        let centres = SheetTable::new(
            "Centros",
            vec![
                vec![
                    s("cod_centro_preferente"),
                    s("desc_centro_preferente"),
                    s("nombre_jefe_ope"),
                    s("fecha_baja_centro"),
                ],
                vec![Data::Float(4021.0), s("Hospital Norte"), s("Carlos Gil"), Data::Empty],
                vec![Data::Float(4022.0), s("Cerrado"), s("Carlos Gil"), s("2024-01-31")],
                vec![Data::Float(4023.0), s("Oficina"), s("Julio"), Data::Empty],
                vec![Data::Empty, s("Sin código"), s("Carlos Gil"), Data::Empty],
            ],
        );
        let mut layout = MasterDataLayout::default();
        layout.centres.excluded_supervisors = vec!["Julio".to_string()];

        let master =
            MasterDataLoader::from_tables(&employees, None, Some(&centres), None, &layout)
                .unwrap();
        let codes: Vec<&str> = master.centres().map(|c| c.code.as_str()).collect();

        assert_eq!(codes, vec!["4021"]);
    }

    #[test]
    fn test_night_rates_and_accounts_are_indexed() {
        let employees = SheetTable::new(
            "Trabajadores",
            vec![vec![s("nombre_empleado"), s("coste_hora")]],
        );
        let night = SheetTable::new(
            "tarifas_incidencias",
            vec![
                vec![s("Descripción"), s("cod_convenio"), s("tarifa_noct")],
                vec![s("asl"), s("9.9100165012016E13"), Data::Float(1.5)],
                vec![s("camarero"), s("123"), s("bad")],
            ],
        );
        let accounts = SheetTable::new(
            "cuenta_motivos",
            vec![
                vec![s("Motivo"), s("desc_cuenta")],
                vec![s("Festivo"), s("70/71 Festivos")],
                vec![s("Sustitución"), s("73 Plus sustitución")],
                vec![s("Dietas"), s("Otros gastos")],
            ],
        );

        let master = MasterDataLoader::from_tables(
            &employees,
            Some(&night),
            None,
            Some(&accounts),
            &MasterDataLayout::default(),
        )
        .unwrap();

        assert_eq!(master.night_rate("h ASL", "99100165012016"), Some(dec("1.5")));
        assert_eq!(master.night_rate_count(), 1);
        assert_eq!(master.account_for("Festivo"), AccountCode::Holidays);
        assert_eq!(master.account_for("Dietas"), AccountCode::Other);
        assert_eq!(master.account_count(), 2);
    }

    fn write_workbook(with_employee_sheet: bool) -> PathBuf {
        let path = std::env::temp_dir().join(format!("maestros-{}.xlsx", uuid::Uuid::new_v4()));
        let mut workbook = Workbook::new();

        let sheet = workbook.add_worksheet();
        if with_employee_sheet {
            sheet.set_name("Trabajadores").unwrap();
            sheet.write(0, 0, "nombre_empleado").unwrap();
            sheet.write(0, 1, "coste_hora").unwrap();
            sheet.write(0, 2, "coste_traslado").unwrap();
            sheet.write(1, 0, "ana").unwrap();
            sheet.write(1, 1, 10.0).unwrap();
            sheet.write(1, 2, 2.0).unwrap();
        } else {
            sheet.set_name("Otra").unwrap();
            sheet.write(0, 0, "x").unwrap();
        }

        workbook.save(&path).unwrap();
        path
    }

    #[test]
    fn test_load_workbook_from_disk() {
        let path = write_workbook(true);

        let master = MasterDataLoader::load(&path, &MasterDataLayout::default()).unwrap();
        let rates = master.rates_for("ana").unwrap();

        assert_eq!(rates.hourly_rate, dec("10"));
        assert_eq!(rates.transfer_unit_cost, dec("2"));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_missing_employee_sheet() {
        let path = write_workbook(false);

        let result = MasterDataLoader::load(&path, &MasterDataLayout::default());

        match result {
            Err(EngineError::MissingSheet { sheet, .. }) => assert_eq!(sheet, "Trabajadores"),
            other => panic!("Expected MissingSheet, got {:?}", other),
        }
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_missing_file() {
        let result = MasterDataLoader::load("/nonexistent/maestros.xlsx", &MasterDataLayout::default());

        assert!(matches!(result, Err(EngineError::ConfigNotFound { .. })));
    }
}
