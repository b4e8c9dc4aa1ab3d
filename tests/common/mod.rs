//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use rust_xlsxwriter::{Workbook, Worksheet};

use incident_engine::api::AppState;
use incident_engine::config::{MasterDataLayout, Settings};
use incident_engine::master_data::MasterDataCache;

/// A master workbook on disk, removed when dropped.
pub struct FixtureWorkbook {
    pub path: PathBuf,
}

impl Drop for FixtureWorkbook {
    fn drop(&mut self) {
        std::fs::remove_file(&self.path).ok();
    }
}

fn header(sheet: &mut Worksheet, names: &[&str]) {
    for (col, name) in names.iter().enumerate() {
        sheet.write(0, col as u16, *name).unwrap();
    }
}

/// Writes a workbook with three employees, two open centres, one closed
/// centre, one night premium and two account mappings.
///
/// | employee   | rate | transfer | category | agreement      | centre |
/// |------------|------|----------|----------|----------------|--------|
/// | ANA GARCÍA | 10   | 2        | h ASL    | 99100165012016 | 4021   |
/// | LUIS PÉREZ | 12   | (rate)   | Camarero | 123            | 4021   |
/// | EVA RUIZ   | 9.5  | 1        | h ASL    | 99100165012016 | 5010   |
pub fn write_master_workbook() -> FixtureWorkbook {
    let path = std::env::temp_dir().join(format!("maestros-{}.xlsx", uuid::Uuid::new_v4()));
    let mut workbook = Workbook::new();

    let employees = workbook.add_worksheet();
    employees.set_name("Trabajadores").unwrap();
    header(
        employees,
        &[
            "nombre_empleado",
            "coste_hora",
            "coste_traslado",
            "cat_empleado",
            "cod_reg_convenio",
            "centro_preferente",
        ],
    );
    let rows: [(&str, f64, Option<f64>, &str, f64, f64); 3] = [
        ("Ana García", 10.0, Some(2.0), "h ASL", 99100165012016.0, 4021.0),
        ("Luis Pérez", 12.0, None, "Camarero", 123.0, 4021.0),
        ("eva ruiz", 9.5, Some(1.0), "h ASL", 99100165012016.0, 5010.0),
    ];
    for (i, (name, rate, transfer, category, agreement, centre)) in rows.iter().enumerate() {
        let row = (i + 1) as u32;
        employees.write(row, 0, *name).unwrap();
        employees.write(row, 1, *rate).unwrap();
        if let Some(transfer) = transfer {
            employees.write(row, 2, *transfer).unwrap();
        }
        employees.write(row, 3, *category).unwrap();
        employees.write(row, 4, *agreement).unwrap();
        employees.write(row, 5, *centre).unwrap();
    }

    let night = workbook.add_worksheet();
    night.set_name("tarifas_incidencias").unwrap();
    header(night, &["Descripción", "cod_convenio", "tarifa_noct"]);
    night.write(1, 0, "ASL").unwrap();
    night.write(1, 1, "9.9100165012016E13").unwrap();
    night.write(1, 2, 1.5).unwrap();

    let centres = workbook.add_worksheet();
    centres.set_name("Centros").unwrap();
    header(
        centres,
        &[
            "cod_centro_preferente",
            "desc_centro_preferente",
            "nombre_jefe_ope",
            "fecha_baja_centro",
        ],
    );
    centres.write(1, 0, 4021.0).unwrap();
    centres.write(1, 1, "Hospital Norte").unwrap();
    centres.write(1, 2, "Carlos Gil").unwrap();
    centres.write(2, 0, 5010.0).unwrap();
    centres.write(2, 1, "Colegio Sur").unwrap();
    centres.write(2, 2, "Marta Ruiz").unwrap();
    centres.write(3, 0, 6000.0).unwrap();
    centres.write(3, 1, "Cerrado").unwrap();
    centres.write(3, 2, "Carlos Gil").unwrap();
    centres.write(3, 3, "2024-12-31").unwrap();

    let accounts = workbook.add_worksheet();
    accounts.set_name("cuenta_motivos").unwrap();
    header(accounts, &["Motivo", "desc_cuenta"]);
    accounts.write(1, 0, "Sustitución").unwrap();
    accounts.write(1, 1, "73 Plus sustitución").unwrap();
    accounts.write(2, 0, "Festivo").unwrap();
    accounts.write(2, 1, "70/71 Festivos").unwrap();

    workbook.save(&path).unwrap();
    FixtureWorkbook { path }
}

/// Settings pointing at `workbook` with a 0.3 social-security rate.
pub fn settings_for(workbook: &FixtureWorkbook) -> Settings {
    let mut settings = Settings::default();
    settings.master_data.path = workbook.path.clone();
    settings.pricing.social_security_rate = rust_decimal::Decimal::new(3, 1);
    settings
}

/// Application state backed by `workbook`.
pub fn state_for(workbook: &FixtureWorkbook) -> AppState {
    let settings = settings_for(workbook);
    let cache = MasterDataCache::new(workbook.path.clone(), MasterDataLayout::default());
    AppState::new(settings, cache)
}
