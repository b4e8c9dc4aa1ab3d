//! Configuration types for the Incident Engine.
//!
//! This module contains the strongly-typed settings structures that are
//! deserialized from the YAML settings file. Every section has a default so
//! a partial file (or no file at all) still yields a usable configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::export::ExportFormat;

/// Column layout of the employee sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeeSheetLayout {
    /// Sheet name.
    pub sheet: String,
    /// Employee name column (the lookup key). Required.
    pub name: String,
    /// Hourly rate column. Required.
    pub hourly_rate: String,
    /// Per-employee night premium column.
    pub night_premium: String,
    /// Transfer unit cost column. Falls back to the hourly rate.
    pub transfer_unit_cost: String,
    /// Category column.
    pub category: String,
    /// Collective agreement code column.
    pub agreement: String,
    /// Home centre code column.
    pub home_centre: String,
    /// Supervisor column.
    pub supervisor: String,
    /// Service column.
    pub service: String,
    /// Contract percentage column.
    pub contract_percentage: String,
    /// Company code column.
    pub company_code: String,
}

impl Default for EmployeeSheetLayout {
    fn default() -> Self {
        Self {
            sheet: "Trabajadores".to_string(),
            name: "nombre_empleado".to_string(),
            hourly_rate: "coste_hora".to_string(),
            night_premium: "tarifa_noct".to_string(),
            transfer_unit_cost: "coste_traslado".to_string(),
            category: "cat_empleado".to_string(),
            agreement: "cod_reg_convenio".to_string(),
            home_centre: "centro_preferente".to_string(),
            supervisor: "nombre_jefe_ope".to_string(),
            service: "servicio".to_string(),
            contract_percentage: "porcen_contrato".to_string(),
            company_code: "cod_empresa".to_string(),
        }
    }
}

/// Column layout of the night-rate sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NightRateSheetLayout {
    /// Sheet name.
    pub sheet: String,
    /// Category description column.
    pub category: String,
    /// Agreement code column.
    pub agreement: String,
    /// Night premium column.
    pub rate: String,
}

impl Default for NightRateSheetLayout {
    fn default() -> Self {
        Self {
            sheet: "tarifas_incidencias".to_string(),
            category: "Descripción".to_string(),
            agreement: "cod_convenio".to_string(),
            rate: "tarifa_noct".to_string(),
        }
    }
}

/// Column layout of the centre sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CentreSheetLayout {
    /// Sheet name.
    pub sheet: String,
    /// Centre code column.
    pub code: String,
    /// Centre name column.
    pub name: String,
    /// Supervisor column.
    pub supervisor: String,
    /// Closing date column; rows with a value here are dropped.
    pub closed_on: String,
    /// Supervisors whose centres are ignored.
    pub excluded_supervisors: Vec<String>,
}

impl Default for CentreSheetLayout {
    fn default() -> Self {
        Self {
            sheet: "Centros".to_string(),
            code: "cod_centro_preferente".to_string(),
            name: "desc_centro_preferente".to_string(),
            supervisor: "nombre_jefe_ope".to_string(),
            closed_on: "fecha_baja_centro".to_string(),
            excluded_supervisors: Vec::new(),
        }
    }
}

/// Column layout of the reason-to-account sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountSheetLayout {
    /// Sheet name.
    pub sheet: String,
    /// Reason column.
    pub reason: String,
    /// Account description column.
    pub account: String,
}

impl Default for AccountSheetLayout {
    fn default() -> Self {
        Self {
            sheet: "cuenta_motivos".to_string(),
            reason: "Motivo".to_string(),
            account: "desc_cuenta".to_string(),
        }
    }
}

/// Sheet and column names of the master workbook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MasterDataLayout {
    /// Employee sheet layout.
    pub employees: EmployeeSheetLayout,
    /// Night-rate sheet layout.
    pub night_rates: NightRateSheetLayout,
    /// Centre sheet layout.
    pub centres: CentreSheetLayout,
    /// Account sheet layout.
    pub accounts: AccountSheetLayout,
}

/// Where the master workbook lives and how it is laid out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MasterDataSettings {
    /// Path to the master workbook.
    pub path: PathBuf,
    /// Sheet and column names.
    #[serde(flatten)]
    pub layout: MasterDataLayout,
}

impl Default for MasterDataSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/maestros.xlsx"),
            layout: MasterDataLayout::default(),
        }
    }
}

/// Pricing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingSettings {
    /// Employer social-security rate applied on top of the simple cost
    /// (0.3195 means +31.95%).
    pub social_security_rate: Decimal,
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            social_security_rate: Decimal::new(3195, 4),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Address the server binds to.
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8501".to_string(),
        }
    }
}

/// Export and listing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Format used when a request does not name one.
    pub default_format: ExportFormat,
    /// File name stem of downloaded reports.
    pub file_stem: String,
    /// Page size used when listing incidents.
    pub rows_per_page: usize,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            default_format: ExportFormat::Xlsx,
            file_stem: "incidencias".to_string(),
            rows_per_page: 20,
        }
    }
}

/// The complete engine settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Master workbook settings.
    pub master_data: MasterDataSettings,
    /// Pricing parameters.
    pub pricing: PricingSettings,
    /// HTTP server settings.
    pub server: ServerSettings,
    /// Export settings.
    pub export: ExportSettings,
}
