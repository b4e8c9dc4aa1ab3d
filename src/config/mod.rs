//! Configuration loading and management for the Incident Engine.
//!
//! This module loads engine settings from YAML: where the master workbook
//! lives and how its sheets are laid out, the social-security rate used for
//! pricing, the server bind address and export defaults.
//!
//! # Example
//!
//! ```no_run
//! use incident_engine::config::SettingsLoader;
//!
//! let settings = SettingsLoader::load("./config/settings.yaml").unwrap();
//! println!("Social security: {}", settings.pricing.social_security_rate);
//! ```

mod loader;
mod types;

pub use loader::{BIND_ENV, MASTER_FILE_ENV, SettingsLoader};
pub use types::{
    AccountSheetLayout, CentreSheetLayout, EmployeeSheetLayout, ExportSettings, MasterDataLayout,
    MasterDataSettings, NightRateSheetLayout, PricingSettings, ServerSettings, Settings,
};
