//! Master data: the reference workbook of employees, night premiums,
//! centres and payroll accounts.
//!
//! [`MasterDataLoader`] reads the workbook, [`MasterData`] answers lookups,
//! and [`MasterDataCache`] memoizes the loaded snapshot with explicit
//! invalidation.

mod cache;
mod loader;
mod normalize;
mod types;

pub use cache::MasterDataCache;
pub use loader::{MasterDataLoader, SheetTable};
pub use normalize::{
    CATERING_SERVICE, CLEANING_SERVICE, derive_service, normalize_category, normalize_code,
};
pub use types::MasterData;
