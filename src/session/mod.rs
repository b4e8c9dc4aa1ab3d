//! Sessions: the ordered incident rows a supervisor is working on.
//!
//! - [`IncidentStore`] - ordered rows with append, edit, delete and paging
//! - [`SessionContext`] - one session's id, payroll month and store
//! - [`SessionRegistry`] - the open sessions of the HTTP service

mod context;
mod registry;
mod store;

pub use context::{MAX_BULK_ROWS, SessionContext};
pub use registry::SessionRegistry;
pub use store::{IncidentStore, Page};
