//! Per-session context.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::master_data::MasterData;
use crate::models::Incident;

use super::store::IncidentStore;

/// Most rows one bulk add for an employee may create.
pub const MAX_BULK_ROWS: usize = 10;

/// Everything one supervisor session owns.
///
/// A context is never shared between sessions; it is passed explicitly to
/// every operation that reads or changes the session.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Session id.
    pub id: Uuid,
    /// When the session was opened.
    pub created_at: DateTime<Utc>,
    /// Payroll month stamped on rows added through the helpers.
    pub payroll_month: String,
    /// Supervisor the session is filtered to, if any.
    pub supervisor: Option<String>,
    /// The session's rows.
    pub store: IncidentStore,
}

impl SessionContext {
    /// Opens an empty session.
    pub fn new(payroll_month: impl Into<String>, supervisor: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            payroll_month: payroll_month.into(),
            supervisor: supervisor.filter(|s| !s.trim().is_empty()),
            store: IncidentStore::new(),
        }
    }

    /// Adds `count` rows prefilled from `employee`'s master record.
    ///
    /// # Errors
    ///
    /// Returns `EmployeeNotFound` for an unknown employee and
    /// `InvalidIncident` when `count` is zero or above [`MAX_BULK_ROWS`].
    pub fn add_for_employee(
        &mut self,
        master: &MasterData,
        employee: &str,
        date: NaiveDate,
        count: usize,
        destination: Option<&str>,
    ) -> EngineResult<usize> {
        if count == 0 {
            return Err(EngineError::invalid_incident(
                "count",
                "at least one row must be added",
            ));
        }
        if count > MAX_BULK_ROWS {
            return Err(EngineError::invalid_incident(
                "count",
                format!("at most {} rows can be added at once, got {}", MAX_BULK_ROWS, count),
            ));
        }
        let record = master.employee(employee)?;
        let rows = (0..count)
            .map(|_| self.prefilled(Incident::for_employee(record, date, destination)))
            .collect();
        self.store.extend(rows)
    }

    /// Adds one prefilled row for every employee whose home centre is
    /// `centre`. Returns the number of rows added, zero for a centre
    /// without employees.
    pub fn add_for_centre(
        &mut self,
        master: &MasterData,
        centre: &str,
        date: NaiveDate,
        destination: Option<&str>,
    ) -> EngineResult<usize> {
        let rows = master
            .employees_by_centre(centre)
            .into_iter()
            .map(|record| self.prefilled(Incident::for_employee(record, date, destination)))
            .collect();
        self.store.extend(rows)
    }

    fn prefilled(&self, mut incident: Incident) -> Incident {
        incident.payroll_month = self.payroll_month.clone();
        incident
    }
}
