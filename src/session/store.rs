//! The ordered incident store of one session.

use std::collections::BTreeSet;

use crate::error::{EngineError, EngineResult};
use crate::models::Incident;

/// Ordered incident rows of one session.
///
/// Insertion order is preserved by every operation. Rows are validated
/// before they are stored; a rejected row leaves the store untouched.
///
/// # Example
///
/// ```
/// use incident_engine::models::Incident;
/// use incident_engine::session::IncidentStore;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
/// let mut store = IncidentStore::new();
/// store.append(Incident::new("ANA", date))?;
/// store.append(Incident::new("LUIS", date))?;
/// store.remove(0)?;
///
/// assert_eq!(store.list()[0].employee, "LUIS");
/// # Ok::<(), incident_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncidentStore {
    rows: Vec<Incident>,
}

/// One page of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a> {
    /// 1-based page number actually returned.
    pub page: usize,
    /// Total number of pages (at least 1).
    pub total_pages: usize,
    /// Index of the first row of the page within the store.
    pub offset: usize,
    /// The rows of the page.
    pub rows: &'a [Incident],
}

impl IncidentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row at the end.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIncident` when the row fails validation.
    pub fn append(&mut self, row: Incident) -> EngineResult<usize> {
        row.validate()?;
        self.rows.push(row);
        Ok(self.rows.len() - 1)
    }

    /// Appends every row, or none of them if any row is invalid.
    pub fn extend(&mut self, rows: Vec<Incident>) -> EngineResult<usize> {
        for row in &rows {
            row.validate()?;
        }
        let added = rows.len();
        self.rows.extend(rows);
        Ok(added)
    }

    /// Replaces the row at `index`.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` for an unknown index and `InvalidIncident`
    /// for an invalid row.
    pub fn update(&mut self, index: usize, row: Incident) -> EngineResult<()> {
        self.check_index(index)?;
        row.validate()?;
        self.rows[index] = row;
        Ok(())
    }

    /// Removes the row at `index`; later rows shift down by one.
    pub fn remove(&mut self, index: usize) -> EngineResult<Incident> {
        self.check_index(index)?;
        Ok(self.rows.remove(index))
    }

    /// Removes every row whose index is listed. Duplicate indices are
    /// ignored; any unknown index rejects the whole call.
    pub fn remove_many(&mut self, indices: &[usize]) -> EngineResult<usize> {
        let selected: BTreeSet<usize> = indices.iter().copied().collect();
        if let Some(&index) = selected.iter().next_back() {
            self.check_index(index)?;
        }

        let mut position = 0;
        self.rows.retain(|_| {
            let keep = !selected.contains(&position);
            position += 1;
            keep
        });
        Ok(selected.len())
    }

    /// Removes every row and returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let removed = self.rows.len();
        self.rows.clear();
        removed
    }

    /// The row at `index`.
    pub fn get(&self, index: usize) -> EngineResult<&Incident> {
        self.check_index(index)?;
        Ok(&self.rows[index])
    }

    /// All rows in insertion order.
    pub fn list(&self) -> &[Incident] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the store holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns page `page` (1-based) of `per_page` rows.
    ///
    /// Page numbers are clamped to the valid range, so an empty store yields
    /// page 1 of 1 with no rows.
    pub fn page(&self, page: usize, per_page: usize) -> Page<'_> {
        let per_page = per_page.max(1);
        let total_pages = self.rows.len().div_ceil(per_page).max(1);
        let page = page.clamp(1, total_pages);
        let offset = (page - 1) * per_page;
        let end = (offset + per_page).min(self.rows.len());
        Page {
            page,
            total_pages,
            offset,
            rows: &self.rows[offset.min(end)..end],
        }
    }

    fn check_index(&self, index: usize) -> EngineResult<()> {
        if index < self.rows.len() {
            Ok(())
        } else {
            Err(EngineError::IndexOutOfRange {
                index,
                len: self.rows.len(),
            })
        }
    }
}
