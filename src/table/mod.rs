//! In-memory table view model.
//!
//! A [`Table`] holds the rows currently loaded for one record type. Each row
//! is bound to exactly one record identifier and carries the record's current
//! field values, the values derived from them, its visibility under the
//! active filter and its synchronization state.
//!
//! All changes to a row's record go through [`Row::set_record`], which
//! recomputes the derived values in the same step, so derived state is never
//! stale.

mod records;

pub use records::Alert;

use std::collections::HashMap;
use std::fmt;

use crate::models::Record;

/// A record type that can be shown in a table.
pub trait TableRecord: Record {
    /// Values computed from the record's fields (e.g. line total).
    type Derived: Clone + fmt::Debug + PartialEq;

    fn derive(&self) -> Self::Derived;

    /// Case-insensitive search; `needle` is already lowercased.
    fn matches(&self, needle: &str) -> bool;

    /// The table-wide alert banner for this record type, if any.
    fn alert(_rows: &[Row<Self>]) -> Option<Alert> {
        None
    }
}

/// Synchronization state of a single row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowState {
    /// Matches the last value confirmed by the store.
    Clean,
    /// Edited locally, no update issued yet.
    Editing,
    /// An update has been issued and has not settled.
    Pending,
    /// The last update failed; local values are kept until the user retries.
    Error(String),
}

impl fmt::Display for RowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowState::Clean => write!(f, "ok"),
            RowState::Editing => write!(f, "editing"),
            RowState::Pending => write!(f, "pending"),
            RowState::Error(e) => write!(f, "error: {}", e),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Row<R: TableRecord> {
    record: R,
    derived: R::Derived,
    confirmed: R,
    visible: bool,
    state: RowState,
    seq: u64,
}

impl<R: TableRecord> Row<R> {
    fn new(record: R, visible: bool) -> Self {
        Self {
            derived: record.derive(),
            confirmed: record.clone(),
            record,
            visible,
            state: RowState::Clean,
            seq: 0,
        }
    }

    pub fn id(&self) -> &str {
        self.record.id()
    }

    /// Current field values, including unconfirmed local edits.
    pub fn record(&self) -> &R {
        &self.record
    }

    pub fn derived(&self) -> &R::Derived {
        &self.derived
    }

    /// The last values the store acknowledged for this row.
    pub fn confirmed(&self) -> &R {
        &self.confirmed
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn state(&self) -> &RowState {
        &self.state
    }

    /// Sequence number of the most recently issued update (0 if none).
    pub fn latest_seq(&self) -> u64 {
        self.seq
    }

    /// Replaces the field values and recomputes derived values.
    ///
    /// The identifier is immutable: the replacement must carry the same id.
    pub(crate) fn set_record(&mut self, record: R) {
        debug_assert_eq!(record.id(), self.record.id());
        self.record = record;
        self.recompute();
    }

    /// Accepts a record acknowledged by the store.
    pub(crate) fn confirm(&mut self, record: R) {
        self.confirmed = record.clone();
        self.set_record(record);
        self.state = RowState::Clean;
    }

    pub(crate) fn set_state(&mut self, state: RowState) {
        self.state = state;
    }

    pub(crate) fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn recompute(&mut self) {
        self.derived = self.record.derive();
    }
}

/// The rows of one table, in insertion order.
#[derive(Debug, Clone)]
pub struct Table<R: TableRecord> {
    rows: Vec<Row<R>>,
    filter: Option<String>,
}

impl<R: TableRecord> Default for Table<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: TableRecord> Table<R> {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            filter: None,
        }
    }

    /// Appends a row for `record`, or replaces the row already bound to its id.
    ///
    /// The new row honors the active filter.
    pub fn add_row(&mut self, record: R) -> &Row<R> {
        let visible = self.is_match(&record);

        if let Some(index) = self.position(record.id()) {
            let row = &mut self.rows[index];
            row.confirm(record);
            row.visible = visible;
            return &self.rows[index];
        }

        self.rows.push(Row::new(record, visible));
        let last = self.rows.len() - 1;
        &self.rows[last]
    }

    /// Removes the row bound to `id`. Absent ids are a no-op.
    pub fn remove_row(&mut self, id: &str) -> Option<Row<R>> {
        self.position(id).map(|index| self.rows.remove(index))
    }

    /// Recomputes the derived values of one row from its current fields.
    pub fn recompute_row(&mut self, id: &str) -> Option<&R::Derived> {
        let row = self.get_mut(id)?;
        row.recompute();
        Some(&row.derived)
    }

    /// Mutates a row's record in place and recomputes its derived values.
    pub fn modify<F>(&mut self, id: &str, f: F) -> Option<&Row<R>>
    where
        F: FnOnce(&mut R),
    {
        let row = self.get_mut(id)?;
        let mut record = row.record.clone();
        f(&mut record);
        // the identifier never changes, whatever `f` did to it
        let record = R::from_draft(row.id().to_string(), record.to_draft());
        row.set_record(record);
        Some(&*row)
    }

    /// Sets row visibility by case-insensitive substring search.
    ///
    /// An empty (or whitespace-only) term shows every row.
    pub fn filter(&mut self, term: &str) {
        let term = term.trim().to_lowercase();
        self.filter = if term.is_empty() { None } else { Some(term) };

        for index in 0..self.rows.len() {
            let visible = self.is_match(&self.rows[index].record);
            self.rows[index].visible = visible;
        }
    }

    pub fn filter_term(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Replaces every row, keeping the active filter.
    ///
    /// Rows whose id survives keep their update sequence number, so a
    /// response to an update issued before the reload still counts as stale
    /// once a newer update is issued.
    pub fn replace_all(&mut self, records: Vec<R>) {
        let sequences: HashMap<String, u64> = self
            .rows
            .drain(..)
            .map(|row| (row.id().to_string(), row.seq))
            .collect();

        for record in records {
            let id = record.id().to_string();
            self.add_row(record);
            if let (Some(&seq), Some(row)) = (sequences.get(&id), self.get_mut(&id)) {
                row.seq = seq;
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Row<R>> {
        self.rows.iter().find(|row| row.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Row<R>> {
        self.rows.iter_mut().find(|row| row.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// All rows, including those hidden by the filter.
    pub fn rows(&self) -> &[Row<R>] {
        &self.rows
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &Row<R>> {
        self.rows.iter().filter(|row| row.visible)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The alert banner for the current rows.
    pub fn alert(&self) -> Option<Alert> {
        R::alert(&self.rows)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.id() == id)
    }

    fn is_match(&self, record: &R) -> bool {
        match &self.filter {
            Some(term) => record.matches(term),
            None => true,
        }
    }
}
