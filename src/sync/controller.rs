//! Optimistic synchronization between a table and the record store.
//!
//! Per-row state machine:
//!
//! ```text
//! Clean --edit_row--> Editing --issue_update--> Pending --settle(ok)--> Clean
//!                                                  \----settle(err)--> Error
//! ```
//!
//! Edits are applied to the row before the store confirms them and are kept
//! if the store call fails. Every issued update carries a per-row sequence
//! number; only the response to the latest one may change the row, so an
//! older response that arrives late cannot overwrite a newer edit.

use std::fmt;

use super::error::SyncError;
use super::forms::{Field, Form, ProductEdit};
use crate::models::{Product, Record};
use crate::store::{RecordStore, StoreError};
use crate::table::{Row, RowState, Table, TableRecord};

/// Non-error messages for the operator.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// Negative inputs were replaced by zero before saving.
    Clamped { id: String, fields: Vec<Field> },
    /// A delete found the record already gone; the row was removed anyway.
    AlreadyDeleted { kind: &'static str, id: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Clamped { id, fields } => {
                let names: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
                write!(
                    f,
                    "Negative values are not allowed; set {} to 0 for {}",
                    names.join(", "),
                    id
                )
            }
            Notice::AlreadyDeleted { kind, id } => {
                write!(f, "{} {} was already deleted", kind, id)
            }
        }
    }
}

/// An update that has been issued but not settled.
#[derive(Debug, Clone)]
pub struct PendingUpdate<R: Record> {
    pub id: String,
    pub seq: u64,
    /// Full field set sent to the store.
    pub draft: R::Draft,
}

/// How an update response was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// The store's record replaced the row's values.
    Applied,
    /// A newer update was issued for the row; this response was ignored.
    Stale,
    /// The row was removed while the update was in flight.
    Orphaned,
}

/// How a delete completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deleted {
    Removed,
    /// The store had no such record (404); treated as success.
    AlreadyGone,
}

/// Mediates operator actions on one table.
pub struct SyncController<S, R: TableRecord> {
    store: S,
    table: Table<R>,
    notices: Vec<Notice>,
}

impl<S: RecordStore, R: TableRecord> SyncController<S, R> {
    pub fn new(store: S, table: Table<R>) -> Self {
        Self {
            store,
            table,
            notices: Vec::new(),
        }
    }

    pub fn table(&self) -> &Table<R> {
        &self.table
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_table(self) -> Table<R> {
        self.table
    }

    /// Sets row visibility; see [`Table::filter`].
    pub fn filter(&mut self, term: &str) {
        self.table.filter(term);
    }

    /// Returns and clears the accumulated notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Replaces the table contents with every record in the store.
    ///
    /// On failure the table is left as it was.
    pub async fn load(&mut self) -> Result<usize, SyncError> {
        let records = self
            .store
            .list::<R>()
            .await
            .map_err(|e| self.failed("load", e))?;

        let count = records.len();
        self.table.replace_all(records);
        tracing::debug!("Loaded {} {} row(s)", count, R::KIND);
        Ok(count)
    }

    /// Validates `form`, creates the record and adds a row for it.
    ///
    /// Invalid input makes no store call. On store failure no row is added.
    pub async fn create<F>(&mut self, form: F) -> Result<&Row<R>, SyncError>
    where
        F: Form<Draft = R::Draft>,
    {
        let draft = form.validate().map_err(|e| {
            tracing::info!("Rejected {} input: {}", R::KIND, e);
            SyncError::Validation(e)
        })?;

        let record = self
            .store
            .create::<R>(&draft)
            .await
            .map_err(|e| self.failed("create", e))?;

        tracing::info!("Created {} {}", R::KIND, record.id());
        Ok(self.table.add_row(record))
    }

    /// Deletes the record bound to `id`, removing its row once the store
    /// acknowledges.
    ///
    /// A 404 counts as success. Any other failure leaves the row in place.
    pub async fn delete(&mut self, id: &str) -> Result<Deleted, SyncError> {
        if let Some(row) = self.table.get_mut(id) {
            row.set_state(RowState::Pending);
        }

        match self.store.delete::<R>(id).await {
            Ok(()) => {
                self.table.remove_row(id);
                tracing::info!("Deleted {} {}", R::KIND, id);
                Ok(Deleted::Removed)
            }
            Err(StoreError::NotFound { .. }) => {
                self.table.remove_row(id);
                tracing::info!("{} {} was already deleted", R::KIND, id);
                self.notices.push(Notice::AlreadyDeleted {
                    kind: R::KIND,
                    id: id.to_string(),
                });
                Ok(Deleted::AlreadyGone)
            }
            Err(e) => {
                let error = self.failed("delete", e);
                if let Some(row) = self.table.get_mut(id) {
                    row.set_state(RowState::Error(error.to_string()));
                }
                Err(error)
            }
        }
    }

    /// Moves an edited row to `Pending` and tags the update with a fresh
    /// sequence number.
    pub fn issue_update(&mut self, id: &str) -> Result<PendingUpdate<R>, SyncError> {
        let row = self.row_mut(id)?;
        let seq = row.next_seq();
        row.set_state(RowState::Pending);

        Ok(PendingUpdate {
            id: id.to_string(),
            seq,
            draft: row.record().to_draft(),
        })
    }

    /// Applies the store's answer to an issued update.
    ///
    /// Only the latest issued update may change the row. Failures are
    /// returned even when stale; a stale failure leaves the row untouched.
    pub fn settle_update(
        &mut self,
        pending: &PendingUpdate<R>,
        result: Result<R, StoreError>,
    ) -> Result<Settled, SyncError> {
        let Some(row) = self.table.get_mut(&pending.id) else {
            tracing::debug!("{} {} removed before its update settled", R::KIND, pending.id);
            return match result {
                Ok(_) => Ok(Settled::Orphaned),
                Err(e) => Err(self.failed("update", e)),
            };
        };

        if pending.seq != row.latest_seq() {
            tracing::debug!(
                "Discarding stale response for {} {} (seq {}, latest {})",
                R::KIND,
                pending.id,
                pending.seq,
                row.latest_seq()
            );
            return match result {
                Ok(_) => Ok(Settled::Stale),
                Err(e) => Err(self.failed("update", e)),
            };
        }

        match result {
            Ok(record) => {
                // the row keeps its identifier whatever the response says
                row.confirm(R::from_draft(pending.id.clone(), record.to_draft()));
                Ok(Settled::Applied)
            }
            Err(e) => {
                let error = SyncError::from_store("update", R::KIND, e);
                row.set_state(RowState::Error(error.to_string()));
                tracing::warn!("{}", error);
                Err(error)
            }
        }
    }

    /// Sends the row's current values to the store and settles the answer.
    pub async fn push_update(&mut self, id: &str) -> Result<Settled, SyncError> {
        let pending = self.issue_update(id)?;
        let result = self.store.update::<R>(&pending.id, &pending.draft).await;
        self.settle_update(&pending, result)
    }

    fn row_mut(&mut self, id: &str) -> Result<&mut Row<R>, SyncError> {
        self.table
            .get_mut(id)
            .ok_or_else(|| SyncError::UnknownRow {
                kind: R::KIND,
                id: id.to_string(),
            })
    }

    fn failed(&self, action: &'static str, error: StoreError) -> SyncError {
        let error = SyncError::from_store(action, R::KIND, error);
        tracing::warn!("{}", error);
        error
    }
}

impl<S: RecordStore> SyncController<S, Product> {
    /// Applies an inline edit to a product row without contacting the store.
    ///
    /// Negative inputs are clamped to zero and reported as a notice. A
    /// quantity too large to store fails validation and leaves the row as it
    /// was. The row's total and low-stock flag are recomputed immediately.
    pub fn edit_row(&mut self, id: &str, edit: &ProductEdit) -> Result<Vec<Field>, SyncError> {
        let clamped = edit.clamp()?;

        self.row_mut(id)?;
        self.table.modify(id, |product| {
            if let Some(quantity) = clamped.quantity {
                product.quantity = quantity;
            }
            if let Some(price) = clamped.price {
                product.price = price;
            }
            if let Some(discount) = clamped.discount {
                product.discount = discount;
            }
        });
        self.row_mut(id)?.set_state(RowState::Editing);

        if !clamped.clamped.is_empty() {
            self.notices.push(Notice::Clamped {
                id: id.to_string(),
                fields: clamped.clamped.clone(),
            });
        }

        Ok(clamped.clamped)
    }

    /// Edits a product row and persists the result.
    ///
    /// The edit stays applied locally even if the store call fails.
    pub async fn update(&mut self, id: &str, edit: &ProductEdit) -> Result<Settled, SyncError> {
        self.edit_row(id, edit)?;
        self.push_update(id).await
    }
}
