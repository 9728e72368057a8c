//! Sync error types.

use thiserror::Error;

use crate::store::StoreError;

/// Input rejected before any network call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all required fields (missing: {})", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("Values cannot be negative: {}", .0.join(", "))]
    Negative(Vec<&'static str>),
    #[error("Values are too large: {}", .0.join(", "))]
    OutOfRange(Vec<&'static str>),
}

/// Errors surfaced to the operator by the sync controller.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SyncError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The store answered 404 for a keyed call.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    /// Network failure or non-success status.
    #[error("Failed to {action} {kind}: {source}")]
    Store {
        action: &'static str,
        kind: &'static str,
        #[source]
        source: StoreError,
    },
    /// No row in the table is bound to this id.
    #[error("No {kind} with id {id} in the table")]
    UnknownRow { kind: &'static str, id: String },
}

impl SyncError {
    /// Wraps a store failure, keeping 404s distinct from generic failures.
    pub fn from_store(action: &'static str, kind: &'static str, error: StoreError) -> Self {
        match error {
            StoreError::NotFound { kind, id } => SyncError::NotFound { kind, id },
            source => SyncError::Store {
                action,
                kind,
                source,
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SyncError::NotFound { .. })
    }
}
