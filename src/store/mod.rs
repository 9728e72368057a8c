//! Client side of the record store.
//!
//! [`RecordStore`] is the seam between the sync controller and the network:
//! [`HttpRecordStore`] talks to the REST API, tests plug in an in-memory fake.

mod http;

pub use http::HttpRecordStore;

use thiserror::Error;

use crate::models::Record;

/// Errors returned by a record store call.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// The request never produced a response (connection refused, reset, ...).
    #[error("Network error: {0}")]
    Network(String),
    /// 404 on update or delete.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    /// 400: the store refused the payload.
    #[error("Rejected by server: {0}")]
    Rejected(String),
    /// Any other non-success status.
    #[error("Server returned status {status}: {message}")]
    Server { status: u16, message: String },
    /// The response body could not be decoded.
    #[error("Invalid response: {0}")]
    Decode(String),
}

/// CRUD operations on the record store, per record type.
///
/// Calls run to completion; there is no cancellation and no timeout.
#[allow(async_fn_in_trait)]
pub trait RecordStore {
    async fn list<R: Record>(&self) -> Result<Vec<R>, StoreError>;

    async fn create<R: Record>(&self, draft: &R::Draft) -> Result<R, StoreError>;

    /// Replaces every field of the record bound to `id`.
    async fn update<R: Record>(&self, id: &str, draft: &R::Draft) -> Result<R, StoreError>;

    async fn delete<R: Record>(&self, id: &str) -> Result<(), StoreError>;
}

impl<S: RecordStore> RecordStore for &S {
    async fn list<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        (**self).list::<R>().await
    }

    async fn create<R: Record>(&self, draft: &R::Draft) -> Result<R, StoreError> {
        (**self).create::<R>(draft).await
    }

    async fn update<R: Record>(&self, id: &str, draft: &R::Draft) -> Result<R, StoreError> {
        (**self).update::<R>(id, draft).await
    }

    async fn delete<R: Record>(&self, id: &str) -> Result<(), StoreError> {
        (**self).delete::<R>(id).await
    }
}
