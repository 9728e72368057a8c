//! Sync controller: operator edits → optimistic table update → record store.
//!
//! # Usage
//!
//! ```no_run
//! use estoque::store::HttpRecordStore;
//! use estoque::sync::{ProductEdit, ProductForm, SyncController};
//! use estoque::table::Table;
//!
//! # async fn demo() -> Result<(), estoque::sync::SyncError> {
//! let store = HttpRecordStore::new("http://localhost:8080");
//! let mut products = SyncController::new(store, Table::new());
//! products.load().await?;
//!
//! let id = products
//!     .create(ProductForm {
//!         name: "Caneta".into(),
//!         quantity: Some(5),
//!         price: Some(2.0),
//!         discount: None,
//!     })
//!     .await?
//!     .id()
//!     .to_string();
//!
//! products.update(&id, &ProductEdit::default().quantity(20)).await?;
//! products.delete(&id).await?;
//! # Ok(())
//! # }
//! ```

mod controller;
mod error;
mod forms;

#[cfg(test)]
mod fake;
#[cfg(test)]
mod tests;

pub use controller::{Deleted, Notice, PendingUpdate, Settled, SyncController};
pub use error::{SyncError, ValidationError};
pub use forms::{ClientForm, Field, Form, ProductEdit, ProductForm, UserForm};
