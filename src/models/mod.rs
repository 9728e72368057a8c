mod client;
mod product;
mod user;

pub use client::{Client, ClientDraft};
pub use product::{Product, ProductDraft};
pub use user::{User, UserDraft};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// A record type persisted by the record store.
///
/// The store assigns the identifier; a `Draft` is the same record without it,
/// which is what create and update calls send.
pub trait Record: Clone + fmt::Debug + Serialize + DeserializeOwned {
    /// Path segment under `/api/`, e.g. `produtos`.
    const COLLECTION: &'static str;
    /// Human-readable name used in messages.
    const KIND: &'static str;

    type Draft: Clone + fmt::Debug + Serialize + DeserializeOwned;

    fn id(&self) -> &str;

    /// Binds a store-assigned identifier to a draft.
    fn from_draft(id: String, draft: Self::Draft) -> Self;

    /// The full field set, as sent on update.
    fn to_draft(&self) -> Self::Draft;
}
