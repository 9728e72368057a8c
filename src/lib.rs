//! Estoque: inventory and client management.
//!
//! The library holds the record models, the table view model with its
//! derived values, the optimistic sync controller, the report exporter and
//! the record store server. The `estoque` and `estoque-server` binaries are
//! thin wrappers around it.

pub mod config;
pub mod db;
pub mod models;
pub mod pricing;
pub mod report;
pub mod server;
pub mod store;
pub mod sync;
pub mod table;
