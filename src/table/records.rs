use std::fmt;

use super::{Row, TableRecord};
use crate::models::{Client, Product, User};
use crate::pricing::Pricing;

/// Table-wide banner shown above a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alert {
    /// At least one visible product is below the low-stock threshold.
    LowStock,
    /// The client table is empty.
    NoClients,
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alert::LowStock => write!(f, "Warning: low stock"),
            Alert::NoClients => write!(f, "No clients registered."),
        }
    }
}

impl TableRecord for Product {
    type Derived = Pricing;

    fn derive(&self) -> Pricing {
        self.pricing()
    }

    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
    }

    fn alert(rows: &[Row<Self>]) -> Option<Alert> {
        rows.iter()
            .any(|row| row.is_visible() && row.derived().low_stock)
            .then_some(Alert::LowStock)
    }
}

impl TableRecord for Client {
    type Derived = ();

    fn derive(&self) {}

    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.cpf.to_lowercase().contains(needle)
    }

    fn alert(rows: &[Row<Self>]) -> Option<Alert> {
        rows.is_empty().then_some(Alert::NoClients)
    }
}

impl TableRecord for User {
    type Derived = ();

    fn derive(&self) {}

    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.cpf.to_lowercase().contains(needle)
    }
}
