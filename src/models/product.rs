use serde::{Deserialize, Serialize};
use std::fmt;

use super::Record;
use crate::pricing::{price_line, Pricing};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "quantidade")]
    pub quantity: u32,
    #[serde(rename = "preco")]
    pub price: f64,
    /// Percentage, 0-100.
    #[serde(rename = "desconto", default)]
    pub discount: f64,
}

/// Request body for `POST /api/produtos` and `PUT /api/produtos/:id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductDraft {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "quantidade")]
    pub quantity: u32,
    #[serde(rename = "preco")]
    pub price: f64,
    #[serde(rename = "desconto", default)]
    pub discount: f64,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, quantity: u32, price: f64) -> Self {
        Self {
            name: name.into(),
            quantity,
            price,
            discount: 0.0,
        }
    }

    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }
}

impl Product {
    pub fn pricing(&self) -> Pricing {
        price_line(self.price, self.quantity, self.discount)
    }
}

impl Record for Product {
    const COLLECTION: &'static str = "produtos";
    const KIND: &'static str = "product";

    type Draft = ProductDraft;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: ProductDraft) -> Self {
        Self {
            id,
            name: draft.name,
            quantity: draft.quantity,
            price: draft.price,
            discount: draft.discount,
        }
    }

    fn to_draft(&self) -> ProductDraft {
        ProductDraft {
            name: self.name.clone(),
            quantity: self.quantity,
            price: self.price,
            discount: self.discount,
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} x{} @ {:.2} (-{}%)",
            self.name, self.quantity, self.price, self.discount
        )
    }
}
