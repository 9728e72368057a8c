//! Operator input for creates and edits.
//!
//! Forms carry raw input where a field may be left empty (`None` or an empty
//! string). [`Form::validate`] turns a form into the draft sent to the store,
//! or explains what is missing.

use chrono::NaiveDate;
use std::fmt;

use super::error::ValidationError;
use crate::models::{ClientDraft, ProductDraft, UserDraft};

pub trait Form {
    type Draft;

    fn validate(self) -> Result<Self::Draft, ValidationError>;
}

#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: String,
    pub quantity: Option<i64>,
    pub price: Option<f64>,
    /// Empty means 0.
    pub discount: Option<f64>,
}

impl Form for ProductForm {
    type Draft = ProductDraft;

    fn validate(self) -> Result<ProductDraft, ValidationError> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.quantity.is_none() {
            missing.push("quantity");
        }
        if self.price.is_none() {
            missing.push("price");
        }

        let (Some(quantity), Some(price)) = (self.quantity, self.price) else {
            return Err(ValidationError::MissingFields(missing));
        };
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        let discount = self.discount.unwrap_or(0.0);

        let mut negative = Vec::new();
        if quantity < 0 {
            negative.push("quantity");
        }
        if is_negative(price) {
            negative.push("price");
        }
        if is_negative(discount) {
            negative.push("discount");
        }
        if !negative.is_empty() {
            return Err(ValidationError::Negative(negative));
        }

        let quantity = u32::try_from(quantity)
            .map_err(|_| ValidationError::OutOfRange(vec!["quantity"]))?;

        Ok(ProductDraft {
            name: self.name.trim().to_string(),
            quantity,
            price,
            discount,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClientForm {
    pub name: String,
    pub cpf: String,
    pub email: String,
    pub registered_on: Option<NaiveDate>,
}

impl Form for ClientForm {
    type Draft = ClientDraft;

    fn validate(self) -> Result<ClientDraft, ValidationError> {
        let mut missing = blank_fields(&[
            ("name", &self.name),
            ("cpf", &self.cpf),
            ("email", &self.email),
        ]);

        match self.registered_on {
            Some(registered_on) if missing.is_empty() => Ok(ClientDraft {
                name: self.name.trim().to_string(),
                cpf: self.cpf.trim().to_string(),
                email: self.email.trim().to_string(),
                registered_on,
            }),
            registered_on => {
                if registered_on.is_none() {
                    missing.push("registration date");
                }
                Err(ValidationError::MissingFields(missing))
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserForm {
    pub name: String,
    pub cpf: String,
    pub email: String,
    pub phone: String,
    pub role: String,
}

impl Form for UserForm {
    type Draft = UserDraft;

    fn validate(self) -> Result<UserDraft, ValidationError> {
        let missing = blank_fields(&[
            ("name", &self.name),
            ("cpf", &self.cpf),
            ("email", &self.email),
        ]);
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        Ok(UserDraft {
            name: self.name.trim().to_string(),
            cpf: self.cpf.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            role: self.role.trim().to_string(),
        })
    }
}

/// An editable numeric product column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Quantity,
    Price,
    Discount,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Quantity => write!(f, "quantity"),
            Field::Price => write!(f, "price"),
            Field::Discount => write!(f, "discount"),
        }
    }
}

/// An inline edit of a product row. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductEdit {
    pub quantity: Option<i64>,
    pub price: Option<f64>,
    pub discount: Option<f64>,
}

/// [`ProductEdit`] with negative inputs clamped to zero.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ClampedEdit {
    pub quantity: Option<u32>,
    pub price: Option<f64>,
    pub discount: Option<f64>,
    pub clamped: Vec<Field>,
}

impl ProductEdit {
    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn discount(mut self, discount: f64) -> Self {
        self.discount = Some(discount);
        self
    }

    /// Clamps negative inputs to zero. A quantity too large to store is
    /// rejected outright.
    pub(crate) fn clamp(&self) -> Result<ClampedEdit, ValidationError> {
        let mut clamped = Vec::new();

        let quantity = match self.quantity {
            Some(q) if q < 0 => {
                clamped.push(Field::Quantity);
                Some(0)
            }
            Some(q) => Some(
                u32::try_from(q).map_err(|_| ValidationError::OutOfRange(vec!["quantity"]))?,
            ),
            None => None,
        };
        let price = self.price.map(|p| clamp_decimal(p, Field::Price, &mut clamped));
        let discount = self
            .discount
            .map(|d| clamp_decimal(d, Field::Discount, &mut clamped));

        Ok(ClampedEdit {
            quantity,
            price,
            discount,
            clamped,
        })
    }
}

fn clamp_decimal(value: f64, field: Field, clamped: &mut Vec<Field>) -> f64 {
    if is_negative(value) {
        clamped.push(field);
        0.0
    } else {
        value
    }
}

/// NaN counts as negative: it can never be persisted.
fn is_negative(value: f64) -> bool {
    value.is_nan() || value < 0.0
}

fn blank_fields(fields: &[(&'static str, &String)]) -> Vec<&'static str> {
    fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect()
}
