//! Derived product values.
//!
//! Every place that shows a line total or a low-stock marker (table rows,
//! the sync controller after an edit, the printed report) goes through
//! [`price_line`], so the three can never disagree.

/// Products with fewer units than this are flagged as low stock.
pub const LOW_STOCK_THRESHOLD: u32 = 10;

/// Values derived from a product's price, quantity and discount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pricing {
    /// Discounted unit price times quantity, rounded to cents.
    pub total: f64,
    /// `quantity < LOW_STOCK_THRESHOLD`
    pub low_stock: bool,
}

impl Pricing {
    /// Total formatted with two decimals, as shown in tables and reports.
    pub fn total_display(&self) -> String {
        format!("{:.2}", self.total)
    }
}

/// Computes the line total and low-stock flag for one product.
///
/// `discount` is a percentage (0-100).
pub fn price_line(price: f64, quantity: u32, discount: f64) -> Pricing {
    let discounted = price - price * discount / 100.0;
    Pricing {
        total: round2(discounted * f64::from(quantity)),
        low_stock: is_low_stock(quantity),
    }
}

pub fn is_low_stock(quantity: u32) -> bool {
    quantity < LOW_STOCK_THRESHOLD
}

/// Rounds to two decimal places, halves away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
