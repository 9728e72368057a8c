//! Inventory report: snapshot the product table, hand it over, render it.
//!
//! The snapshot is a plain copy of every product row taken at export time.
//! It is published through a [`ReportChannel`] and read back by the renderer,
//! which sums the line totals into a grand total and can print a PDF.

mod channel;
mod pdf;

pub use channel::{ReportChannel, REPORT_KEY};
pub use pdf::DEFAULT_PDF_NAME;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::Product;
use crate::pricing::round2;
use crate::table::Table;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("No report has been generated yet (expected {})", .0.display())]
    Missing(PathBuf),
    #[error("Failed to access report data at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Report data is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("Failed to render PDF: {0}")]
    Pdf(String),
}

/// One flattened product line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub price: f64,
    pub total_price: f64,
    pub discount: f64,
    pub low_stock: bool,
}

/// Point-in-time copy of the product table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportSnapshot {
    pub generated_at: DateTime<Utc>,
    pub rows: Vec<ReportRow>,
}

impl ReportSnapshot {
    /// Copies every row, including rows hidden by the current filter.
    pub fn capture(table: &Table<Product>) -> Self {
        let rows = table
            .rows()
            .iter()
            .map(|row| {
                let product = row.record();
                let pricing = row.derived();
                ReportRow {
                    product_id: product.id.clone(),
                    product_name: product.name.clone(),
                    quantity: product.quantity,
                    price: product.price,
                    total_price: pricing.total,
                    discount: product.discount,
                    low_stock: pricing.low_stock,
                }
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            rows,
        }
    }
}

/// A snapshot ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub rows: Vec<ReportRow>,
    pub grand_total: f64,
}

impl Report {
    pub fn from_snapshot(snapshot: ReportSnapshot) -> Self {
        let grand_total = round2(snapshot.rows.iter().map(|r| r.total_price).sum());
        Self {
            generated_at: snapshot.generated_at,
            rows: snapshot.rows,
            grand_total,
        }
    }

    pub fn grand_total_display(&self) -> String {
        format!("{:.2}", self.grand_total)
    }

    /// Renders the report as a paginated PDF document.
    pub fn to_pdf(&self) -> Result<Vec<u8>, ReportError> {
        pdf::render(self)
    }
}

pub(crate) const HEADERS: [&str; 7] = [
    "ID",
    "Product",
    "Quantity",
    "Price",
    "Total",
    "Discount (%)",
    "Low stock",
];

impl ReportRow {
    /// Cell texts in [`HEADERS`] order.
    pub(crate) fn cells(&self) -> [String; 7] {
        [
            self.product_id.clone(),
            self.product_name.clone(),
            self.quantity.to_string(),
            format!("{:.2}", self.price),
            format!("{:.2}", self.total_price),
            format!("{}", self.discount),
            if self.low_stock { "Yes" } else { "No" }.to_string(),
        ]
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Inventory report ({})",
            self.generated_at.format("%Y-%m-%d %H:%M UTC")
        )?;

        let cells: Vec<[String; 7]> = self.rows.iter().map(ReportRow::cells).collect();
        let mut widths = HEADERS.map(|h| h.chars().count());
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        write_line(f, &widths, &HEADERS)?;
        for row in &cells {
            let texts: Vec<&str> = row.iter().map(String::as_str).collect();
            write_line(f, &widths, &texts)?;
        }

        write!(f, "Grand total: {}", self.grand_total_display())
    }
}

fn write_line(f: &mut fmt::Formatter<'_>, widths: &[usize], texts: &[&str]) -> fmt::Result {
    let padded: Vec<String> = texts
        .iter()
        .zip(widths)
        .map(|(text, width)| format!("{:<width$}", text, width = width))
        .collect();
    writeln!(f, "{}", padded.join("  ").trim_end())
}
