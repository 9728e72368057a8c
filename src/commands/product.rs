use clap::{Args, Subcommand};

use super::{load, print_messages, truncate, OutputFormat};
use estoque::config::Config;
use estoque::models::Product;
use estoque::report::{Report, ReportChannel, ReportSnapshot};
use estoque::store::RecordStore;
use estoque::sync::{Deleted, ProductEdit, ProductForm, SyncController};
use estoque::table::Table;

#[derive(Args)]
pub struct ProductCommand {
    #[command(subcommand)]
    pub command: ProductSubcommand,
}

#[derive(Subcommand)]
pub enum ProductSubcommand {
    /// List products with their totals
    List {
        /// Only show products whose name contains this text
        #[arg(long, short)]
        search: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add a product
    Add {
        /// Product name
        name: String,

        #[arg(long, allow_negative_numbers = true)]
        quantity: Option<i64>,

        /// Unit price
        #[arg(long, allow_negative_numbers = true)]
        price: Option<f64>,

        /// Discount percentage (default 0)
        #[arg(long, allow_negative_numbers = true)]
        discount: Option<f64>,
    },

    /// Change quantity, price or discount of a product
    ///
    /// Negative values are saved as 0.
    Edit {
        /// Product ID
        id: String,

        #[arg(long, allow_negative_numbers = true)]
        quantity: Option<i64>,

        #[arg(long, allow_negative_numbers = true)]
        price: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        discount: Option<f64>,
    },

    /// Delete a product
    Delete {
        /// Product ID
        id: String,
    },

    /// Capture the product table for the report and show it
    Report,
}

impl ProductCommand {
    pub async fn run<S: RecordStore>(
        &self,
        store: S,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut products: SyncController<S, Product> = load(store).await?;

        match &self.command {
            ProductSubcommand::List { search, format } => {
                if let Some(term) = search {
                    products.filter(term);
                }
                match format {
                    OutputFormat::Json => {
                        let visible: Vec<&Product> = products
                            .table()
                            .visible_rows()
                            .map(|row| row.record())
                            .collect();
                        println!("{}", serde_json::to_string_pretty(&visible)?);
                    }
                    OutputFormat::Text => {
                        print_messages(&mut products);
                        print_table(products.table());
                    }
                }
            }

            ProductSubcommand::Add {
                name,
                quantity,
                price,
                discount,
            } => {
                let form = ProductForm {
                    name: name.clone(),
                    quantity: *quantity,
                    price: *price,
                    discount: *discount,
                };
                let id = products.create(form).await?.id().to_string();
                println!("Created product {}", id);
                print_messages(&mut products);
                print_table(products.table());
            }

            ProductSubcommand::Edit {
                id,
                quantity,
                price,
                discount,
            } => {
                let edit = ProductEdit {
                    quantity: *quantity,
                    price: *price,
                    discount: *discount,
                };
                if edit == ProductEdit::default() {
                    return Err("Nothing to change: pass --quantity, --price or --discount".into());
                }
                let result = products.update(id, &edit).await;
                if result.is_ok() {
                    println!("Updated product {}", id);
                }
                // clamp notices apply even when the save failed
                print_messages(&mut products);
                result?;
                print_table(products.table());
            }

            ProductSubcommand::Delete { id } => {
                if products.delete(id).await? == Deleted::Removed {
                    println!("Deleted product {}", id);
                }
                print_messages(&mut products);
            }

            ProductSubcommand::Report => {
                let snapshot = ReportSnapshot::capture(products.table());
                let path = ReportChannel::new(&config.data_dir.value).publish(&snapshot)?;
                println!("{}", Report::from_snapshot(snapshot));
                println!("\nSaved report data to {}", path.display());
            }
        }

        Ok(())
    }
}

fn print_table(table: &Table<Product>) {
    if table.is_empty() {
        println!("No products found");
        return;
    }

    println!(
        "{:<32}  {:<24}  {:>8}  {:>10}  {:>9}  {:>12}",
        "ID", "NAME", "QTY", "PRICE", "DISC (%)", "TOTAL"
    );
    println!("{}", "-".repeat(106));

    let mut shown = 0;
    for row in table.visible_rows() {
        let product = row.record();
        let pricing = row.derived();
        let marker = if pricing.low_stock { "  low stock" } else { "" };
        println!(
            "{:<32}  {:<24}  {:>8}  {:>10.2}  {:>9}  {:>12}{}",
            product.id,
            truncate(&product.name, 24),
            product.quantity,
            product.price,
            product.discount,
            pricing.total_display(),
            marker
        );
        shown += 1;
    }

    if shown < table.len() {
        println!("\nShowing {} of {} product(s)", shown, table.len());
    } else {
        println!("\nTotal: {} product(s)", table.len());
    }
}
