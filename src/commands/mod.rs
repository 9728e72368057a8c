mod client;
mod config_cmd;
mod product;
mod report;
mod user;

pub use client::ClientCommand;
pub use config_cmd::ConfigCommand;
pub use product::ProductCommand;
pub use report::ReportCommand;
pub use user::UserCommand;

use clap::ValueEnum;

use estoque::store::RecordStore;
use estoque::sync::SyncController;
use estoque::table::{Table, TableRecord};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Loads every record of one type into a fresh controller.
async fn load<S, R>(store: S) -> Result<SyncController<S, R>, Box<dyn std::error::Error>>
where
    S: RecordStore,
    R: TableRecord,
{
    let mut controller = SyncController::new(store, Table::new());
    controller.load().await?;
    Ok(controller)
}

/// Prints the table's alert banner and any notices collected so far.
fn print_messages<S, R>(controller: &mut SyncController<S, R>)
where
    S: RecordStore,
    R: TableRecord,
{
    for notice in controller.take_notices() {
        println!("Note: {}", notice);
    }
    if let Some(alert) = controller.table().alert() {
        println!("{}", alert);
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let kept: String = text.chars().take(width - 3).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}
