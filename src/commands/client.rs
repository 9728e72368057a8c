use chrono::NaiveDate;
use clap::{Args, Subcommand};

use super::{load, print_messages, truncate, OutputFormat};
use estoque::models::Client;
use estoque::store::RecordStore;
use estoque::sync::{ClientForm, Deleted, SyncController};
use estoque::table::Table;

#[derive(Args)]
pub struct ClientCommand {
    #[command(subcommand)]
    pub command: ClientSubcommand,
}

#[derive(Subcommand)]
pub enum ClientSubcommand {
    /// List clients
    List {
        /// Only show clients whose name or CPF contains this text
        #[arg(long, short)]
        search: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Register a client
    Add {
        /// Client name
        name: String,

        #[arg(long, default_value = "")]
        cpf: String,

        #[arg(long, default_value = "")]
        email: String,

        /// Registration date (YYYY-MM-DD)
        #[arg(long)]
        registered: Option<NaiveDate>,
    },

    /// Delete a client
    Delete {
        /// Client ID
        id: String,
    },
}

impl ClientCommand {
    pub async fn run<S: RecordStore>(&self, store: S) -> Result<(), Box<dyn std::error::Error>> {
        let mut clients: SyncController<S, Client> = load(store).await?;

        match &self.command {
            ClientSubcommand::List { search, format } => {
                if let Some(term) = search {
                    clients.filter(term);
                }
                match format {
                    OutputFormat::Json => {
                        let visible: Vec<&Client> = clients
                            .table()
                            .visible_rows()
                            .map(|row| row.record())
                            .collect();
                        println!("{}", serde_json::to_string_pretty(&visible)?);
                    }
                    OutputFormat::Text => {
                        print_messages(&mut clients);
                        print_table(clients.table());
                    }
                }
            }

            ClientSubcommand::Add {
                name,
                cpf,
                email,
                registered,
            } => {
                let form = ClientForm {
                    name: name.clone(),
                    cpf: cpf.clone(),
                    email: email.clone(),
                    registered_on: *registered,
                };
                let id = clients.create(form).await?.id().to_string();
                println!("Created client {}", id);
                print_table(clients.table());
            }

            ClientSubcommand::Delete { id } => {
                if clients.delete(id).await? == Deleted::Removed {
                    println!("Deleted client {}", id);
                }
                print_messages(&mut clients);
            }
        }

        Ok(())
    }
}

fn print_table(table: &Table<Client>) {
    if table.is_empty() {
        return;
    }

    println!(
        "{:<32}  {:<24}  {:<14}  {:<28}  REGISTERED",
        "ID", "NAME", "CPF", "EMAIL"
    );
    println!("{}", "-".repeat(112));
    for row in table.visible_rows() {
        let client = row.record();
        println!(
            "{:<32}  {:<24}  {:<14}  {:<28}  {}",
            client.id,
            truncate(&client.name, 24),
            client.cpf,
            truncate(&client.email, 28),
            client.registered_on.format("%d/%m/%Y")
        );
    }
    println!("\nTotal: {} client(s)", table.len());
}
