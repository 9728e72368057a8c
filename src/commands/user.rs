use clap::{Args, Subcommand};

use super::{load, print_messages, truncate, OutputFormat};
use estoque::models::User;
use estoque::store::RecordStore;
use estoque::sync::{Deleted, SyncController, UserForm};
use estoque::table::Table;

#[derive(Args)]
pub struct UserCommand {
    #[command(subcommand)]
    pub command: UserSubcommand,
}

#[derive(Subcommand)]
pub enum UserSubcommand {
    /// List users
    List {
        /// Only show users whose name or CPF contains this text
        #[arg(long, short)]
        search: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add a user
    Add {
        /// User name
        name: String,

        #[arg(long, default_value = "")]
        cpf: String,

        #[arg(long, default_value = "")]
        email: String,

        #[arg(long, default_value = "")]
        phone: String,

        /// Job role
        #[arg(long, default_value = "")]
        role: String,
    },

    /// Delete a user
    Delete {
        /// User ID
        id: String,
    },
}

impl UserCommand {
    pub async fn run<S: RecordStore>(&self, store: S) -> Result<(), Box<dyn std::error::Error>> {
        let mut users: SyncController<S, User> = load(store).await?;

        match &self.command {
            UserSubcommand::List { search, format } => {
                if let Some(term) = search {
                    users.filter(term);
                }
                match format {
                    OutputFormat::Json => {
                        let visible: Vec<&User> = users
                            .table()
                            .visible_rows()
                            .map(|row| row.record())
                            .collect();
                        println!("{}", serde_json::to_string_pretty(&visible)?);
                    }
                    OutputFormat::Text => print_table(users.table()),
                }
            }

            UserSubcommand::Add {
                name,
                cpf,
                email,
                phone,
                role,
            } => {
                let form = UserForm {
                    name: name.clone(),
                    cpf: cpf.clone(),
                    email: email.clone(),
                    phone: phone.clone(),
                    role: role.clone(),
                };
                let id = users.create(form).await?.id().to_string();
                println!("Created user {}", id);
                print_table(users.table());
            }

            UserSubcommand::Delete { id } => {
                if users.delete(id).await? == Deleted::Removed {
                    println!("Deleted user {}", id);
                }
                print_messages(&mut users);
            }
        }

        Ok(())
    }
}

fn print_table(table: &Table<User>) {
    if table.is_empty() {
        println!("No users found");
        return;
    }

    println!(
        "{:<32}  {:<24}  {:<14}  {:<16}  {:<28}  ROLE",
        "ID", "NAME", "CPF", "PHONE", "EMAIL"
    );
    println!("{}", "-".repeat(128));
    for row in table.visible_rows() {
        let user = row.record();
        println!(
            "{:<32}  {:<24}  {:<14}  {:<16}  {:<28}  {}",
            user.id,
            truncate(&user.name, 24),
            user.cpf,
            user.phone,
            truncate(&user.email, 28),
            user.role
        );
    }
    println!("\nTotal: {} user(s)", table.len());
}
