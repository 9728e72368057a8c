use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{ClientCommand, ConfigCommand, ProductCommand, ReportCommand, UserCommand};
use estoque::config::Config;
use estoque::store::HttpRecordStore;

#[derive(Parser)]
#[command(name = "estoque")]
#[command(version)]
#[command(about = "Manage products, clients and users of the inventory server", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage products
    Product(ProductCommand),

    /// Manage clients
    Client(ClientCommand),

    /// Manage users
    User(UserCommand),

    /// Show or export the inventory report
    Report(ReportCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "estoque=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = Config::load(cli.config)?;
    let store = HttpRecordStore::new(&config.server_url.value);

    match cli.command {
        Some(Commands::Product(cmd)) => cmd.run(&store, &config).await?,
        Some(Commands::Client(cmd)) => cmd.run(&store).await?,
        Some(Commands::User(cmd)) => cmd.run(&store).await?,
        Some(Commands::Report(cmd)) => cmd.run(&config)?,
        Some(Commands::Config(cmd)) => cmd.run(&config)?,
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
