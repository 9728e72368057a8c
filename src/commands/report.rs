use clap::{Args, Subcommand};
use std::path::PathBuf;

use estoque::config::Config;
use estoque::report::{Report, ReportChannel, DEFAULT_PDF_NAME};

#[derive(Args)]
pub struct ReportCommand {
    #[command(subcommand)]
    pub command: ReportSubcommand,
}

#[derive(Subcommand)]
pub enum ReportSubcommand {
    /// Show the last captured report
    Show,

    /// Export the last captured report as PDF
    Pdf {
        /// Output file
        #[arg(long, short, default_value = DEFAULT_PDF_NAME)]
        output: PathBuf,
    },
}

impl ReportCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let channel = ReportChannel::new(&config.data_dir.value);
        let report = Report::from_snapshot(channel.load()?);

        match &self.command {
            ReportSubcommand::Show => {
                println!("{}", report);
            }
            ReportSubcommand::Pdf { output } => {
                let bytes = report.to_pdf()?;
                std::fs::write(output, bytes)?;
                println!(
                    "Wrote {} ({} row(s), grand total {})",
                    output.display(),
                    report.rows.len(),
                    report.grand_total_display()
                );
            }
        }

        Ok(())
    }
}
