use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cburates_collector::{collect_rates, RateArchiveClient};

#[derive(Debug, Parser)]
#[command(name = "cburates-cli")]
#[command(about = "Collect daily CBU exchange rates into a CSV file")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch every day in the range once and append the rows to the output file.
    Collect {
        /// First day to fetch (YYYY-MM-DD); defaults to `CBURATES_DEFAULT_START_DATE`.
        #[arg(long)]
        start_date: Option<NaiveDate>,
        /// Last day to fetch, inclusive; defaults to `CBURATES_DEFAULT_END_DATE`.
        #[arg(long)]
        end_date: Option<NaiveDate>,
        /// Output CSV path; defaults to `CBURATES_OUTPUT_PATH`.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    // Parse first so `--help` and usage errors never depend on the environment.
    let cli = Cli::parse();

    match cli.command {
        Commands::Collect {
            start_date,
            end_date,
            output,
        } => {
            let config = cburates_core::load_app_config()?;
            init_tracing(&config.log_level)?;

            let client = RateArchiveClient::from_config(&config)?;
            let start = start_date.unwrap_or(config.default_start_date);
            let end = end_date.unwrap_or(config.default_end_date);
            let output = output.unwrap_or_else(|| config.output_path.clone());

            let summary = collect_rates(&client, start, end, &output).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
