//! Maintenance actions from the command line.
//!
//! ```bash
//! cargo run --example maintenance --features native -- --host 192.168.1.42 show --json
//! cargo run --example maintenance --features native -- download --output readings.csv
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use thermolog_sdk::client::ThermologClient;
use thermolog_sdk::network::{DEFAULT_DOWNLOAD_FILE, DEFAULT_HOST};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "maintenance")]
#[command(about = "Download, inspect or reset a Thermolog device")]
struct Cli {
    /// Device host, optionally with port
    #[arg(long, env = "THERMOLOG_HOST", default_value = DEFAULT_HOST)]
    host: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Save the stored CSV file
    Download {
        #[arg(long, default_value = DEFAULT_DOWNLOAD_FILE)]
        output: PathBuf,
    },
    /// Print the stored samples
    Show {
        /// Print the parsed series as JSON
        #[arg(long)]
        json: bool,
    },
    /// Erase the stored samples
    Delete,
    /// Erase the network configuration (the device restarts in access-point mode)
    ClearConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let client = ThermologClient::builder().host(&cli.host).build()?;

    match cli.command {
        Commands::Download { output } => {
            let bytes = client.maintenance().download_to(&output).await?;
            println!("wrote {} bytes to {}", bytes, output.display());
        }
        Commands::Show { json } => {
            let (series, report) = client.series().fetch().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&series)?);
            } else {
                for sample in series.samples() {
                    println!("{:<22} {:>6.1}", sample.label, sample.value);
                }
            }
            if report.rejected > 0 {
                eprintln!("skipped {} malformed rows", report.rejected);
            }
        }
        Commands::Delete => {
            let confirmation = client.maintenance().delete_data().await?;
            println!("{}", confirmation.message);
        }
        Commands::ClearConfig => {
            // the device restarts without answering
            match client.maintenance().clear_config().await {
                Ok(confirmation) => println!("{}", confirmation.message),
                Err(e) => eprintln!("no confirmation from device: {}", e),
            }
        }
    }

    Ok(())
}
