use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};
use ykprobe_apdu_transport_pcsc::PcscDeviceManager;

mod commands;
mod utils;

use commands::*;
use utils::reader;

#[derive(Parser)]
#[command(name = "ykprobe", version, about = "Inspect YubiKeys over the smart card interface")]
struct Cli {
    /// Optional reader name to use (will auto-detect if not specified)
    #[arg(short, long)]
    reader: Option<String>,

    /// Debug level output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available readers
    List,

    /// Show general information about the YubiKey
    Info {
        /// Check if the YubiKey is in FIPS approved mode
        #[arg(short, long)]
        check_fips: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let manager = PcscDeviceManager::new()?;

    match &cli.command {
        Commands::List => reader::list_readers(&manager)?,
        Commands::Info { check_fips } => {
            let reader = match &cli.reader {
                Some(reader_name) => reader::find_reader_by_name(&manager, reader_name)?,
                None => reader::find_yubikey_reader(&manager)?,
            };

            info!("Using reader: {}", reader.name());
            info_command(&manager, &reader, *check_fips)?
        }
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` directives refine the level picked by `--verbose`
fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .init();
}
