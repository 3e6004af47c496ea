//! Command-line front end for the parcel tracker.
//!
//! # Responsibility
//! - Open the tracker database and run one parcel workflow per invocation.
//! - Print results as JSON on stdout and failures on stderr.

use clap::{Parser, Subcommand};
use log::error;
use parcel_core::db::open_db;
use parcel_core::{
    default_log_level, init_logging, ClientId, ParcelNumber, ParcelService, SqliteParcelStore,
};
use serde_json::json;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "parcel-cli", version, about = "Track parcels in a local SQLite database")]
struct Cli {
    /// Path to the tracker database file.
    #[arg(long, global = true, default_value = "tracker.db")]
    db: PathBuf,

    /// Absolute directory for rolling log files. Logging is off when omitted.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Register a new parcel.
    Register {
        #[arg(long)]
        client: ClientId,
        #[arg(long)]
        address: String,
    },
    /// Show one parcel.
    Show { number: ParcelNumber },
    /// List every parcel of a client.
    List {
        #[arg(long)]
        client: ClientId,
    },
    /// Move a parcel to its next status.
    Advance { number: ParcelNumber },
    /// Change the address of a registered parcel.
    SetAddress { number: ParcelNumber, address: String },
    /// Delete a registered parcel.
    Delete { number: ParcelNumber },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=cli_command module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<serde_json::Value, Box<dyn Error>> {
    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or_else(|| default_log_level());
        init_logging(level, log_dir)?;
    }

    let conn = open_db(&cli.db)?;
    let store = SqliteParcelStore::try_new(&conn)?;
    let service = ParcelService::new(store);

    let output = match cli.command {
        Command::Register { client, address } => {
            serde_json::to_value(service.register(client, address)?)?
        }
        Command::Show { number } => serde_json::to_value(service.parcel(number)?)?,
        Command::List { client } => serde_json::to_value(service.parcels_of(client)?)?,
        Command::Advance { number } => {
            json!({ "number": number, "status": service.advance_status(number)? })
        }
        Command::SetAddress { number, address } => {
            service.change_address(number, &address)?;
            json!({ "number": number, "address": address })
        }
        Command::Delete { number } => {
            service.remove(number)?;
            json!({ "number": number, "deleted": true })
        }
    };
    Ok(output)
}
