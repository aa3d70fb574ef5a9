//! Parcel tracker command-line walk-through.
//!
//! # Responsibility
//! - Own the database connection and hand it to the core store.
//! - Exercise the parcel lifecycle end to end for one client.

use clap::Parser;
use parcel_core::db::{open_db, open_db_in_memory};
use parcel_core::{
    default_log_level, init_logging, ClientId, ParcelService, ServiceError, SqliteParcelStore,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

/// Registers sample parcels for a client and walks them through their lifecycle.
#[derive(Parser, Debug)]
#[command(name = "parcel_cli")]
#[command(version, about, long_about = None)]
struct Args {
    /// SQLite database file; an in-memory database is used when omitted
    db_path: Option<PathBuf>,

    /// Client owning the sample parcels
    #[arg(default_value_t = 1)]
    client: ClientId,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, env = "PARCEL_TRACKER_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_run module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    if let Some(log_dir) = &args.log_dir {
        init_logging(default_log_level(), log_dir)?;
    }
    let client = args.client;

    let conn = match &args.db_path {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let service = ParcelService::new(SqliteParcelStore::try_new(&conn)?);

    println!("parcel_core version={}", parcel_core::core_version());

    let parcel = service.register(client, "Pskov, Vokzalnaya st. 1")?;
    println!("registered {parcel}");

    service.change_address(parcel.number, "Saratov, Pervomayskaya st. 12")?;
    println!("address changed for parcel #{}", parcel.number);

    let status = service.next_status(parcel.number)?;
    println!("parcel #{} is now {status}", parcel.number);

    match service.delete(parcel.number) {
        Err(err @ ServiceError::InvalidTransition { .. }) => println!("kept: {err}"),
        Err(err) => return Err(err.into()),
        Ok(()) => println!("deleted parcel #{}", parcel.number),
    }

    let draft = service.register(client, "Moscow, Tverskaya st. 7")?;
    println!("registered {draft}");
    service.delete(draft.number)?;
    println!("deleted parcel #{}", draft.number);

    let parcels = service.client_parcels(client)?;
    println!("client {client} has {} parcel(s):", parcels.len());
    for parcel in parcels {
        println!("  {parcel}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{run, Args};
    use clap::Parser;
    use std::path::Path;

    #[test]
    fn args_default_to_in_memory_db_and_client_one() {
        let args = Args::try_parse_from(["parcel_cli"]).unwrap();
        assert_eq!(args.db_path, None);
        assert_eq!(args.client, 1);
    }

    #[test]
    fn args_accept_db_path_and_client() {
        let args = Args::try_parse_from(["parcel_cli", "tracker.db", "42"]).unwrap();
        assert_eq!(args.db_path.as_deref(), Some(Path::new("tracker.db")));
        assert_eq!(args.client, 42);
    }

    #[test]
    fn args_reject_non_numeric_client() {
        assert!(Args::try_parse_from(["parcel_cli", "tracker.db", "x"]).is_err());
    }

    #[test]
    fn run_walks_lifecycle_against_file_db() {
        let dir = tempfile::tempdir().unwrap();
        let args = Args {
            db_path: Some(dir.path().join("tracker.db")),
            client: 7,
            log_dir: None,
        };
        run(&args).unwrap();
        run(&args).unwrap();
    }
}
