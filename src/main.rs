// main.rs — Reporting binary entry point.
//
// This file wires everything together:
//   1. Installs the tracing subscriber (RUST_LOG, default `motoengine=info`)
//   2. Resolves config and opens / creates the SQLite database
//   3. Runs one command and prints its result as JSON

mod cli;

use clap::Parser;
use serde::Serialize;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use cli::{Args, Command};
use motoengine_lib::commands::{self, AppState, CmdResult};
use motoengine_lib::config::Config;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("motoengine=info,motoengine_lib=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    if let Some(db) = args.db {
        config.db_path = db;
    }

    let state = match AppState::open(&config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, path = %config.db_path.display(), "failed to open database");
            return ExitCode::FAILURE;
        }
    };

    let outcome = match args.command {
        Command::Stats              => print(commands::get_stats(&state)),
        Command::Engines            => print(commands::get_active_engines(&state)),
        Command::TopPopular { n }   => print(commands::get_top_by_popularity(&state, n)),
        Command::TopReliable { n }  => print(commands::get_top_by_reliability(&state, n)),
        Command::Problematic { n }  => print(commands::get_most_problematic(&state, n)),
        Command::Import { file } => match std::fs::read_to_string(&file) {
            Ok(json) => print(commands::import_reports(&state, &json)),
            Err(e) => {
                tracing::error!(error = %e, file = %file.display(), "cannot read import file");
                return ExitCode::FAILURE;
            }
        },
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            ExitCode::FAILURE
        }
    }
}

fn print<T: Serialize>(result: CmdResult<T>) -> Result<(), String> {
    let value = result.map_err(|e| e.to_string())?;
    let json = serde_json::to_string_pretty(&value).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}
