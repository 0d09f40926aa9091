// cli.rs — Command-line arguments for the reporting binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// SQLite database file (overrides MOTOENGINE_DB)
    #[arg(long)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Stats for every approved engine, in catalog order
    Stats,
    /// Approved engines with reliability index and report count
    Engines,
    /// Most popular engines
    TopPopular {
        /// How many to show (defaults to MOTOENGINE_TOP_LIMIT or 10)
        #[arg(short)]
        n: Option<usize>,
    },
    /// Most reliable engines
    TopReliable {
        #[arg(short)]
        n: Option<usize>,
    },
    /// Engines with the highest failure rate among those with reports
    Problematic {
        #[arg(short)]
        n: Option<usize>,
    },
    /// Import a JSON export of reliability reports
    Import {
        file: PathBuf,
    },
}
