// commands.rs — Command handlers.
//
// These functions are the "API" of the crate for a UI or the CLI. Every one
// takes the shared `AppState`, locks the connection, runs its operation and
// returns a `CmdResult` whose error serializes to a plain JSON string.

use rusqlite::Connection;
use std::sync::Mutex;

use crate::analytics::Analytics;
use crate::config::Config;
use crate::db;
use crate::models::{
    Build, BuildInput, Engine, EngineInput, EngineStats, EngineStatus, ImportOutcome,
    ReliabilityReport, ReportInput, ReportSummary,
};

/// RUST NOTE: This is our shared application state.
/// `Mutex<Connection>` ensures only one thread accesses the DB at a time.
pub struct AppState {
    pub db:        Mutex<Connection>,
    pub top_limit: usize,
}

impl AppState {
    pub fn new(conn: Connection, top_limit: usize) -> Self {
        Self { db: Mutex::new(conn), top_limit }
    }

    /// Open the database named by `config` and wrap it.
    pub fn open(config: &Config) -> crate::error::Result<Self> {
        let conn = db::open_db(&config.db_path)?;
        Ok(Self::new(conn, config.top_limit))
    }
}

// ---------------------------------------------------------------------------
// Error handling
// ---------------------------------------------------------------------------

// Callers receive errors as JSON, and our error type carries a
// `rusqlite::Error` which doesn't implement Serialize, so we flatten to text.

#[derive(Debug, serde::Serialize, PartialEq)]
pub struct CommandError(pub String);

impl From<crate::error::Error> for CommandError {
    fn from(e: crate::error::Error) -> Self {
        CommandError(e.to_string())
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// Shorthand type alias: `CmdResult<T>` is `Result<T, CommandError>`
pub type CmdResult<T> = Result<T, CommandError>;

// Macro to lock the Mutex and propagate the error if poisoned
macro_rules! db {
    ($state:expr) => {
        $state
            .db
            .lock()
            .map_err(|e| CommandError(format!("DB lock poisoned: {e}")))?
    };
}

// ---------------------------------------------------------------------------
// Engines
// ---------------------------------------------------------------------------

/// Approved engines with their reliability index and report count.
pub fn get_active_engines(state: &AppState) -> CmdResult<Vec<Engine>> {
    let conn = db!(state);
    db::list_active_engines(&conn).map_err(Into::into)
}

pub fn get_engine(state: &AppState, id: &str) -> CmdResult<Option<Engine>> {
    let conn = db!(state);
    db::get_engine(&conn, id).map_err(Into::into)
}

/// Moderation queue.
pub fn get_pending_engines(state: &AppState) -> CmdResult<Vec<Engine>> {
    let conn = db!(state);
    db::list_engines_by_status(&conn, EngineStatus::Pending).map_err(Into::into)
}

pub fn submit_engine(state: &AppState, input: EngineInput, author_id: &str) -> CmdResult<Engine> {
    let conn = db!(state);
    db::submit_engine(&conn, input, author_id).map_err(Into::into)
}

/// Returns true if the engine was found and updated.
pub fn moderate_engine(
    state: &AppState,
    id: &str,
    status: EngineStatus,
    comment: Option<String>,
) -> CmdResult<bool> {
    let conn = db!(state);
    db::moderate(&conn, id, status, comment.as_deref()).map_err(Into::into)
}

pub fn record_view(state: &AppState, id: &str) -> CmdResult<bool> {
    let conn = db!(state);
    db::record_view(&conn, id).map_err(Into::into)
}

// ---------------------------------------------------------------------------
// Reports & builds
// ---------------------------------------------------------------------------

pub fn submit_report(state: &AppState, input: ReportInput) -> CmdResult<ReliabilityReport> {
    let conn = db!(state);
    db::submit_report(&conn, input).map_err(Into::into)
}

pub fn get_engine_reports(state: &AppState, engine_id: &str) -> CmdResult<Vec<ReliabilityReport>> {
    let conn = db!(state);
    db::list_reports_for_engine(&conn, engine_id).map_err(Into::into)
}

/// The current user's latest report for an engine, if they filed one.
pub fn get_user_report(
    state: &AppState,
    user_id: &str,
    engine_id: &str,
) -> CmdResult<Option<ReliabilityReport>> {
    let conn = db!(state);
    db::find_user_report(&conn, user_id, engine_id).map_err(Into::into)
}

pub fn import_reports(state: &AppState, json: &str) -> CmdResult<ImportOutcome> {
    let conn = db!(state);
    db::import_reports_json(&conn, json).map_err(Into::into)
}

pub fn add_build(state: &AppState, input: BuildInput) -> CmdResult<Build> {
    let conn = db!(state);
    db::add_build(&conn, input).map_err(Into::into)
}

pub fn get_builds(state: &AppState) -> CmdResult<Vec<Build>> {
    let conn = db!(state);
    db::list_builds(&conn).map_err(Into::into)
}

// ---------------------------------------------------------------------------
// Stats & leaderboards
// ---------------------------------------------------------------------------

pub fn get_stats(state: &AppState) -> CmdResult<Vec<EngineStats>> {
    let conn = db!(state);
    Analytics::new(&*conn).compute_all_stats().map_err(Into::into)
}

pub fn get_top_by_popularity(state: &AppState, limit: Option<usize>) -> CmdResult<Vec<EngineStats>> {
    let conn = db!(state);
    let limit = limit.unwrap_or(state.top_limit);
    Analytics::new(&*conn).top_by_popularity(limit).map_err(Into::into)
}

pub fn get_top_by_reliability(state: &AppState, limit: Option<usize>) -> CmdResult<Vec<EngineStats>> {
    let conn = db!(state);
    let limit = limit.unwrap_or(state.top_limit);
    Analytics::new(&*conn).top_by_reliability(limit).map_err(Into::into)
}

pub fn get_most_problematic(state: &AppState, limit: Option<usize>) -> CmdResult<Vec<EngineStats>> {
    let conn = db!(state);
    let limit = limit.unwrap_or(state.top_limit);
    Analytics::new(&*conn).most_problematic(limit).map_err(Into::into)
}

pub fn get_report_summary(state: &AppState, engine_id: &str) -> CmdResult<Option<ReportSummary>> {
    let conn = db!(state);
    Analytics::new(&*conn).report_summary(engine_id).map_err(Into::into)
}
