// db.rs — SQLite setup and all database operations.
//
// We use `rusqlite`, a thin synchronous wrapper around SQLite. Callers share a
// single `Connection` behind a Mutex (see commands.rs). The only operation that
// needs more than one statement to stay correct, report submission, runs in
// an IMMEDIATE transaction so two writers can't both pass the daily check.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use std::collections::HashMap;
use std::path::Path;
use uuid::Uuid;

use crate::catalog::BUILTIN_ENGINES;
use crate::error::{Error, Result};
use crate::models::{
    Build, BuildInput, CoolingType, Engine, EngineInput, EngineStatus, ImportOutcome, RawReport,
    RejectedRecord, ReliabilityReport, ReportInput, StrokeType,
};
use crate::reliability::reliability_index;
use crate::repository::{BuildRepository, EngineRepository, ReportRepository};
use crate::validation::{check_stored_report, validate_build, validate_engine, validate_report, RecordCheck};

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

/// Open (or create) the database at `path`, creating parent directories and
/// running the schema setup.
pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let conn = Connection::open(path)?;
    init_db(&conn)?;
    tracing::info!(path = %path.display(), "database ready");
    Ok(conn)
}

/// In-memory database with the schema and seed catalog in place.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_db(&conn)?;
    Ok(conn)
}

/// Create all tables and indexes if they don't already exist, then seed the
/// built-in catalog. Safe to run on every start.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch("
        PRAGMA journal_mode = WAL;           -- better concurrent read performance
        PRAGMA foreign_keys = ON;            -- enforce FK constraints

        CREATE TABLE IF NOT EXISTS engines (
            id                TEXT    PRIMARY KEY,
            name              TEXT    NOT NULL,
            engine_index      TEXT    NOT NULL,
            brand             TEXT    NOT NULL,
            volume            INTEGER NOT NULL CHECK(volume > 0),
            stroke            TEXT    NOT NULL,
            cooling           TEXT    NOT NULL,
            power             REAL    NOT NULL,
            torque            REAL    NOT NULL,
            valves            INTEGER NOT NULL,
            timing_type       TEXT    NOT NULL DEFAULT '',
            fuel_system       TEXT    NOT NULL DEFAULT '',
            description       TEXT    NOT NULL DEFAULT '',
            status            TEXT    NOT NULL DEFAULT 'Pending',
            author_id         TEXT,
            moderator_comment TEXT,
            created_at        TEXT,
            views             INTEGER NOT NULL DEFAULT 0
        );

        -- Reports reference engines loosely: imported history may mention
        -- engines that never made it into this catalog.
        CREATE TABLE IF NOT EXISTS reports (
            id                 TEXT    PRIMARY KEY,
            engine_id          TEXT    NOT NULL,
            user_id            TEXT    NOT NULL,
            mileage            REAL    NOT NULL CHECK(mileage >= 0),
            mileage_unit       TEXT    NOT NULL,
            usage_style        TEXT    NOT NULL,
            usage_type         TEXT    NOT NULL,
            has_breakdowns     INTEGER NOT NULL,
            description        TEXT    NOT NULL DEFAULT '',
            maintenance_rating INTEGER NOT NULL,
            created_at         TEXT    NOT NULL    -- RFC 3339, UTC
        );

        -- Breakdown categories are stored as a separate table (one-to-many)
        CREATE TABLE IF NOT EXISTS report_breakdowns (
            report_id TEXT    NOT NULL,
            position  INTEGER NOT NULL,
            category  TEXT    NOT NULL,
            PRIMARY KEY (report_id, position),
            FOREIGN KEY (report_id) REFERENCES reports(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS builds (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL,
            user_name   TEXT NOT NULL,
            name        TEXT NOT NULL,
            engine_id   TEXT NOT NULL,
            frame       TEXT NOT NULL DEFAULT '',
            carburetor  TEXT NOT NULL DEFAULT '',
            exhaust     TEXT NOT NULL DEFAULT '',
            gears       TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            created_at  TEXT NOT NULL
        );

        -- Photos are stored as a separate table (one-to-many)
        CREATE TABLE IF NOT EXISTS build_photos (
            id       INTEGER PRIMARY KEY AUTOINCREMENT,
            build_id TEXT    NOT NULL,
            path     TEXT    NOT NULL,
            FOREIGN KEY (build_id) REFERENCES builds(id) ON DELETE CASCADE
        );

        -- Indexes for the most common queries
        CREATE UNIQUE INDEX IF NOT EXISTS idx_engines_index  ON engines(engine_index COLLATE NOCASE);
        CREATE INDEX IF NOT EXISTS idx_engines_status        ON engines(status);
        CREATE INDEX IF NOT EXISTS idx_reports_engine        ON reports(engine_id);
        CREATE INDEX IF NOT EXISTS idx_reports_user_engine   ON reports(user_id, engine_id, created_at);
        CREATE INDEX IF NOT EXISTS idx_builds_engine         ON builds(engine_id);
    ")?;
    seed_catalog(conn)?;
    Ok(())
}

fn seed_catalog(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare(
        "INSERT OR IGNORE INTO engines (id, name, engine_index, brand, volume, stroke, cooling,
            power, torque, valves, timing_type, fuel_system, description, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"
    )?;
    let mut inserted = 0usize;
    for e in BUILTIN_ENGINES {
        inserted += stmt.execute(params![
            e.id,
            e.name,
            e.index,
            e.brand,
            e.volume,
            e.stroke.as_str(),
            e.cooling.as_str(),
            e.power,
            e.torque,
            e.valves,
            e.timing_type,
            e.fuel_system,
            e.description,
            EngineStatus::Approved.as_str(),
        ])?;
    }
    if inserted > 0 {
        tracing::info!(inserted, "seeded built-in engine catalog");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Engines
// ---------------------------------------------------------------------------

const ENGINE_COLUMNS: &str =
    "id, name, engine_index, brand, volume, stroke, cooling, power, torque, valves,
     timing_type, fuel_system, description, status, author_id, moderator_comment,
     created_at, views";

/// Map a database row to an Engine. Derived fields are left empty.
fn engine_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Engine> {
    let stroke:  String = row.get(5)?;
    let cooling: String = row.get(6)?;
    let status:  String = row.get(13)?;
    let views:   i64    = row.get(17)?;
    Ok(Engine {
        id:                row.get(0)?,
        name:              row.get(1)?,
        index:             row.get(2)?,
        brand:             row.get(3)?,
        volume:            row.get(4)?,
        stroke:            parse_column(5, &stroke, StrokeType::parse)?,
        cooling:           parse_column(6, &cooling, CoolingType::parse)?,
        power:             row.get(7)?,
        torque:            row.get(8)?,
        valves:            row.get(9)?,
        timing_type:       row.get(10)?,
        fuel_system:       row.get(11)?,
        description:       row.get(12)?,
        status:            parse_column(13, &status, EngineStatus::parse)?,
        author_id:         row.get(14)?,
        moderator_comment: row.get(15)?,
        created_at:        row.get(16)?,
        views:             Some(views.max(0) as u64),
        reliability_index: None,
        reports_count:     None,
    })
}

/// Engine columns are written only by this module, so an unknown label means
/// the file was edited by hand. Surface it as a conversion error.
fn parse_column<T>(idx: usize, value: &str, parse: fn(&str) -> Option<T>) -> rusqlite::Result<T> {
    parse(value).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            format!("unknown label {value:?}").into(),
        )
    })
}

fn fill_reliability(engine: &mut Engine, reports: &[ReliabilityReport]) {
    engine.reports_count = Some(reports.len() as u32);
    engine.reliability_index = Some(reliability_index(reports));
}

/// Approved engines in catalog order, with reliability fields derived from
/// the current report set.
pub fn list_active_engines(conn: &Connection) -> Result<Vec<Engine>> {
    let mut engines = list_engines_by_status(conn, EngineStatus::Approved)?;

    let mut by_engine: HashMap<String, Vec<ReliabilityReport>> = HashMap::new();
    for r in list_all_reports(conn)? {
        by_engine.entry(r.engine_id.clone()).or_default().push(r);
    }
    for engine in &mut engines {
        let reports = by_engine.get(&engine.id).map(Vec::as_slice).unwrap_or(&[]);
        fill_reliability(engine, reports);
    }
    Ok(engines)
}

/// Engines with the given moderation status, in insertion order. Derived
/// fields are not filled.
pub fn list_engines_by_status(conn: &Connection, status: EngineStatus) -> Result<Vec<Engine>> {
    let sql = format!("SELECT {ENGINE_COLUMNS} FROM engines WHERE status = ?1 ORDER BY rowid");
    let mut stmt = conn.prepare(&sql)?;
    let engines = stmt
        .query_map(params![status.as_str()], engine_from_row)?
        .collect::<rusqlite::Result<Vec<Engine>>>()?;
    Ok(engines)
}

/// Fetch a single engine (any status) with its derived reliability fields.
pub fn get_engine(conn: &Connection, engine_id: &str) -> Result<Option<Engine>> {
    let sql = format!("SELECT {ENGINE_COLUMNS} FROM engines WHERE id = ?1");
    let engine = conn
        .query_row(&sql, params![engine_id], engine_from_row)
        .optional()?;

    match engine {
        Some(mut engine) => {
            let reports = list_reports_for_engine(conn, engine_id)?;
            fill_reliability(&mut engine, &reports);
            Ok(Some(engine))
        }
        None => Ok(None),
    }
}

fn engine_exists(conn: &Connection, engine_id: &str) -> Result<bool> {
    let found = conn
        .query_row("SELECT 1 FROM engines WHERE id = ?1", params![engine_id], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

/// Store a user-contributed engine as `Pending`. Index codes are unique,
/// ignoring case, across the whole catalog.
pub fn submit_engine(conn: &Connection, input: EngineInput, author_id: &str) -> Result<Engine> {
    let input = validate_engine(input)?;

    let taken = conn
        .query_row(
            "SELECT 1 FROM engines WHERE engine_index = ?1 COLLATE NOCASE",
            params![input.index],
            |_| Ok(()),
        )
        .optional()?;
    if taken.is_some() {
        return Err(Error::DuplicateEngineIndex(input.index));
    }

    let id = format!("user_{}", Uuid::new_v4().simple());
    let now = Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO engines (id, name, engine_index, brand, volume, stroke, cooling, power,
            torque, valves, timing_type, fuel_system, description, status, author_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            id,
            input.name,
            input.index,
            input.brand,
            input.volume,
            input.stroke.as_str(),
            input.cooling.as_str(),
            input.power,
            input.torque,
            input.valves,
            input.timing_type,
            input.fuel_system,
            input.description,
            EngineStatus::Pending.as_str(),
            author_id,
            now,
        ],
    )?;
    tracing::info!(engine_id = %id, index = %input.index, "engine submitted for moderation");

    get_engine(conn, &id)?.ok_or(Error::EngineNotFound(id))
}

/// Set an engine's moderation status. Returns false if the id wasn't found.
/// A `None` comment leaves any existing comment in place.
pub fn moderate(
    conn: &Connection,
    engine_id: &str,
    status: EngineStatus,
    comment: Option<&str>,
) -> Result<bool> {
    let rows = conn.execute(
        "UPDATE engines SET status = ?1, moderator_comment = COALESCE(?2, moderator_comment)
         WHERE id = ?3",
        params![status.as_str(), comment, engine_id],
    )?;
    if rows > 0 {
        tracing::info!(engine_id, status = %status, "engine moderated");
    }
    Ok(rows > 0)
}

/// Bump an engine's view counter. Returns false if the id wasn't found.
pub fn record_view(conn: &Connection, engine_id: &str) -> Result<bool> {
    let rows = conn.execute(
        "UPDATE engines SET views = views + 1 WHERE id = ?1",
        params![engine_id],
    )?;
    Ok(rows > 0)
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

const REPORT_COLUMNS: &str =
    "id, engine_id, user_id, mileage, mileage_unit, usage_style, usage_type,
     has_breakdowns, description, maintenance_rating, created_at";

fn raw_report_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawReport> {
    Ok(RawReport {
        id:                   row.get(0)?,
        engine_id:            row.get(1)?,
        user_id:              row.get(2)?,
        mileage:              row.get(3)?,
        mileage_unit:         row.get(4)?,
        usage_style:          row.get(5)?,
        usage_type:           row.get(6)?,
        has_breakdowns:       row.get(7)?,
        breakdown_categories: vec![],  // filled below
        description:          row.get(8)?,
        maintenance_rating:   row.get(9)?,
        created_at:           row.get(10)?,
    })
}

/// Run a report query, attach categories, and type-check every row. Rows that
/// fail the check are logged and left out.
fn query_reports(
    conn: &Connection,
    where_clause: &str,
    args: &[&dyn rusqlite::ToSql],
) -> Result<Vec<ReliabilityReport>> {
    let sql = format!(
        "SELECT {REPORT_COLUMNS} FROM reports {where_clause} ORDER BY created_at, id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let raws = stmt
        .query_map(args, raw_report_from_row)?
        .collect::<rusqlite::Result<Vec<RawReport>>>()?;

    let mut categories = fetch_categories(conn, where_clause, args)?;

    let mut reports = Vec::with_capacity(raws.len());
    for mut raw in raws {
        raw.breakdown_categories = categories.remove(&raw.id).unwrap_or_default();
        match check_stored_report(raw) {
            RecordCheck::Valid(report) => reports.push(report),
            RecordCheck::Invalid { id, error } => {
                tracing::warn!(report_id = %id, %error, "skipping unreadable report");
            }
        }
    }
    Ok(reports)
}

/// Categories for every report matching `where_clause`, keyed by report id,
/// in submission order.
fn fetch_categories(
    conn: &Connection,
    where_clause: &str,
    args: &[&dyn rusqlite::ToSql],
) -> Result<HashMap<String, Vec<String>>> {
    let sql = format!(
        "SELECT b.report_id, b.category FROM report_breakdowns b
         WHERE b.report_id IN (SELECT id FROM reports {where_clause})
         ORDER BY b.report_id, b.position"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(args, |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut map: HashMap<String, Vec<String>> = HashMap::new();
    for row in rows {
        let (id, cat) = row?;
        map.entry(id).or_default().push(cat);
    }
    Ok(map)
}

pub fn list_all_reports(conn: &Connection) -> Result<Vec<ReliabilityReport>> {
    query_reports(conn, "", &[])
}

pub fn list_reports_for_engine(conn: &Connection, engine_id: &str) -> Result<Vec<ReliabilityReport>> {
    query_reports(conn, "WHERE engine_id = ?1", &[&engine_id])
}

/// The most recent report `user_id` filed for `engine_id`, if any.
pub fn find_user_report(
    conn: &Connection,
    user_id: &str,
    engine_id: &str,
) -> Result<Option<ReliabilityReport>> {
    let reports = query_reports(conn, "WHERE user_id = ?1 AND engine_id = ?2", &[&user_id, &engine_id])?;
    Ok(reports.into_iter().last())
}

/// Submit a report stamped with the current time.
pub fn submit_report(conn: &Connection, input: ReportInput) -> Result<ReliabilityReport> {
    submit_report_at(conn, input, Utc::now())
}

/// Submit a report stamped with `now`.
///
/// A user may file one report per engine per UTC calendar day. The check and
/// the insert share one IMMEDIATE transaction, which takes SQLite's write lock
/// up front.
pub fn submit_report_at(
    conn: &Connection,
    input: ReportInput,
    now: DateTime<Utc>,
) -> Result<ReliabilityReport> {
    let input = validate_report(input)?;

    // RUST NOTE: `new_unchecked` opens a transaction from a shared `&Connection`.
    // If anything below returns early with `?`, dropping `tx` rolls it back.
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;

    if !engine_exists(&tx, &input.engine_id)? {
        return Err(Error::EngineNotFound(input.engine_id));
    }

    let day = now.format("%Y-%m-%d").to_string();
    let already = tx
        .query_row(
            "SELECT 1 FROM reports
             WHERE user_id = ?1 AND engine_id = ?2 AND substr(created_at, 1, 10) = ?3
             LIMIT 1",
            params![input.user_id, input.engine_id, day],
            |_| Ok(()),
        )
        .optional()?;
    if already.is_some() {
        return Err(Error::DuplicateReport);
    }

    let report = ReliabilityReport {
        id:                   format!("rep_{}", Uuid::new_v4().simple()),
        engine_id:            input.engine_id,
        user_id:              input.user_id,
        mileage:              input.mileage,
        mileage_unit:         input.mileage_unit,
        usage_style:          input.usage_style,
        usage_type:           input.usage_type,
        has_breakdowns:       input.has_breakdowns,
        breakdown_categories: input.breakdown_categories,
        description:          input.description,
        maintenance_rating:   input.maintenance_rating,
        created_at:           now.to_rfc3339(),
    };
    insert_report(&tx, &report)?;
    tx.commit()?;

    tracing::info!(
        report_id = %report.id,
        engine_id = %report.engine_id,
        has_breakdowns = report.has_breakdowns,
        "reliability report stored"
    );
    Ok(report)
}

fn insert_report(conn: &Connection, r: &ReliabilityReport) -> Result<()> {
    conn.execute(
        "INSERT INTO reports (id, engine_id, user_id, mileage, mileage_unit, usage_style,
            usage_type, has_breakdowns, description, maintenance_rating, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            r.id,
            r.engine_id,
            r.user_id,
            r.mileage,
            r.mileage_unit.as_str(),
            r.usage_style.as_str(),
            r.usage_type.as_str(),
            r.has_breakdowns,
            r.description,
            r.maintenance_rating,
            r.created_at,
        ],
    )?;
    for (position, cat) in r.breakdown_categories.iter().enumerate() {
        conn.execute(
            "INSERT INTO report_breakdowns (report_id, position, category) VALUES (?1, ?2, ?3)",
            params![r.id, position as i64, cat.as_str()],
        )?;
    }
    Ok(())
}

fn report_exists(conn: &Connection, report_id: &str) -> Result<bool> {
    let found = conn
        .query_row("SELECT 1 FROM reports WHERE id = ?1", params![report_id], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

/// Import a JSON array of reports as written by the old browser store.
///
/// Each element is checked on its own: malformed elements are listed in
/// `rejected` with their array position, ids already present are counted in
/// `skipped`. The daily-uniqueness rule is a submission rule and is not
/// applied to historical data.
pub fn import_reports_json(conn: &Connection, json: &str) -> Result<ImportOutcome> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let mut outcome = ImportOutcome::default();

    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    for (position, value) in values.into_iter().enumerate() {
        let id = value.get("id").and_then(|v| v.as_str()).map(str::to_string);

        let raw: RawReport = match serde_json::from_value(value) {
            Ok(raw) => raw,
            Err(e) => {
                outcome.rejected.push(RejectedRecord { position, id, reason: e.to_string() });
                continue;
            }
        };

        let report = match check_stored_report(raw) {
            RecordCheck::Valid(report) => report,
            RecordCheck::Invalid { id, error } => {
                outcome.rejected.push(RejectedRecord {
                    position,
                    id: Some(id),
                    reason: error.to_string(),
                });
                continue;
            }
        };

        if report_exists(&tx, &report.id)? {
            outcome.skipped += 1;
            continue;
        }
        insert_report(&tx, &report)?;
        outcome.imported += 1;
    }
    tx.commit()?;

    tracing::info!(
        imported = outcome.imported,
        skipped = outcome.skipped,
        rejected = outcome.rejected.len(),
        "report import finished"
    );
    Ok(outcome)
}

// ---------------------------------------------------------------------------
// Builds
// ---------------------------------------------------------------------------

pub fn list_builds(conn: &Connection) -> Result<Vec<Build>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, user_name, name, engine_id, frame, carburetor, exhaust, gears,
                description, created_at
         FROM builds ORDER BY created_at, id"
    )?;
    let mut builds = stmt
        .query_map([], |row| {
            Ok(Build {
                id:          row.get(0)?,
                user_id:     row.get(1)?,
                user_name:   row.get(2)?,
                name:        row.get(3)?,
                engine_id:   row.get(4)?,
                frame:       row.get(5)?,
                carburetor:  row.get(6)?,
                exhaust:     row.get(7)?,
                gears:       row.get(8)?,
                description: row.get(9)?,
                photos:      vec![],  // filled below
                created_at:  row.get(10)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<Build>>>()?;

    let mut stmt = conn.prepare("SELECT build_id, path FROM build_photos ORDER BY id")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;
    let mut photos: HashMap<String, Vec<String>> = HashMap::new();
    for row in rows {
        let (build_id, path) = row?;
        photos.entry(build_id).or_default().push(path);
    }
    for build in &mut builds {
        build.photos = photos.remove(&build.id).unwrap_or_default();
    }
    Ok(builds)
}

/// Validate and store a build. The engine must exist.
pub fn add_build(conn: &Connection, input: BuildInput) -> Result<Build> {
    let input = validate_build(input)?;

    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    if !engine_exists(&tx, &input.engine_id)? {
        return Err(Error::EngineNotFound(input.engine_id));
    }

    let build = Build {
        id:          format!("build_{}", Uuid::new_v4().simple()),
        user_id:     input.user_id,
        user_name:   input.user_name,
        name:        input.name,
        engine_id:   input.engine_id,
        frame:       input.frame,
        carburetor:  input.carburetor,
        exhaust:     input.exhaust,
        gears:       input.gears,
        description: input.description,
        photos:      input.photos,
        created_at:  Utc::now().to_rfc3339(),
    };

    tx.execute(
        "INSERT INTO builds (id, user_id, user_name, name, engine_id, frame, carburetor,
            exhaust, gears, description, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            build.id,
            build.user_id,
            build.user_name,
            build.name,
            build.engine_id,
            build.frame,
            build.carburetor,
            build.exhaust,
            build.gears,
            build.description,
            build.created_at,
        ],
    )?;
    for path in &build.photos {
        tx.execute(
            "INSERT INTO build_photos (build_id, path) VALUES (?1, ?2)",
            params![build.id, path],
        )?;
    }
    tx.commit()?;

    tracing::info!(build_id = %build.id, engine_id = %build.engine_id, "build stored");
    Ok(build)
}

// ---------------------------------------------------------------------------
// Repository impls
// ---------------------------------------------------------------------------

// RUST NOTE: the traits are ours, so we may implement them for a foreign type.
// Anything holding a `&Connection` (e.g. a MutexGuard) can now act as a store.

impl ReportRepository for Connection {
    fn list_reports_for_engine(&self, engine_id: &str) -> Result<Vec<ReliabilityReport>> {
        list_reports_for_engine(self, engine_id)
    }

    fn list_all_reports(&self) -> Result<Vec<ReliabilityReport>> {
        list_all_reports(self)
    }

    fn append_report(&self, input: ReportInput) -> Result<ReliabilityReport> {
        submit_report(self, input)
    }
}

impl BuildRepository for Connection {
    fn list_builds(&self) -> Result<Vec<Build>> {
        list_builds(self)
    }

    fn append_build(&self, input: BuildInput) -> Result<Build> {
        add_build(self, input)
    }
}

impl EngineRepository for Connection {
    fn list_active_engines(&self) -> Result<Vec<Engine>> {
        list_active_engines(self)
    }

    fn get_engine(&self, engine_id: &str) -> Result<Option<Engine>> {
        get_engine(self, engine_id)
    }
}
