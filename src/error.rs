// error.rs — Crate-wide error types.
//
// RUST NOTE: `thiserror` derives `std::error::Error` and `Display` from the
// `#[error(...)]` attributes. `#[from]` also generates a `From` impl, which is
// what lets `?` convert a `rusqlite::Error` into our `Error` automatically.

use thiserror::Error;

/// Reasons a record is refused at a persistence boundary.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("mileage must be a positive number, got {0}")]
    InvalidMileage(f64),
    #[error("maintenance rating must be between 1 and 5, got {0}")]
    InvalidMaintenanceRating(i64),
    #[error("report is flagged with breakdowns but lists no breakdown categories")]
    BreakdownsWithoutCategories,
    #[error("report lists breakdown categories but is not flagged with breakdowns")]
    CategoriesWithoutBreakdowns,
    #[error("unknown {field} value: {value:?}")]
    UnknownLabel { field: &'static str, value: String },
    #[error("required field {0} is empty")]
    MissingField(&'static str),
    #[error("engine displacement must be greater than zero")]
    InvalidVolume,
    #[error("timestamp {0:?} is not RFC 3339")]
    InvalidTimestamp(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("a report for this engine was already submitted today")]
    DuplicateReport,
    #[error("an engine with index {0} already exists")]
    DuplicateEngineIndex(String),
    #[error("engine {0} not found")]
    EngineNotFound(String),
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvValue { var: String, reason: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// Shorthand type alias: `Result<T>` is `Result<T, Error>`
pub type Result<T> = std::result::Result<T, Error>;
