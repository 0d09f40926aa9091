// validation.rs — Checks applied where records enter or leave storage.
//
// Two boundaries:
//   1. Submission: `validate_*` refuse bad user input before it is written.
//   2. Read-back: `check_stored_report` turns an untyped row or legacy JSON
//      record into a typed report, or says why it can't.
//
// The calculators in `reliability` and `stats` never validate; whatever gets
// through here is scored literally.

use chrono::{DateTime, Utc};

use crate::error::ValidationError;
use crate::models::{
    BreakdownCategory, BuildInput, EngineInput, MileageUnit, RawReport, ReliabilityReport,
    ReportInput, UsageStyle, UsageType,
};

/// Outcome of checking one stored record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordCheck {
    Valid(ReliabilityReport),
    Invalid { id: String, error: ValidationError },
}

impl RecordCheck {
    pub fn into_result(self) -> Result<ReliabilityReport, ValidationError> {
        match self {
            RecordCheck::Valid(report)         => Ok(report),
            RecordCheck::Invalid { error, .. } => Err(error),
        }
    }
}

// ---------------------------------------------------------------------------
// Submission path
// ---------------------------------------------------------------------------

/// Validate a report submission and return it normalized.
///
/// Duplicate categories are collapsed (first occurrence kept). A breakdown
/// flag that disagrees with the category list is rejected rather than
/// corrected, since either side could be the mistake.
pub fn validate_report(mut input: ReportInput) -> Result<ReportInput, ValidationError> {
    input.engine_id = require("engine_id", &input.engine_id)?;
    input.user_id   = require("user_id", &input.user_id)?;

    if !input.mileage.is_finite() || input.mileage <= 0.0 {
        return Err(ValidationError::InvalidMileage(input.mileage));
    }
    check_rating(i64::from(input.maintenance_rating))?;

    input.breakdown_categories = dedup_categories(input.breakdown_categories);
    check_breakdown_flag(input.has_breakdowns, input.breakdown_categories.is_empty())?;

    Ok(input)
}

pub fn validate_build(mut input: BuildInput) -> Result<BuildInput, ValidationError> {
    input.name      = require("name", &input.name)?;
    input.engine_id = require("engine_id", &input.engine_id)?;
    input.user_id   = require("user_id", &input.user_id)?;
    Ok(input)
}

pub fn validate_engine(mut input: EngineInput) -> Result<EngineInput, ValidationError> {
    input.name  = require("name", &input.name)?;
    input.index = require("index", &input.index)?;
    input.brand = require("brand", &input.brand)?;
    if input.volume == 0 {
        return Err(ValidationError::InvalidVolume);
    }
    Ok(input)
}

// ---------------------------------------------------------------------------
// Read-back path
// ---------------------------------------------------------------------------

/// Type-check a stored report.
///
/// Unlike `validate_report`, zero mileage is accepted and an inconsistent
/// breakdown flag is kept as-is: the record already exists and the
/// calculators are expected to cope with it.
pub fn check_stored_report(raw: RawReport) -> RecordCheck {
    let id = raw.id.clone();
    match parse_stored(raw) {
        Ok(report) => RecordCheck::Valid(report),
        Err(error) => RecordCheck::Invalid { id, error },
    }
}

fn parse_stored(raw: RawReport) -> Result<ReliabilityReport, ValidationError> {
    let id        = require("id", &raw.id)?;
    let engine_id = require("engine_id", &raw.engine_id)?;
    let user_id   = require("user_id", &raw.user_id)?;

    if !raw.mileage.is_finite() || raw.mileage < 0.0 {
        return Err(ValidationError::InvalidMileage(raw.mileage));
    }
    let maintenance_rating = check_rating(raw.maintenance_rating)?;

    let mileage_unit = label("mileage_unit", &raw.mileage_unit, MileageUnit::parse)?;
    let usage_style  = label("usage_style", &raw.usage_style, UsageStyle::parse)?;
    let usage_type   = label("usage_type", &raw.usage_type, UsageType::parse)?;

    let categories = raw
        .breakdown_categories
        .iter()
        .map(|c| label("breakdown_category", c, BreakdownCategory::parse))
        .collect::<Result<Vec<_>, _>>()?;

    // Stored as UTC so the date prefix and string order agree with submissions.
    let created_at = DateTime::parse_from_rfc3339(&raw.created_at)
        .map_err(|_| ValidationError::InvalidTimestamp(raw.created_at.clone()))?
        .with_timezone(&Utc)
        .to_rfc3339();

    Ok(ReliabilityReport {
        id,
        engine_id,
        user_id,
        mileage: raw.mileage,
        mileage_unit,
        usage_style,
        usage_type,
        has_breakdowns: raw.has_breakdowns,
        breakdown_categories: categories,
        description: raw.description,
        maintenance_rating,
        created_at,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn require(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

fn check_rating(rating: i64) -> Result<u8, ValidationError> {
    match rating {
        1..=5 => Ok(rating as u8),
        _     => Err(ValidationError::InvalidMaintenanceRating(rating)),
    }
}

fn check_breakdown_flag(has_breakdowns: bool, no_categories: bool) -> Result<(), ValidationError> {
    match (has_breakdowns, no_categories) {
        (true, true)   => Err(ValidationError::BreakdownsWithoutCategories),
        (false, false) => Err(ValidationError::CategoriesWithoutBreakdowns),
        _              => Ok(()),
    }
}

fn label<T>(
    field: &'static str,
    value: &str,
    parse: fn(&str) -> Option<T>,
) -> Result<T, ValidationError> {
    parse(value).ok_or_else(|| ValidationError::UnknownLabel {
        field,
        value: value.to_string(),
    })
}

fn dedup_categories(categories: Vec<BreakdownCategory>) -> Vec<BreakdownCategory> {
    let mut seen = Vec::with_capacity(categories.len());
    for c in categories {
        if !seen.contains(&c) {
            seen.push(c);
        }
    }
    seen
}
